use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::grading::{EducationLevel, EvaluationType, Mention, QualitativeEvaluation, SubjectGroup};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BulletinId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: String,
    pub full_name: String,
}

/// One raw mark as loaded from grade storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub evaluation: EvaluationType,
    /// `None` when the student was absent or the mark is not entered yet.
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMarks {
    pub name: String,
    /// Required at upper secondary, ignored elsewhere.
    #[serde(default)]
    pub coefficient: Option<f64>,
    #[serde(default)]
    pub marks: Vec<Mark>,
    /// Preschool code (`TS`, `S`, `PS`).
    #[serde(default)]
    pub qualitative: Option<String>,
}

/// Everything needed to produce one student's report card for one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletinRequest {
    pub student: StudentRef,
    pub class_label: String,
    pub term: u8,
    pub subjects: Vec<SubjectMarks>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletinStatus {
    /// Every subject produced a result.
    Complete,
    /// An overall result exists but some subjects are still missing marks.
    Partial,
    /// No overall result could be computed yet.
    Pending,
}

impl BulletinStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Partial => "Partial",
            Self::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectLine {
    pub name: String,
    pub group: SubjectGroup,
    pub group_label: &'static str,
    pub coefficient: f64,
    /// Average of each evaluation that had at least one valid mark.
    pub evaluation_averages: BTreeMap<EvaluationType, f64>,
    /// Subject average on the 0-20 scale.
    pub average: Option<f64>,
    /// Upper secondary only: `average * coefficient`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mention: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualitative: Option<QualitativeEvaluation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCard {
    pub id: BulletinId,
    pub school: String,
    pub academic_year: String,
    pub student: StudentRef,
    pub class_label: String,
    pub level: EducationLevel,
    pub term: u8,
    pub subjects: Vec<SubjectLine>,
    pub average: Option<f64>,
    pub mention: Option<Mention>,
    pub status: BulletinStatus,
    /// Position in the class, set once the class has been ranked.
    pub rank: Option<usize>,
    pub generated_on: NaiveDate,
}

impl ReportCard {
    /// Text shown where the average would be.
    pub fn average_display(&self) -> String {
        match self.average {
            Some(average) => format!("{average:.2}/20"),
            None => "en attente".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub class_label: String,
    pub level: EducationLevel,
    pub term: u8,
    pub size: usize,
    pub ranked: usize,
    pub class_average: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
    /// Students with an average of at least 10.
    pub passing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassReport {
    pub summary: ClassSummary,
    pub report_cards: Vec<ReportCard>,
}
