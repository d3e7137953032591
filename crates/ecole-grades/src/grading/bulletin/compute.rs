use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::SchoolConfig;
use crate::grading::{
    annual_average_primary, annual_average_secondary, classify_mention, classify_preschool,
    numeric_average, resolve_subject_group, round2, subject_average_lower_secondary,
    subject_average_upper_secondary, term_average_lower_secondary, term_average_primary,
    term_average_upper_secondary, EducationLevel, EvaluationType, Mention, ValidScores,
};

use super::domain::{
    BulletinId, BulletinRequest, BulletinStatus, ClassSummary, ReportCard, SubjectLine,
    SubjectMarks,
};

const PASSING_AVERAGE: f64 = 10.0;

/// Builds an unranked report card. The request is expected to have gone
/// through `validate_request` already; invalid marks that slip through are
/// simply dropped by the averaging rules.
pub fn build_report_card(
    id: BulletinId,
    request: &BulletinRequest,
    level: EducationLevel,
    school: &SchoolConfig,
    generated_on: NaiveDate,
) -> ReportCard {
    let subjects: Vec<SubjectLine> = request
        .subjects
        .iter()
        .map(|subject| subject_line(subject, level))
        .collect();

    let average = student_average(&subjects, level);
    let status = report_status(&subjects, level, average);
    let mention = average.map(classify_mention);

    tracing::debug!(
        student = %request.student.id,
        class_label = %request.class_label,
        term = request.term,
        %level,
        ?average,
        status = status.label(),
        "report card computed"
    );

    ReportCard {
        id,
        school: school.name.clone(),
        academic_year: school.academic_year.clone(),
        student: request.student.clone(),
        class_label: request.class_label.clone(),
        level,
        term: request.term,
        subjects,
        average,
        mention,
        status,
        rank: None,
        generated_on,
    }
}

fn subject_line(subject: &SubjectMarks, level: EducationLevel) -> SubjectLine {
    let group = resolve_subject_group(&subject.name, level);
    let evaluation_averages = evaluation_averages(subject);
    let lookup = |evaluation: EvaluationType| evaluation_averages.get(&evaluation).copied();

    let (average, weighted_average) = match level {
        EducationLevel::Maternelle => (None, None),
        EducationLevel::Primaire => (
            term_average_primary(
                lookup(EvaluationType::Em1),
                lookup(EvaluationType::Em2),
                lookup(EvaluationType::Ec),
            ),
            None,
        ),
        EducationLevel::Secondaire1erCycle => (
            subject_average_lower_secondary(
                lookup(EvaluationType::Ie1),
                lookup(EvaluationType::Ie2),
                lookup(EvaluationType::Ds1),
                lookup(EvaluationType::Ds2),
            ),
            None,
        ),
        EducationLevel::Secondaire2ndCycle => (
            subject_average_lower_secondary(
                lookup(EvaluationType::Ie1),
                lookup(EvaluationType::Ie2),
                lookup(EvaluationType::Ds1),
                lookup(EvaluationType::Ds2),
            ),
            subject_average_upper_secondary(
                lookup(EvaluationType::Ie1),
                lookup(EvaluationType::Ie2),
                lookup(EvaluationType::Ds1),
                lookup(EvaluationType::Ds2),
                subject.coefficient,
            ),
        ),
    };

    let qualitative = match level {
        EducationLevel::Maternelle => Some(classify_preschool(
            subject.qualitative.as_deref().unwrap_or_default(),
        )),
        _ => None,
    };

    let coefficient = match level {
        EducationLevel::Secondaire2ndCycle => subject.coefficient.unwrap_or(1.0),
        _ => 1.0,
    };

    SubjectLine {
        name: subject.name.clone(),
        group,
        group_label: group.label(),
        coefficient,
        evaluation_averages,
        average,
        weighted_average,
        mention: average.map(|value| classify_mention(value).label),
        qualitative,
    }
}

/// Groups marks by evaluation and averages each group.
fn evaluation_averages(subject: &SubjectMarks) -> BTreeMap<EvaluationType, f64> {
    let mut grouped: BTreeMap<EvaluationType, Vec<Option<f64>>> = BTreeMap::new();
    for mark in &subject.marks {
        grouped.entry(mark.evaluation).or_default().push(mark.value);
    }

    grouped
        .into_iter()
        .filter_map(|(evaluation, values)| {
            numeric_average(&values).map(|average| (evaluation, average))
        })
        .collect()
}

fn student_average(subjects: &[SubjectLine], level: EducationLevel) -> Option<f64> {
    match level {
        EducationLevel::Maternelle => None,
        EducationLevel::Primaire | EducationLevel::Secondaire1erCycle => {
            let averages: Vec<Option<f64>> = subjects.iter().map(|line| line.average).collect();
            term_average_lower_secondary(&averages)
        }
        EducationLevel::Secondaire2ndCycle => {
            let weighted: Vec<Option<f64>> =
                subjects.iter().map(|line| line.weighted_average).collect();
            let coefficients: Vec<Option<f64>> =
                subjects.iter().map(|line| Some(line.coefficient)).collect();
            term_average_upper_secondary(&weighted, &coefficients)
        }
    }
}

fn report_status(
    subjects: &[SubjectLine],
    level: EducationLevel,
    average: Option<f64>,
) -> BulletinStatus {
    if level == EducationLevel::Maternelle {
        let evaluated = subjects
            .iter()
            .filter(|line| line.qualitative.is_some_and(|q| q.is_evaluated()))
            .count();
        return match evaluated {
            0 => BulletinStatus::Pending,
            n if n == subjects.len() => BulletinStatus::Complete,
            _ => BulletinStatus::Partial,
        };
    }

    match average {
        None => BulletinStatus::Pending,
        Some(_) if subjects.iter().all(|line| line.average.is_some()) => {
            BulletinStatus::Complete
        }
        Some(_) => BulletinStatus::Partial,
    }
}

/// Competition ranking ("1, 2, 2, 4") by descending average. Report cards
/// without an average are left unranked and moved to the end; the order
/// among equals is kept.
pub fn rank_report_cards(report_cards: &mut [ReportCard]) {
    report_cards.sort_by(|left, right| match (left.average, right.average) {
        (Some(l), Some(r)) => r.partial_cmp(&l).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let mut previous: Option<(f64, usize)> = None;
    for (index, card) in report_cards.iter_mut().enumerate() {
        card.rank = match card.average {
            Some(average) => {
                let rank = match previous {
                    Some((last_average, last_rank)) if last_average == average => last_rank,
                    _ => index + 1,
                };
                previous = Some((average, rank));
                Some(rank)
            }
            None => None,
        };
    }
}

pub fn summarize_class(
    class_label: &str,
    level: EducationLevel,
    term: u8,
    report_cards: &[ReportCard],
) -> ClassSummary {
    let averages = ValidScores::finite(report_cards.iter().map(|card| card.average));

    let (class_average, highest, lowest) = match &averages {
        Some(valid) => (
            Some(round2(valid.mean())),
            valid.values().iter().copied().reduce(f64::max),
            valid.values().iter().copied().reduce(f64::min),
        ),
        None => (None, None, None),
    };

    ClassSummary {
        class_label: class_label.to_string(),
        level,
        term,
        size: report_cards.len(),
        ranked: averages.as_ref().map_or(0, ValidScores::len),
        class_average,
        highest,
        lowest,
        passing: averages.as_ref().map_or(0, |valid| {
            valid
                .values()
                .iter()
                .filter(|average| **average >= PASSING_AVERAGE)
                .count()
        }),
    }
}

/// Inputs for a year-end average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pathway", rename_all = "snake_case")]
pub enum AnnualInput {
    Primary {
        monthly_averages: Vec<Option<f64>>,
        certifying_averages: Vec<Option<f64>>,
    },
    Secondary {
        t1: Option<f64>,
        t2: Option<f64>,
        t3: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualResult {
    pub average: Option<f64>,
    pub mention: Option<Mention>,
    pub passed: Option<bool>,
}

pub fn annual_result(input: &AnnualInput) -> AnnualResult {
    let average = match input {
        AnnualInput::Primary {
            monthly_averages,
            certifying_averages,
        } => annual_average_primary(monthly_averages, certifying_averages),
        AnnualInput::Secondary { t1, t2, t3 } => annual_average_secondary(*t1, *t2, *t3),
    };

    AnnualResult {
        average,
        mention: average.map(classify_mention),
        passed: average.map(|value| value >= PASSING_AVERAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::bulletin::domain::{Mark, StudentRef};

    fn generated_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 19).expect("valid date")
    }

    fn marks(pairs: &[(EvaluationType, Option<f64>)]) -> Vec<Mark> {
        pairs
            .iter()
            .map(|(evaluation, value)| Mark {
                evaluation: *evaluation,
                value: *value,
            })
            .collect()
    }

    fn request(class_label: &str, subjects: Vec<SubjectMarks>) -> BulletinRequest {
        BulletinRequest {
            student: StudentRef {
                id: "stu-1".to_string(),
                full_name: "Afi Dossou".to_string(),
            },
            class_label: class_label.to_string(),
            term: 1,
            subjects,
        }
    }

    fn card(average: Option<f64>) -> ReportCard {
        let mut card = build_report_card(
            BulletinId("bul-x".to_string()),
            &request("6ème", Vec::new()),
            EducationLevel::Secondaire1erCycle,
            &SchoolConfig::default(),
            generated_on(),
        );
        card.average = average;
        card
    }

    #[test]
    fn primary_subject_uses_monthly_and_certifying_marks() {
        use EvaluationType::*;
        let request = request(
            "CM1",
            vec![SubjectMarks {
                name: "Mathématiques".to_string(),
                coefficient: None,
                marks: marks(&[
                    (Em1, Some(12.0)),
                    (Em1, Some(16.0)),
                    (Em2, Some(16.0)),
                    (Ec, Some(15.0)),
                ]),
                qualitative: None,
            }],
        );

        let card = build_report_card(
            BulletinId("bul-1".to_string()),
            &request,
            EducationLevel::Primaire,
            &SchoolConfig::default(),
            generated_on(),
        );

        // EM1 14, EM2 16, EC 15 -> 15
        assert_eq!(card.subjects[0].average, Some(15.0));
        assert_eq!(card.subjects[0].evaluation_averages.get(&Em1), Some(&14.0));
        assert_eq!(card.average, Some(15.0));
        assert_eq!(card.status, BulletinStatus::Complete);
        assert_eq!(card.mention.map(|m| m.label), Some("Bien"));
    }

    #[test]
    fn upper_secondary_weights_subjects_by_coefficient() {
        use EvaluationType::*;
        let request = request(
            "Terminale D",
            vec![
                SubjectMarks {
                    name: "Mathématiques".to_string(),
                    coefficient: Some(4.0),
                    marks: marks(&[
                        (Ie1, Some(12.0)),
                        (Ie2, Some(14.0)),
                        (Ds1, Some(10.0)),
                        (Ds2, Some(16.0)),
                    ]),
                    qualitative: None,
                },
                SubjectMarks {
                    name: "EPS".to_string(),
                    coefficient: Some(1.0),
                    marks: marks(&[
                        (Ie1, Some(18.0)),
                        (Ie2, Some(18.0)),
                        (Ds1, Some(18.0)),
                        (Ds2, Some(18.0)),
                    ]),
                    qualitative: None,
                },
            ],
        );

        let card = build_report_card(
            BulletinId("bul-2".to_string()),
            &request,
            EducationLevel::Secondaire2ndCycle,
            &SchoolConfig::default(),
            generated_on(),
        );

        assert_eq!(card.subjects[0].average, Some(13.0));
        assert_eq!(card.subjects[0].weighted_average, Some(52.0));
        assert_eq!(card.subjects[1].weighted_average, Some(18.0));
        // (52 + 18) / 5
        assert_eq!(card.average, Some(14.0));
    }

    #[test]
    fn missing_marks_leave_report_card_partial_or_pending() {
        use EvaluationType::*;
        let complete = SubjectMarks {
            name: "Français".to_string(),
            coefficient: None,
            marks: marks(&[
                (Ie1, Some(10.0)),
                (Ie2, Some(12.0)),
                (Ds1, Some(11.0)),
                (Ds2, Some(13.0)),
            ]),
            qualitative: None,
        };
        let incomplete = SubjectMarks {
            name: "SVT".to_string(),
            coefficient: None,
            marks: marks(&[(Ie1, Some(10.0)), (Ds1, None)]),
            qualitative: None,
        };

        let partial = build_report_card(
            BulletinId("bul-3".to_string()),
            &request("5ème", vec![complete, incomplete.clone()]),
            EducationLevel::Secondaire1erCycle,
            &SchoolConfig::default(),
            generated_on(),
        );
        assert_eq!(partial.status, BulletinStatus::Partial);
        assert_eq!(partial.average, Some(11.67));
        assert_eq!(partial.subjects[1].average, None);

        let pending = build_report_card(
            BulletinId("bul-4".to_string()),
            &request("5ème", vec![incomplete]),
            EducationLevel::Secondaire1erCycle,
            &SchoolConfig::default(),
            generated_on(),
        );
        assert_eq!(pending.status, BulletinStatus::Pending);
        assert_eq!(pending.mention, None);
        assert_eq!(pending.average_display(), "en attente");
    }

    #[test]
    fn preschool_report_card_is_qualitative() {
        let request = request(
            "Grande Section",
            vec![
                SubjectMarks {
                    name: "Langage".to_string(),
                    coefficient: None,
                    marks: Vec::new(),
                    qualitative: Some("TS".to_string()),
                },
                SubjectMarks {
                    name: "Graphisme".to_string(),
                    coefficient: None,
                    marks: Vec::new(),
                    qualitative: None,
                },
            ],
        );

        let card = build_report_card(
            BulletinId("bul-5".to_string()),
            &request,
            EducationLevel::Maternelle,
            &SchoolConfig::default(),
            generated_on(),
        );

        assert_eq!(card.average, None);
        assert_eq!(card.status, BulletinStatus::Partial);
        let labels: Vec<_> = card
            .subjects
            .iter()
            .filter_map(|line| line.qualitative.map(|q| q.label))
            .collect();
        assert_eq!(labels, vec!["Très Satisfaisant", "Non évalué"]);
    }

    #[test]
    fn ranking_shares_positions_on_ties() {
        let mut cards = vec![
            card(Some(12.0)),
            card(None),
            card(Some(15.5)),
            card(Some(12.0)),
            card(Some(9.0)),
        ];

        rank_report_cards(&mut cards);

        let ranks: Vec<_> = cards.iter().map(|card| (card.average, card.rank)).collect();
        assert_eq!(
            ranks,
            vec![
                (Some(15.5), Some(1)),
                (Some(12.0), Some(2)),
                (Some(12.0), Some(2)),
                (Some(9.0), Some(4)),
                (None, None),
            ]
        );
    }

    #[test]
    fn class_summary_reports_extremes() {
        let cards = vec![card(Some(12.0)), card(None), card(Some(15.5)), card(Some(8.5))];

        let summary = summarize_class("6ème A", EducationLevel::Secondaire1erCycle, 1, &cards);

        assert_eq!(summary.size, 4);
        assert_eq!(summary.ranked, 3);
        assert_eq!(summary.class_average, Some(12.0));
        assert_eq!(summary.highest, Some(15.5));
        assert_eq!(summary.lowest, Some(8.5));
        assert_eq!(summary.passing, 2);
    }

    #[test]
    fn class_summary_of_pending_class_is_empty() {
        let summary = summarize_class("CP", EducationLevel::Primaire, 2, &[card(None)]);
        assert_eq!(summary.ranked, 0);
        assert_eq!(summary.class_average, None);
        assert_eq!(summary.passing, 0);
    }

    #[test]
    fn annual_result_follows_pathway() {
        let secondary = annual_result(&AnnualInput::Secondary {
            t1: Some(9.0),
            t2: Some(10.5),
            t3: Some(12.0),
        });
        assert_eq!(secondary.average, Some(10.5));
        assert_eq!(secondary.passed, Some(true));
        assert_eq!(secondary.mention.map(|m| m.label), Some("Passable"));

        let primary = annual_result(&AnnualInput::Primary {
            monthly_averages: vec![Some(8.0), Some(9.0)],
            certifying_averages: Vec::new(),
        });
        assert_eq!(primary.average, None);
        assert_eq!(primary.passed, None);
    }
}
