use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cycle of the Beninese school system a class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationLevel {
    Maternelle,
    Primaire,
    #[serde(rename = "SECONDAIRE_1ER_CYCLE")]
    Secondaire1erCycle,
    #[serde(rename = "SECONDAIRE_2ND_CYCLE")]
    Secondaire2ndCycle,
}

impl EducationLevel {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Maternelle,
            Self::Primaire,
            Self::Secondaire1erCycle,
            Self::Secondaire2ndCycle,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Maternelle => "MATERNELLE",
            Self::Primaire => "PRIMAIRE",
            Self::Secondaire1erCycle => "SECONDAIRE_1ER_CYCLE",
            Self::Secondaire2ndCycle => "SECONDAIRE_2ND_CYCLE",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Maternelle => "Maternelle",
            Self::Primaire => "Primaire",
            Self::Secondaire1erCycle => "Secondaire 1er cycle",
            Self::Secondaire2ndCycle => "Secondaire 2nd cycle",
        }
    }

    pub const fn is_secondary(self) -> bool {
        matches!(self, Self::Secondaire1erCycle | Self::Secondaire2ndCycle)
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown education level code '{0}'")]
pub struct UnknownLevelCode(pub String);

impl FromStr for EducationLevel {
    type Err = UnknownLevelCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ordered()
            .into_iter()
            .find(|level| level.code() == normalized)
            .ok_or_else(|| UnknownLevelCode(value.to_string()))
    }
}

/// Assessment kinds recognised on a report card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationType {
    ObservationContinue,
    BilanTrimestriel,
    BilanAnnuel,
    #[serde(rename = "EM1")]
    Em1,
    #[serde(rename = "EM2")]
    Em2,
    #[serde(rename = "EC")]
    Ec,
    #[serde(rename = "IE1")]
    Ie1,
    #[serde(rename = "IE2")]
    Ie2,
    #[serde(rename = "DS1")]
    Ds1,
    #[serde(rename = "DS2")]
    Ds2,
}

impl EvaluationType {
    pub const fn code(self) -> &'static str {
        match self {
            Self::ObservationContinue => "OBSERVATION_CONTINUE",
            Self::BilanTrimestriel => "BILAN_TRIMESTRIEL",
            Self::BilanAnnuel => "BILAN_ANNUEL",
            Self::Em1 => "EM1",
            Self::Em2 => "EM2",
            Self::Ec => "EC",
            Self::Ie1 => "IE1",
            Self::Ie2 => "IE2",
            Self::Ds1 => "DS1",
            Self::Ds2 => "DS2",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ObservationContinue => "Observation continue",
            Self::BilanTrimestriel => "Bilan trimestriel",
            Self::BilanAnnuel => "Bilan annuel",
            Self::Em1 => "Évaluation mensuelle 1",
            Self::Em2 => "Évaluation mensuelle 2",
            Self::Ec => "Évaluation certificative",
            Self::Ie1 => "Interrogation écrite 1",
            Self::Ie2 => "Interrogation écrite 2",
            Self::Ds1 => "Devoir surveillé 1",
            Self::Ds2 => "Devoir surveillé 2",
        }
    }
}

impl fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

const PRESCHOOL_EVALUATIONS: [EvaluationType; 3] = [
    EvaluationType::ObservationContinue,
    EvaluationType::BilanTrimestriel,
    EvaluationType::BilanAnnuel,
];

const PRIMARY_EVALUATIONS: [EvaluationType; 3] =
    [EvaluationType::Em1, EvaluationType::Em2, EvaluationType::Ec];

const SECONDARY_EVALUATIONS: [EvaluationType; 4] = [
    EvaluationType::Ie1,
    EvaluationType::Ie2,
    EvaluationType::Ds1,
    EvaluationType::Ds2,
];

/// Fixed evaluation vocabulary of a level.
pub fn available_evaluation_types(level: EducationLevel) -> &'static [EvaluationType] {
    match level {
        EducationLevel::Maternelle => &PRESCHOOL_EVALUATIONS,
        EducationLevel::Primaire => &PRIMARY_EVALUATIONS,
        EducationLevel::Secondaire1erCycle | EducationLevel::Secondaire2ndCycle => {
            &SECONDARY_EVALUATIONS
        }
    }
}

/// Only the upper-secondary cycle weights subjects by coefficient.
pub const fn coefficient_required(level: EducationLevel) -> bool {
    matches!(level, EducationLevel::Secondaire2ndCycle)
}

/// Level assigned to class labels that match no entry of [`LEVEL_LABELS`].
pub const DEFAULT_LEVEL: EducationLevel = EducationLevel::Secondaire1erCycle;

/// Grade labels per level, checked top to bottom against the normalised
/// class label. Multi-word entries match as a substring. Single-word entries
/// match a word of the label, optionally followed by a section suffix of up
/// to [`MAX_SECTION_SUFFIX`] letters or digits (`cm2a`, `6èmeb`, `tled`).
/// The two-letter preschool codes only match whole words.
pub const LEVEL_LABELS: &[(EducationLevel, &[&str])] = &[
    (
        EducationLevel::Maternelle,
        &[
            "maternelle",
            "ps",
            "ms",
            "gs",
            "petite section",
            "moyenne section",
            "grande section",
        ],
    ),
    (
        EducationLevel::Primaire,
        &["primaire", "ci", "cp", "ce1", "ce2", "cm1", "cm2"],
    ),
    (
        EducationLevel::Secondaire1erCycle,
        &[
            "6ème", "6eme", "6e", "5ème", "5eme", "5e", "4ème", "4eme", "4e", "3ème", "3eme", "3e",
            "sixième", "sixieme", "cinquième", "cinquieme", "quatrième", "quatrieme",
            "troisième", "troisieme",
        ],
    ),
    (
        EducationLevel::Secondaire2ndCycle,
        &[
            "2nde",
            "2de",
            "seconde",
            "1ère",
            "1ere",
            "1re",
            "première",
            "premiere",
            "terminale",
            "tle",
        ],
    ),
];

/// Longest section suffix glued to a grade, as in `cm2a` or `tled1`.
pub const MAX_SECTION_SUFFIX: usize = 2;

/// Matches a class label such as `"CM2"`, `"6ème B"` or `"Terminale D"`
/// against [`LEVEL_LABELS`]. Unmatched labels fall back to
/// [`DEFAULT_LEVEL`] and the fallback is logged.
pub fn resolve_education_level(grade_label: &str) -> EducationLevel {
    match match_level_label(grade_label) {
        Some(level) => level,
        None => {
            tracing::warn!(
                grade_label,
                fallback = %DEFAULT_LEVEL,
                "grade label matched no known level, using default"
            );
            DEFAULT_LEVEL
        }
    }
}

/// Same lookup as [`resolve_education_level`] without the fallback.
pub fn match_level_label(grade_label: &str) -> Option<EducationLevel> {
    let normalized = grade_label.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    let words: Vec<&str> = normalized
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == '/')
        .filter(|word| !word.is_empty())
        .collect();

    LEVEL_LABELS
        .iter()
        .find(|(level, labels)| {
            labels.iter().any(|label| {
                if label.contains(' ') {
                    normalized.contains(label)
                } else if *level == EducationLevel::Maternelle && label.chars().count() == 2 {
                    words.iter().any(|word| word == label)
                } else {
                    words.iter().any(|word| word_matches_grade(word, label))
                }
            })
        })
        .map(|(level, _)| *level)
}

fn word_matches_grade(word: &str, label: &str) -> bool {
    word.strip_prefix(label).is_some_and(|section| {
        section.chars().count() <= MAX_SECTION_SUFFIX
            && section.chars().all(char::is_alphanumeric)
    })
}
