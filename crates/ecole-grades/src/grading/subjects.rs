use super::level::EducationLevel;
use serde::{Deserialize, Serialize};

/// Pedagogical family a subject is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectGroup {
    LanguesEtLitterature,
    Sciences,
    SciencesSociales,
    Arts,
    Sport,
    Entrepreneuriat,
    Autres,
}

impl SubjectGroup {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LanguesEtLitterature => "Langues et Littérature",
            Self::Sciences => "Sciences",
            Self::SciencesSociales => "Sciences Sociales",
            Self::Arts => "Arts",
            Self::Sport => "Sport",
            Self::Entrepreneuriat => "Entrepreneuriat",
            Self::Autres => "Autres",
        }
    }
}

pub struct SubjectGroupRule {
    pub group: SubjectGroup,
    /// Levels the rule applies to; empty means every level.
    pub levels: &'static [EducationLevel],
    /// Lower-case substrings looked up in the lower-cased subject name.
    pub keywords: &'static [&'static str],
}

const SECONDARY_ONLY: &[EducationLevel] = &[
    EducationLevel::Secondaire1erCycle,
    EducationLevel::Secondaire2ndCycle,
];

/// Checked top to bottom. Sport precedes sciences so that "éducation
/// physique" is not read as physics, and social sciences precede sciences
/// for the same reason.
pub const SUBJECT_GROUP_RULES: &[SubjectGroupRule] = &[
    SubjectGroupRule {
        group: SubjectGroup::Sport,
        levels: &[],
        keywords: &[
            "eps",
            "éducation physique",
            "education physique",
            "sport",
            "athlétisme",
            "athletisme",
            "motricité",
            "motricite",
        ],
    },
    SubjectGroupRule {
        group: SubjectGroup::Entrepreneuriat,
        levels: SECONDARY_ONLY,
        keywords: &["entrepreneur"],
    },
    SubjectGroupRule {
        group: SubjectGroup::SciencesSociales,
        levels: &[],
        keywords: &[
            "histoire",
            "géographie",
            "geographie",
            "hist-géo",
            "hist-geo",
            "éducation sociale",
            "education sociale",
            "sciences sociales",
            "civique",
            "philosophie",
            "économie",
            "economie",
        ],
    },
    SubjectGroupRule {
        group: SubjectGroup::Arts,
        levels: &[],
        keywords: &[
            "arts",
            "artistique",
            "dessin",
            "musique",
            "chant",
            "théâtre",
            "theatre",
            "danse",
        ],
    },
    SubjectGroupRule {
        group: SubjectGroup::LanguesEtLitterature,
        levels: &[],
        keywords: &[
            "français",
            "francais",
            "anglais",
            "espagnol",
            "allemand",
            "lecture",
            "écriture",
            "ecriture",
            "littérature",
            "litterature",
            "expression",
            "langue",
            "langage",
            "communication",
        ],
    },
    SubjectGroupRule {
        group: SubjectGroup::Sciences,
        levels: &[],
        keywords: &[
            "math",
            "physique",
            "chimie",
            "pct",
            "svt",
            "sciences de la vie",
            "biologie",
            "informatique",
            "éducation scientifique",
            "education scientifique",
            "sciences",
            "technologie",
        ],
    },
];

/// Best-effort keyword classification of a French subject name.
pub fn resolve_subject_group(subject_name: &str, level: EducationLevel) -> SubjectGroup {
    let normalized = subject_name.trim().to_lowercase();
    if normalized.is_empty() {
        return SubjectGroup::Autres;
    }

    SUBJECT_GROUP_RULES
        .iter()
        .filter(|rule| rule.levels.is_empty() || rule.levels.contains(&level))
        .find(|rule| rule.keywords.iter().any(|keyword| normalized.contains(keyword)))
        .map(|rule| rule.group)
        .unwrap_or(SubjectGroup::Autres)
}
