use super::scores::PreschoolCode;
use serde::Serialize;

/// Descriptor attached to a preschool qualitative mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualitativeEvaluation {
    /// `None` for the "not yet evaluated" fallback.
    pub code: Option<PreschoolCode>,
    pub label: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub recommendation: &'static str,
}

impl QualitativeEvaluation {
    pub const fn is_evaluated(&self) -> bool {
        self.code.is_some()
    }
}

const TRES_SATISFAISANT: QualitativeEvaluation = QualitativeEvaluation {
    code: Some(PreschoolCode::TresSatisfaisant),
    label: "Très Satisfaisant",
    emoji: "🌟",
    description: "Les compétences visées sont pleinement acquises.",
    recommendation: "Proposer des activités d'enrichissement.",
};

const SATISFAISANT: QualitativeEvaluation = QualitativeEvaluation {
    code: Some(PreschoolCode::Satisfaisant),
    label: "Satisfaisant",
    emoji: "🙂",
    description: "Les compétences visées sont en bonne voie d'acquisition.",
    recommendation: "Poursuivre les activités en cours pour consolider les acquis.",
};

const PEU_SATISFAISANT: QualitativeEvaluation = QualitativeEvaluation {
    code: Some(PreschoolCode::PeuSatisfaisant),
    label: "Peu Satisfaisant",
    emoji: "🌱",
    description: "Les compétences visées ne sont pas encore acquises.",
    recommendation: "Prévoir un accompagnement individualisé et informer la famille.",
};

const NON_EVALUE: QualitativeEvaluation = QualitativeEvaluation {
    code: None,
    label: "Non évalué",
    emoji: "➖",
    description: "Aucune appréciation n'a encore été saisie.",
    recommendation: "Compléter l'évaluation avant l'édition du bulletin.",
};

pub fn qualitative_evaluation(code: PreschoolCode) -> QualitativeEvaluation {
    match code {
        PreschoolCode::TresSatisfaisant => TRES_SATISFAISANT,
        PreschoolCode::Satisfaisant => SATISFAISANT,
        PreschoolCode::PeuSatisfaisant => PEU_SATISFAISANT,
    }
}

/// Unrecognised codes map to the "Non évalué" descriptor.
pub fn classify_preschool(code: &str) -> QualitativeEvaluation {
    code.parse::<PreschoolCode>()
        .map(qualitative_evaluation)
        .unwrap_or(NON_EVALUE)
}
