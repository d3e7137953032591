use super::averages::{numeric_average, weighted_mean};
use super::level::{EducationLevel, EvaluationType};

/// How raw marks are combined at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AveragingStrategy {
    /// Preschool uses qualitative marks only.
    Qualitative,
    Unweighted,
    CoefficientWeighted,
}

impl AveragingStrategy {
    pub const fn for_level(level: EducationLevel) -> Self {
        match level {
            EducationLevel::Maternelle => Self::Qualitative,
            EducationLevel::Primaire | EducationLevel::Secondaire1erCycle => Self::Unweighted,
            EducationLevel::Secondaire2ndCycle => Self::CoefficientWeighted,
        }
    }

    pub fn average(
        self,
        scores: &[Option<f64>],
        coefficients: Option<&[Option<f64>]>,
    ) -> Option<f64> {
        match self {
            Self::Qualitative => None,
            Self::Unweighted => numeric_average(scores),
            Self::CoefficientWeighted => match coefficients {
                Some(coefficients) if coefficients.len() == scores.len() => {
                    weighted_mean(scores, coefficients)
                }
                Some(coefficients) => {
                    tracing::debug!(
                        scores = scores.len(),
                        coefficients = coefficients.len(),
                        "coefficient count differs from score count, averaging unweighted"
                    );
                    numeric_average(scores)
                }
                None => numeric_average(scores),
            },
        }
    }
}

/// Averages `scores` the way `level` prescribes. The evaluation type is
/// carried for tracing only; it does not change the arithmetic.
pub fn average_for_level(
    scores: &[Option<f64>],
    evaluation_type: Option<EvaluationType>,
    level: EducationLevel,
    coefficients: Option<&[Option<f64>]>,
) -> Option<f64> {
    let strategy = AveragingStrategy::for_level(level);
    let average = strategy.average(scores, coefficients);
    tracing::trace!(
        %level,
        ?evaluation_type,
        ?strategy,
        ?average,
        "averaged marks"
    );
    average
}
