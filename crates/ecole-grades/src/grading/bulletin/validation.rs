use crate::grading::{
    available_evaluation_types, coefficient_required, is_valid_coefficient,
    is_valid_preschool_code, is_valid_score, resolve_education_level, EducationLevel,
    EvaluationType,
};

use super::domain::BulletinRequest;

/// Request-level rejections raised before any averaging happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BulletinValidationError {
    #[error("student id must not be empty")]
    MissingStudent,
    #[error("term must be 1, 2 or 3 (got {0})")]
    InvalidTerm(u8),
    #[error("bulletin lists no subjects")]
    NoSubjects,
    #[error("subject '{subject}': mark {value} is outside 0-20")]
    ScoreOutOfRange { subject: String, value: f64 },
    #[error("subject '{subject}': {evaluation} is not an evaluation of level {level}")]
    UnexpectedEvaluation {
        subject: String,
        evaluation: EvaluationType,
        level: EducationLevel,
    },
    #[error("subject '{subject}': preschool subjects take qualitative codes, not marks")]
    NumericMarkInPreschool { subject: String },
    #[error("subject '{subject}': '{code}' is not a preschool code")]
    InvalidPreschoolCode { subject: String, code: String },
    #[error("subject '{subject}': a positive coefficient is required at {level}")]
    MissingCoefficient {
        subject: String,
        level: EducationLevel,
    },
    #[error("class batch mixes '{expected}' and '{found}'")]
    MixedClass { expected: String, found: String },
    #[error("class batch is empty")]
    EmptyClass,
}

/// Checks a request and returns the level its class label resolves to.
pub fn validate_request(
    request: &BulletinRequest,
) -> Result<EducationLevel, BulletinValidationError> {
    if request.student.id.trim().is_empty() {
        return Err(BulletinValidationError::MissingStudent);
    }
    if !(1..=3).contains(&request.term) {
        return Err(BulletinValidationError::InvalidTerm(request.term));
    }
    if request.subjects.is_empty() {
        return Err(BulletinValidationError::NoSubjects);
    }

    let level = resolve_education_level(&request.class_label);
    let vocabulary = available_evaluation_types(level);

    for subject in &request.subjects {
        for mark in &subject.marks {
            if !vocabulary.contains(&mark.evaluation) {
                return Err(BulletinValidationError::UnexpectedEvaluation {
                    subject: subject.name.clone(),
                    evaluation: mark.evaluation,
                    level,
                });
            }
            if let Some(value) = mark.value {
                if level == EducationLevel::Maternelle {
                    return Err(BulletinValidationError::NumericMarkInPreschool {
                        subject: subject.name.clone(),
                    });
                }
                if !is_valid_score(value) {
                    return Err(BulletinValidationError::ScoreOutOfRange {
                        subject: subject.name.clone(),
                        value,
                    });
                }
            }
        }

        if let Some(code) = &subject.qualitative {
            if !is_valid_preschool_code(code) {
                return Err(BulletinValidationError::InvalidPreschoolCode {
                    subject: subject.name.clone(),
                    code: code.clone(),
                });
            }
        }

        if coefficient_required(level)
            && !subject.coefficient.is_some_and(is_valid_coefficient)
        {
            return Err(BulletinValidationError::MissingCoefficient {
                subject: subject.name.clone(),
                level,
            });
        }
    }

    Ok(level)
}

/// Validates every request of a class batch and that they share a class and term.
pub fn validate_class(
    requests: &[BulletinRequest],
) -> Result<EducationLevel, BulletinValidationError> {
    let first = requests.first().ok_or(BulletinValidationError::EmptyClass)?;
    let level = validate_request(first)?;

    for request in &requests[1..] {
        if request.class_label != first.class_label || request.term != first.term {
            return Err(BulletinValidationError::MixedClass {
                expected: format!("{} T{}", first.class_label, first.term),
                found: format!("{} T{}", request.class_label, request.term),
            });
        }
        validate_request(request)?;
    }

    Ok(level)
}
