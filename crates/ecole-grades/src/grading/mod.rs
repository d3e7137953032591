//! Grade computation engine.
//!
//! The averaging rules are pure functions: callers load raw marks, the engine
//! returns averages, mentions and qualitative descriptors, and callers persist
//! the results. [`bulletin`] is such a caller.
//! Missing or invalid marks are dropped; a computation with nothing left to
//! work on yields `None`.

mod averages;
pub mod bulletin;
mod dispatch;
mod level;
mod mention;
mod preschool;
pub mod router;
mod scores;
mod subjects;

pub use averages::{
    annual_average_primary, annual_average_secondary, numeric_average,
    subject_average_lower_secondary, subject_average_upper_secondary, term_average_lower_secondary,
    term_average_primary, term_average_upper_secondary,
};
pub use dispatch::{average_for_level, AveragingStrategy};
pub use level::{
    available_evaluation_types, coefficient_required, match_level_label, resolve_education_level,
    EducationLevel, EvaluationType, UnknownLevelCode, DEFAULT_LEVEL, LEVEL_LABELS,
};
pub use mention::{classify_mention, mention_scale, Mention};
pub use preschool::{classify_preschool, qualitative_evaluation, QualitativeEvaluation};
pub use router::grading_router;
pub use scores::{
    is_valid_coefficient, is_valid_preschool_code, is_valid_score, round2, InvalidPreschoolCode,
    PreschoolCode, ValidScores, MAX_SCORE, MIN_SCORE,
};
pub use subjects::{resolve_subject_group, SubjectGroup, SubjectGroupRule, SUBJECT_GROUP_RULES};
