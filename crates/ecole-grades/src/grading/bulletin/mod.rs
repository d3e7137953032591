//! Report cards ("bulletins") built on top of the grade engine.

mod compute;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
mod validation;

#[cfg(test)]
mod tests;

pub use compute::{
    annual_result, build_report_card, rank_report_cards, summarize_class, AnnualInput,
    AnnualResult,
};
pub use domain::{
    BulletinId, BulletinRequest, BulletinStatus, ClassReport, ClassSummary, Mark, ReportCard,
    StudentRef, SubjectLine, SubjectMarks,
};
pub use repository::{
    BulletinNotice, BulletinPublisher, BulletinRepository, PublishError, RepositoryError,
};
pub use router::bulletin_router;
pub use service::{BulletinService, BulletinServiceError};
pub use validation::{validate_class, validate_request, BulletinValidationError};
