use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{BulletinId, ReportCard};

/// Storage abstraction so the service can be exercised without a database.
pub trait BulletinRepository: Send + Sync {
    fn insert(&self, report_card: ReportCard) -> Result<ReportCard, RepositoryError>;
    /// Stores a whole class batch or nothing: a conflict or failure on any
    /// report card leaves the repository unchanged.
    fn insert_all(&self, report_cards: Vec<ReportCard>) -> Result<Vec<ReportCard>, RepositoryError>;
    fn fetch(&self, id: &BulletinId) -> Result<Option<ReportCard>, RepositoryError>;
    fn list_for_class(
        &self,
        class_label: &str,
        term: u8,
    ) -> Result<Vec<ReportCard>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for families' notifications (e-mail, SMS, WhatsApp adapters).
pub trait BulletinPublisher: Send + Sync {
    fn publish(&self, notice: BulletinNotice) -> Result<(), PublishError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletinNotice {
    pub template: String,
    pub bulletin_id: BulletinId,
    pub student_id: String,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
