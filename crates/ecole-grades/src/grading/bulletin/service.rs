use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::config::SchoolConfig;

use super::compute::{build_report_card, rank_report_cards, summarize_class};
use super::domain::{BulletinId, BulletinRequest, BulletinStatus, ClassReport, ReportCard};
use super::repository::{
    BulletinNotice, BulletinPublisher, BulletinRepository, RepositoryError,
};
use super::validation::{validate_class, validate_request, BulletinValidationError};

/// Service composing validation, the grade engine, storage and notifications.
pub struct BulletinService<R, P> {
    repository: Arc<R>,
    publisher: Arc<P>,
    school: SchoolConfig,
}

static BULLETIN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_bulletin_id() -> BulletinId {
    let id = BULLETIN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BulletinId(format!("bul-{id:06}"))
}

impl<R, P> BulletinService<R, P>
where
    R: BulletinRepository + 'static,
    P: BulletinPublisher + 'static,
{
    pub fn new(repository: Arc<R>, publisher: Arc<P>, school: SchoolConfig) -> Self {
        Self {
            repository,
            publisher,
            school,
        }
    }

    pub fn school(&self) -> &SchoolConfig {
        &self.school
    }

    /// Validate, compute and store one report card. A failed notice does not
    /// undo the stored report card.
    pub fn generate(
        &self,
        request: BulletinRequest,
    ) -> Result<ReportCard, BulletinServiceError> {
        let level = validate_request(&request)?;
        let report_card =
            build_report_card(next_bulletin_id(), &request, level, &self.school, today());

        let stored = self.repository.insert(report_card)?;
        self.notify(&stored);
        Ok(stored)
    }

    /// Validate the whole batch up front, then compute, rank and store every
    /// report card of a class in one write. Notices go out only once the
    /// batch is stored.
    pub fn generate_class(
        &self,
        requests: Vec<BulletinRequest>,
    ) -> Result<ClassReport, BulletinServiceError> {
        let level = validate_class(&requests)?;
        let generated_on = today();

        let mut report_cards: Vec<ReportCard> = requests
            .iter()
            .map(|request| {
                build_report_card(next_bulletin_id(), request, level, &self.school, generated_on)
            })
            .collect();
        rank_report_cards(&mut report_cards);

        let (class_label, term) = (requests[0].class_label.clone(), requests[0].term);
        let summary = summarize_class(&class_label, level, term, &report_cards);

        let stored = self.repository.insert_all(report_cards)?;
        let undelivered = stored
            .iter()
            .filter(|report_card| !self.notify(report_card))
            .count();

        tracing::info!(
            class_label = %summary.class_label,
            term,
            size = summary.size,
            ranked = summary.ranked,
            class_average = ?summary.class_average,
            undelivered,
            "class report cards generated"
        );

        Ok(ClassReport {
            summary,
            report_cards: stored,
        })
    }

    pub fn get(&self, id: &BulletinId) -> Result<ReportCard, BulletinServiceError> {
        let report_card = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(report_card)
    }

    pub fn list_for_class(
        &self,
        class_label: &str,
        term: u8,
    ) -> Result<Vec<ReportCard>, BulletinServiceError> {
        Ok(self.repository.list_for_class(class_label, term)?)
    }

    /// Pending report cards are stored but families are not notified yet.
    /// Returns false when the publisher rejected the notice.
    fn notify(&self, report_card: &ReportCard) -> bool {
        if report_card.status == BulletinStatus::Pending {
            return true;
        }

        let mut details = BTreeMap::new();
        details.insert("class".to_string(), report_card.class_label.clone());
        details.insert("term".to_string(), report_card.term.to_string());
        details.insert("average".to_string(), report_card.average_display());
        if let Some(mention) = report_card.mention {
            details.insert("mention".to_string(), mention.label.to_string());
        }
        if let Some(rank) = report_card.rank {
            details.insert("rank".to_string(), rank.to_string());
        }

        let notice = BulletinNotice {
            template: "bulletin_ready".to_string(),
            bulletin_id: report_card.id.clone(),
            student_id: report_card.student.id.clone(),
            details,
        };
        match self.publisher.publish(notice) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    %error,
                    bulletin_id = %report_card.id.0,
                    student_id = %report_card.student.id,
                    "bulletin stored but notice not delivered"
                );
                false
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Error raised by the bulletin service.
#[derive(Debug, thiserror::Error)]
pub enum BulletinServiceError {
    #[error(transparent)]
    Validation(#[from] BulletinValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
