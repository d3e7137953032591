use chrono::{DateTime, Utc};
use ecole_grades::grading::bulletin::{
    BulletinId, BulletinNotice, BulletinPublisher, BulletinRepository, PublishError, ReportCard,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBulletinRepository {
    report_cards: Arc<Mutex<HashMap<BulletinId, ReportCard>>>,
}

impl BulletinRepository for InMemoryBulletinRepository {
    fn insert(&self, report_card: ReportCard) -> Result<ReportCard, RepositoryError> {
        let mut guard = self
            .report_cards
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        if guard.contains_key(&report_card.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report_card.id.clone(), report_card.clone());
        Ok(report_card)
    }

    fn insert_all(
        &self,
        report_cards: Vec<ReportCard>,
    ) -> Result<Vec<ReportCard>, RepositoryError> {
        let mut guard = self
            .report_cards
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut ids = HashSet::with_capacity(report_cards.len());
        if report_cards
            .iter()
            .any(|card| guard.contains_key(&card.id) || !ids.insert(&card.id))
        {
            return Err(RepositoryError::Conflict);
        }
        for card in &report_cards {
            guard.insert(card.id.clone(), card.clone());
        }
        Ok(report_cards)
    }

    fn fetch(&self, id: &BulletinId) -> Result<Option<ReportCard>, RepositoryError> {
        let guard = self
            .report_cards
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn list_for_class(
        &self,
        class_label: &str,
        term: u8,
    ) -> Result<Vec<ReportCard>, RepositoryError> {
        let guard = self
            .report_cards
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut report_cards: Vec<ReportCard> = guard
            .values()
            .filter(|card| card.class_label == class_label && card.term == term)
            .cloned()
            .collect();
        report_cards.sort_by(|left, right| {
            left.rank
                .unwrap_or(usize::MAX)
                .cmp(&right.rank.unwrap_or(usize::MAX))
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(report_cards)
    }
}

/// Notice recorded by the in-memory publisher.
#[derive(Debug, Clone)]
pub(crate) struct SentNotice {
    pub(crate) sent_at: DateTime<Utc>,
    pub(crate) notice: BulletinNotice,
}

/// Stands in for the e-mail/SMS gateways: notices are logged and kept.
#[derive(Default, Clone)]
pub(crate) struct InMemoryBulletinPublisher {
    sent: Arc<Mutex<Vec<SentNotice>>>,
}

impl BulletinPublisher for InMemoryBulletinPublisher {
    fn publish(&self, notice: BulletinNotice) -> Result<(), PublishError> {
        let sent_at = Utc::now();
        tracing::info!(
            template = %notice.template,
            bulletin_id = %notice.bulletin_id.0,
            student_id = %notice.student_id,
            %sent_at,
            "bulletin notice queued"
        );
        let mut guard = self
            .sent
            .lock()
            .map_err(|_| PublishError::Transport("publisher mutex poisoned".to_string()))?;
        guard.push(SentNotice { sent_at, notice });
        Ok(())
    }
}

impl InMemoryBulletinPublisher {
    pub(crate) fn sent(&self) -> Vec<SentNotice> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}
