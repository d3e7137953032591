use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::SchoolConfig;
use crate::grading::bulletin::domain::{
    BulletinId, BulletinRequest, Mark, ReportCard, StudentRef, SubjectMarks,
};
use crate::grading::bulletin::repository::{
    BulletinNotice, BulletinPublisher, BulletinRepository, PublishError, RepositoryError,
};
use crate::grading::bulletin::{bulletin_router, BulletinService};
use crate::grading::EvaluationType;

pub(super) fn school() -> SchoolConfig {
    SchoolConfig {
        name: "CEG Houéyiho".to_string(),
        academic_year: "2025-2026".to_string(),
    }
}

fn student(id: &str) -> StudentRef {
    StudentRef {
        id: id.to_string(),
        full_name: format!("Élève {id}"),
    }
}

fn mark(evaluation: EvaluationType, value: Option<f64>) -> Mark {
    Mark { evaluation, value }
}

fn primary_subject(name: &str, em1: f64, em2: f64, ec: Option<f64>) -> SubjectMarks {
    SubjectMarks {
        name: name.to_string(),
        coefficient: None,
        marks: vec![
            mark(EvaluationType::Em1, Some(em1)),
            mark(EvaluationType::Em2, Some(em2)),
            mark(EvaluationType::Ec, ec),
        ],
        qualitative: None,
    }
}

/// CM1, first term. Français averages 14.5 and Mathématiques 13, so the
/// student average is 13.75.
pub(super) fn primary_request(student_id: &str) -> BulletinRequest {
    BulletinRequest {
        student: student(student_id),
        class_label: "CM1".to_string(),
        term: 1,
        subjects: vec![
            primary_subject("Français", 14.0, 12.0, Some(16.0)),
            primary_subject("Mathématiques", 10.0, 12.0, Some(15.0)),
        ],
    }
}

/// Same class as [`primary_request`] with 17 in both subjects.
pub(super) fn top_primary_request(student_id: &str) -> BulletinRequest {
    BulletinRequest {
        subjects: vec![
            primary_subject("Français", 18.0, 16.0, Some(17.0)),
            primary_subject("Mathématiques", 18.0, 16.0, Some(17.0)),
        ],
        ..primary_request(student_id)
    }
}

/// No certifying evaluation yet, so no subject has an average.
pub(super) fn pending_primary_request(student_id: &str) -> BulletinRequest {
    BulletinRequest {
        subjects: vec![
            primary_subject("Français", 14.0, 12.0, None),
            primary_subject("Mathématiques", 10.0, 12.0, None),
        ],
        ..primary_request(student_id)
    }
}

fn secondary_subject(name: &str, coefficient: f64, marks: [f64; 4]) -> SubjectMarks {
    let [ie1, ie2, ds1, ds2] = marks;
    SubjectMarks {
        name: name.to_string(),
        coefficient: Some(coefficient),
        marks: vec![
            mark(EvaluationType::Ie1, Some(ie1)),
            mark(EvaluationType::Ie2, Some(ie2)),
            mark(EvaluationType::Ds1, Some(ds1)),
            mark(EvaluationType::Ds2, Some(ds2)),
        ],
        qualitative: None,
    }
}

/// Terminale D: Mathématiques 13 x 4 = 52, Philosophie 11 x 2 = 22,
/// term average 74 / 6 = 12.33.
pub(super) fn upper_secondary_request(student_id: &str) -> BulletinRequest {
    BulletinRequest {
        student: student(student_id),
        class_label: "Terminale D".to_string(),
        term: 2,
        subjects: vec![
            secondary_subject("Mathématiques", 4.0, [12.0, 14.0, 10.0, 16.0]),
            secondary_subject("Philosophie", 2.0, [10.0, 10.0, 11.0, 12.0]),
        ],
    }
}

pub(super) fn preschool_request(student_id: &str, codes: &[Option<&str>]) -> BulletinRequest {
    let names = ["Langage", "Éveil mathématique", "Motricité", "Dessin"];
    BulletinRequest {
        student: student(student_id),
        class_label: "Grande Section".to_string(),
        term: 1,
        subjects: names
            .iter()
            .zip(codes)
            .map(|(name, code)| SubjectMarks {
                name: name.to_string(),
                coefficient: None,
                marks: Vec::new(),
                qualitative: code.map(str::to_string),
            })
            .collect(),
    }
}

pub(super) fn build_service() -> (
    BulletinService<MemoryRepository, MemoryPublisher>,
    Arc<MemoryRepository>,
    Arc<MemoryPublisher>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let publisher = Arc::new(MemoryPublisher::default());
    let service = BulletinService::new(repository.clone(), publisher.clone(), school());
    (service, repository, publisher)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) report_cards: Arc<Mutex<BTreeMap<BulletinId, ReportCard>>>,
}

impl BulletinRepository for MemoryRepository {
    fn insert(&self, report_card: ReportCard) -> Result<ReportCard, RepositoryError> {
        let mut guard = self.report_cards.lock().expect("repository mutex poisoned");
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
        let mut guard = self.report_cards.lock().expect("repository mutex poisoned");
        if report_cards.iter().any(|card| guard.contains_key(&card.id)) {
            return Err(RepositoryError::Conflict);
        }
        for card in &report_cards {
            guard.insert(card.id.clone(), card.clone());
        }
        Ok(report_cards)
    }

    fn fetch(&self, id: &BulletinId) -> Result<Option<ReportCard>, RepositoryError> {
        let guard = self.report_cards.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_class(
        &self,
        class_label: &str,
        term: u8,
    ) -> Result<Vec<ReportCard>, RepositoryError> {
        let guard = self.report_cards.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|card| card.class_label == class_label && card.term == term)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    notices: Arc<Mutex<Vec<BulletinNotice>>>,
}

impl MemoryPublisher {
    pub(super) fn notices(&self) -> Vec<BulletinNotice> {
        self.notices.lock().expect("publisher mutex poisoned").clone()
    }
}

impl BulletinPublisher for MemoryPublisher {
    fn publish(&self, notice: BulletinNotice) -> Result<(), PublishError> {
        self.notices
            .lock()
            .expect("publisher mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl BulletinRepository for ConflictRepository {
    fn insert(&self, _report_card: ReportCard) -> Result<ReportCard, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn insert_all(
        &self,
        _report_cards: Vec<ReportCard>,
    ) -> Result<Vec<ReportCard>, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &BulletinId) -> Result<Option<ReportCard>, RepositoryError> {
        Ok(None)
    }

    fn list_for_class(
        &self,
        _class_label: &str,
        _term: u8,
    ) -> Result<Vec<ReportCard>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl BulletinRepository for UnavailableRepository {
    fn insert(&self, _report_card: ReportCard) -> Result<ReportCard, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_all(
        &self,
        _report_cards: Vec<ReportCard>,
    ) -> Result<Vec<ReportCard>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BulletinId) -> Result<Option<ReportCard>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_class(
        &self,
        _class_label: &str,
        _term: u8,
    ) -> Result<Vec<ReportCard>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflinePublisher;

impl BulletinPublisher for OfflinePublisher {
    fn publish(&self, _notice: BulletinNotice) -> Result<(), PublishError> {
        Err(PublishError::Transport("sms gateway unreachable".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn bulletin_router_with_service(
    service: BulletinService<MemoryRepository, MemoryPublisher>,
) -> axum::Router {
    bulletin_router(Arc::new(service))
}
