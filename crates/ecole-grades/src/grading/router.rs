//! Stateless HTTP endpoints over the grade engine.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::bulletin::{annual_result, AnnualInput};
use super::{
    average_for_level, available_evaluation_types, classify_mention, classify_preschool,
    coefficient_required, is_valid_score, match_level_label, resolve_education_level,
    resolve_subject_group, subject_average_lower_secondary, subject_average_upper_secondary,
    term_average_lower_secondary, term_average_primary, term_average_upper_secondary,
    EducationLevel, EvaluationType, Mention, SubjectGroup,
};

pub fn grading_router() -> Router {
    Router::new()
        .route("/api/v1/grades/average", post(average_handler))
        .route("/api/v1/grades/subject", post(subject_handler))
        .route("/api/v1/grades/term", post(term_handler))
        .route("/api/v1/grades/annual", post(annual_handler))
        .route("/api/v1/grades/mention", post(mention_handler))
        .route("/api/v1/grades/preschool/:code", get(preschool_handler))
        .route("/api/v1/levels/:label", get(level_handler))
        .route("/api/v1/subjects/group", get(subject_group_handler))
}

#[derive(Debug, Deserialize)]
pub(crate) struct AverageRequest {
    pub(crate) scores: Vec<Option<f64>>,
    #[serde(default)]
    pub(crate) level: Option<EducationLevel>,
    #[serde(default)]
    pub(crate) class_label: Option<String>,
    #[serde(default)]
    pub(crate) evaluation_type: Option<EvaluationType>,
    #[serde(default)]
    pub(crate) coefficients: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AverageResponse {
    pub(crate) level: EducationLevel,
    pub(crate) average: Option<f64>,
    pub(crate) mention: Option<Mention>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "pathway", rename_all = "snake_case")]
pub(crate) enum SubjectRequest {
    LowerSecondary {
        ie1: Option<f64>,
        ie2: Option<f64>,
        ds1: Option<f64>,
        ds2: Option<f64>,
    },
    UpperSecondary {
        ie1: Option<f64>,
        ie2: Option<f64>,
        ds1: Option<f64>,
        ds2: Option<f64>,
        coefficient: Option<f64>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "pathway", rename_all = "snake_case")]
pub(crate) enum TermRequest {
    Primary {
        em1: Option<f64>,
        em2: Option<f64>,
        ec: Option<f64>,
    },
    LowerSecondary {
        subject_averages: Vec<Option<f64>>,
    },
    UpperSecondary {
        weighted_subject_averages: Vec<Option<f64>>,
        coefficients: Vec<Option<f64>>,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct ComputedAverage {
    pub(crate) average: Option<f64>,
    pub(crate) mention: Option<Mention>,
}

impl ComputedAverage {
    fn new(average: Option<f64>) -> Self {
        Self {
            average,
            mention: average.map(classify_mention),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MentionRequest {
    pub(crate) average: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationTypeView {
    pub(crate) code: &'static str,
    pub(crate) label: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LevelView {
    pub(crate) grade_label: String,
    pub(crate) level: EducationLevel,
    pub(crate) level_label: &'static str,
    /// False when the label was unknown and the default level was used.
    pub(crate) matched: bool,
    pub(crate) coefficient_required: bool,
    pub(crate) evaluation_types: Vec<EvaluationTypeView>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubjectGroupQuery {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) level: Option<EducationLevel>,
    #[serde(default)]
    pub(crate) class_label: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectGroupView {
    pub(crate) name: String,
    pub(crate) level: EducationLevel,
    pub(crate) group: SubjectGroup,
    pub(crate) group_label: &'static str,
}

pub(crate) async fn average_handler(Json(request): Json<AverageRequest>) -> Response {
    let level = match (request.level, request.class_label.as_deref()) {
        (Some(level), _) => level,
        (None, Some(label)) => resolve_education_level(label),
        (None, None) => {
            return unprocessable("either level or class_label is required".to_string())
        }
    };

    if let Some(value) = request
        .scores
        .iter()
        .flatten()
        .find(|value| !is_valid_score(**value))
    {
        return unprocessable(format!("score {value} is outside 0-20"));
    }

    let average = average_for_level(
        &request.scores,
        request.evaluation_type,
        level,
        request.coefficients.as_deref(),
    );

    Json(AverageResponse {
        level,
        average,
        mention: average.map(classify_mention),
    })
    .into_response()
}

pub(crate) async fn subject_handler(Json(request): Json<SubjectRequest>) -> Response {
    let (marks, average) = match request {
        SubjectRequest::LowerSecondary { ie1, ie2, ds1, ds2 } => (
            [ie1, ie2, ds1, ds2],
            subject_average_lower_secondary(ie1, ie2, ds1, ds2),
        ),
        SubjectRequest::UpperSecondary {
            ie1,
            ie2,
            ds1,
            ds2,
            coefficient,
        } => (
            [ie1, ie2, ds1, ds2],
            subject_average_upper_secondary(ie1, ie2, ds1, ds2, coefficient),
        ),
    };

    if let Some(value) = marks.iter().flatten().find(|value| !is_valid_score(**value)) {
        return unprocessable(format!("score {value} is outside 0-20"));
    }

    // A weighted subject average is not on the 0-20 scale, so no mention.
    Json(json!({ "average": average })).into_response()
}

pub(crate) async fn term_handler(Json(request): Json<TermRequest>) -> Json<ComputedAverage> {
    let average = match request {
        TermRequest::Primary { em1, em2, ec } => term_average_primary(em1, em2, ec),
        TermRequest::LowerSecondary { subject_averages } => {
            term_average_lower_secondary(&subject_averages)
        }
        TermRequest::UpperSecondary {
            weighted_subject_averages,
            coefficients,
        } => term_average_upper_secondary(&weighted_subject_averages, &coefficients),
    };
    Json(ComputedAverage::new(average))
}

pub(crate) async fn annual_handler(Json(input): Json<AnnualInput>) -> Response {
    Json(annual_result(&input)).into_response()
}

pub(crate) async fn mention_handler(Json(request): Json<MentionRequest>) -> Json<Mention> {
    Json(classify_mention(request.average))
}

pub(crate) async fn preschool_handler(Path(code): Path<String>) -> Response {
    Json(classify_preschool(&code)).into_response()
}

pub(crate) async fn level_handler(Path(grade_label): Path<String>) -> Json<LevelView> {
    let matched = match_level_label(&grade_label).is_some();
    let level = resolve_education_level(&grade_label);

    Json(LevelView {
        level,
        level_label: level.label(),
        matched,
        coefficient_required: coefficient_required(level),
        evaluation_types: available_evaluation_types(level)
            .iter()
            .map(|evaluation| EvaluationTypeView {
                code: evaluation.code(),
                label: evaluation.label(),
            })
            .collect(),
        grade_label,
    })
}

pub(crate) async fn subject_group_handler(Query(query): Query<SubjectGroupQuery>) -> Response {
    let level = match (query.level, query.class_label.as_deref()) {
        (Some(level), _) => level,
        (None, Some(label)) => resolve_education_level(label),
        (None, None) => {
            return unprocessable("either level or class_label is required".to_string())
        }
    };

    let group = resolve_subject_group(&query.name, level);
    Json(SubjectGroupView {
        name: query.name,
        level,
        group,
        group_label: group.label(),
    })
    .into_response()
}

fn unprocessable(message: String) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message })),
    )
        .into_response()
}
