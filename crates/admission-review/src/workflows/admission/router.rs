use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{MeritCourseConfig, RequirementTree, TranscriptDocument};
use super::service::{AdmissionReviewService, ReviewServiceError};
use super::store::ConfigStore;

/// Request body for review and merge calls.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsRequest {
    #[serde(default)]
    pub documents: Vec<TranscriptDocument>,
}

/// Router builder exposing review, merge and configuration endpoints.
pub fn admission_router<S>(service: Arc<AdmissionReviewService<S>>) -> Router
where
    S: ConfigStore + 'static,
{
    Router::new()
        .route("/api/v1/admission/review", post(review_handler::<S>))
        .route("/api/v1/admission/merge", post(merge_handler::<S>))
        .route(
            "/api/v1/admission/config/requirements",
            get(requirements_handler::<S>).put(save_requirements_handler::<S>),
        )
        .route(
            "/api/v1/admission/config/merit-courses",
            get(merit_courses_handler::<S>).put(save_merit_courses_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn review_handler<S>(
    State(service): State<Arc<AdmissionReviewService<S>>>,
    axum::Json(request): axum::Json<DocumentsRequest>,
) -> Response
where
    S: ConfigStore + 'static,
{
    match off_runtime(service, move |service| service.review(&request.documents)).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn merge_handler<S>(
    State(service): State<Arc<AdmissionReviewService<S>>>,
    axum::Json(request): axum::Json<DocumentsRequest>,
) -> Response
where
    S: ConfigStore + 'static,
{
    match service.merge(&request.documents) {
        Ok(merged) => (StatusCode::OK, axum::Json(merged)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn requirements_handler<S>(
    State(service): State<Arc<AdmissionReviewService<S>>>,
) -> Response
where
    S: ConfigStore + 'static,
{
    match off_runtime(service, |service| service.requirements()).await {
        Ok(Some(tree)) => (StatusCode::OK, axum::Json(tree)).into_response(),
        Ok(None) => not_configured("course requirements"),
        Err(response) => response,
    }
}

pub(crate) async fn save_requirements_handler<S>(
    State(service): State<Arc<AdmissionReviewService<S>>>,
    axum::Json(tree): axum::Json<RequirementTree>,
) -> Response
where
    S: ConfigStore + 'static,
{
    match off_runtime(service, move |service| service.save_requirements(&tree)).await {
        Ok(()) => saved(),
        Err(response) => response,
    }
}

pub(crate) async fn merit_courses_handler<S>(
    State(service): State<Arc<AdmissionReviewService<S>>>,
) -> Response
where
    S: ConfigStore + 'static,
{
    match off_runtime(service, |service| service.merit_courses()).await {
        Ok(Some(courses)) => (StatusCode::OK, axum::Json(courses)).into_response(),
        Ok(None) => not_configured("merit course list"),
        Err(response) => response,
    }
}

pub(crate) async fn save_merit_courses_handler<S>(
    State(service): State<Arc<AdmissionReviewService<S>>>,
    axum::Json(courses): axum::Json<Vec<MeritCourseConfig>>,
) -> Response
where
    S: ConfigStore + 'static,
{
    match off_runtime(service, move |service| service.save_merit_courses(&courses)).await {
        Ok(()) => saved(),
        Err(response) => response,
    }
}

/// Store implementations may block on file or network IO, so calls that touch
/// the store run on the blocking pool.
async fn off_runtime<S, T, F>(
    service: Arc<AdmissionReviewService<S>>,
    call: F,
) -> Result<T, Response>
where
    S: ConfigStore + 'static,
    T: Send + 'static,
    F: FnOnce(&AdmissionReviewService<S>) -> Result<T, ReviewServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || call(&service)).await {
        Ok(result) => result.map_err(error_response),
        Err(join_error) => {
            error!(error = %join_error, "admission store task failed");
            let payload = json!({
                "error": "admission store task failed",
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

fn saved() -> Response {
    (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response()
}

fn not_configured(what: &str) -> Response {
    let payload = json!({
        "error": format!("{what} not configured"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

pub(crate) fn error_status(error: &ReviewServiceError) -> StatusCode {
    match error {
        ReviewServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReviewServiceError::Evaluation(_) => StatusCode::BAD_REQUEST,
        ReviewServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: ReviewServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error_status(&error), axum::Json(payload)).into_response()
}
