//! HTTP surface: the evaluation API, the session API, and admin listings.

pub mod assessments;
pub mod error;
pub mod state;
pub mod submissions;

pub use error::ApiError;
pub use state::AppState;

use axum::{Json, Router, routing::get};
use codegrade_api_types::HealthCheckResponse;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .merge(submissions::create_submission_router())
        .merge(assessments::create_assessment_router())
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
