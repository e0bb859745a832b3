use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use codegrade_api_types::ErrorResponse;
use tracing::error;

use crate::service::ServiceError;

/// HTTP-facing error: a status, a stable machine code, and a message safe
/// to show callers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "VALIDATION_ERROR",
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let (status, code) = match &err {
            ServiceError::ProblemNotFound(_) => (StatusCode::NOT_FOUND, "PROBLEM_NOT_FOUND"),
            ServiceError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            ServiceError::AssessmentNotFound => (StatusCode::NOT_FOUND, "ASSESSMENT_NOT_FOUND"),
            ServiceError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            ServiceError::InactiveAssessment => (StatusCode::CONFLICT, "ASSESSMENT_INACTIVE"),
            ServiceError::DuplicateSession => (StatusCode::CONFLICT, "DUPLICATE_SESSION"),
            ServiceError::AlreadySubmitted => (StatusCode::CONFLICT, "ALREADY_SUBMITTED"),
            ServiceError::NoProblemsAvailable => (StatusCode::CONFLICT, "NO_PROBLEMS_AVAILABLE"),
            ServiceError::MissingField(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            ServiceError::Repository(source) => {
                // Storage details stay out of the response body.
                error!(error = %source, "repository failure");
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "INTERNAL_ERROR",
                    message: "internal error".to_string(),
                };
            }
        };

        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            code: self.code.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
