use codegrade_core::domain::{ProblemId, SessionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("problem not found: {0}")]
    ProblemNotFound(ProblemId),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("assessment not found")]
    AssessmentNotFound,

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("assessment is not active")]
    InactiveAssessment,

    #[error("candidate has already started this assessment")]
    DuplicateSession,

    #[error("assessment already submitted")]
    AlreadySubmitted,

    #[error("no problems available for practice")]
    NoProblemsAvailable,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}
