mod assessment;
mod error;
mod grader;

pub use assessment::{AssessmentService, StartedSession};
pub use error::ServiceError;
pub use grader::{EvaluationResult, Grader, SubmissionRequest, TestCaseResult};
