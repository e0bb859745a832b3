mod access_code;
mod difficulty;
mod executor;
mod ids;
mod language;
mod preprocess;
mod verdict;

pub use access_code::{AccessCode, PRACTICE_PREFIX};
pub use difficulty::Difficulty;
pub use executor::{CodeExecutor, ExecutorError};
pub use ids::{AssessmentId, ProblemId, SessionId, SubmissionId, TestCaseId, UserId};
pub use language::Language;
pub use preprocess::preprocess;
pub use verdict::Verdict;
