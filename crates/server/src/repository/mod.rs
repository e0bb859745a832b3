mod assessment_repository;
mod assessment_session_repository;
mod problem_repository;
mod submission_repository;
mod test_case_repository;
mod user_repository;

pub use assessment_repository::{
    AssessmentRecord, AssessmentRepository, NewAssessment, SeaOrmAssessmentRepository,
};
pub use assessment_session_repository::{
    NewSession, SeaOrmSessionRepository, SessionRecord, SessionRepository,
};
pub use problem_repository::{NewProblem, ProblemRecord, ProblemRepository, SeaOrmProblemRepository};
pub use submission_repository::{
    LeaderboardEntry, NewSubmission, SeaOrmSubmissionRepository, SubmissionRecord,
    SubmissionRepository,
};
pub use test_case_repository::{
    NewTestCase, SeaOrmTestCaseRepository, TestCaseRecord, TestCaseRepository,
};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserRecord, UserRepository};
