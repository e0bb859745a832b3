pub mod assessment;
pub mod assessment_problem;
pub mod assessment_session;
pub mod problem;
pub mod submission;
pub mod test_case;
pub mod user;
