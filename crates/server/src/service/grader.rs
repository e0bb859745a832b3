//! Submission evaluation pipeline: preprocess, dispatch to the execution
//! backend, compare outputs, classify, persist.

use std::sync::Arc;

use codegrade_core::domain::{CodeExecutor, Language, ProblemId, TestCaseId, Verdict, preprocess};
use tracing::{info, warn};

use crate::repository::{
    LeaderboardEntry, NewSubmission, ProblemRepository, SubmissionRecord, SubmissionRepository,
    TestCaseRecord, TestCaseRepository, UserRepository,
};
use crate::service::ServiceError;

#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub problem_id: ProblemId,
    pub code: String,
    pub language: Language,
    pub run_only: bool,
    pub time_spent_secs: Option<i64>,
}

/// Outcome of one test case, produced fresh on every grading call and never
/// stored as its own entity.
#[derive(Debug, Clone)]
pub struct TestCaseResult {
    pub test_case_id: TestCaseId,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub passed: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum EvaluationResult {
    /// Run-only request: executed against the sample input, never graded and
    /// never persisted.
    Run { language: Language, output: String },
    /// Graded submission with its per-case breakdown.
    Graded {
        submission: SubmissionRecord,
        test_case_results: Vec<TestCaseResult>,
    },
}

pub struct Grader {
    problems: Arc<dyn ProblemRepository>,
    test_cases: Arc<dyn TestCaseRepository>,
    users: Arc<dyn UserRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    executor: Arc<dyn CodeExecutor>,
}

impl Grader {
    pub fn new(
        problems: Arc<dyn ProblemRepository>,
        test_cases: Arc<dyn TestCaseRepository>,
        users: Arc<dyn UserRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        executor: Arc<dyn CodeExecutor>,
    ) -> Self {
        Self {
            problems,
            test_cases,
            users,
            submissions,
            executor,
        }
    }

    #[tracing::instrument(skip(self, request), fields(problem_id = %request.problem_id, language = %request.language))]
    pub async fn grade(
        &self,
        request: SubmissionRequest,
        candidate_email: &str,
    ) -> Result<EvaluationResult, ServiceError> {
        if request.code.trim().is_empty() {
            return Err(ServiceError::MissingField("code"));
        }

        let problem = self
            .problems
            .find_by_id(request.problem_id)
            .await?
            .ok_or(ServiceError::ProblemNotFound(request.problem_id))?;
        let user = self
            .users
            .find_by_email(candidate_email)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(candidate_email.to_string()))?;

        // Display run against the sample input. Its output is for the UI
        // only; a backend failure here never aborts the submission.
        let display_output = self
            .run_for_display(&request.code, &request.language, &problem.sample_input)
            .await;

        if request.run_only {
            info!("run-only request, skipping grading");
            return Ok(EvaluationResult::Run {
                language: request.language,
                output: display_output,
            });
        }

        let test_cases = self.test_cases.list_by_problem(problem.id).await?;
        let mut results = Vec::with_capacity(test_cases.len());
        let mut passed_count: u32 = 0;

        for test_case in &test_cases {
            let result = self
                .run_test_case(&request.code, &request.language, test_case)
                .await;
            if result.passed {
                passed_count += 1;
            }
            results.push(result);
        }

        let total = u32::try_from(test_cases.len()).map_err(anyhow::Error::from)?;
        let verdict = Verdict::classify(passed_count, total);

        let submission = self
            .submissions
            .create(NewSubmission {
                user_id: user.id,
                problem_id: problem.id,
                code: request.code,
                output: display_output,
                passed_tests: passed_count,
                total_tests: total,
                language: request.language,
                verdict,
                time_spent_secs: request.time_spent_secs,
            })
            .await?;

        info!(
            submission_id = %submission.id,
            verdict = %verdict,
            passed = passed_count,
            total,
            "submission graded"
        );

        Ok(EvaluationResult::Graded {
            submission,
            test_case_results: results,
        })
    }

    pub async fn submissions_for_candidate(
        &self,
        candidate_email: &str,
    ) -> Result<Vec<SubmissionRecord>, ServiceError> {
        let user = self
            .users
            .find_by_email(candidate_email)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(candidate_email.to_string()))?;

        Ok(self.submissions.list_by_user(user.id).await?)
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        Ok(self.submissions.leaderboard().await?)
    }

    async fn run_for_display(&self, code: &str, language: &Language, sample_input: &str) -> String {
        let prepared = preprocess(code, language, sample_input);
        match self.executor.execute(&prepared, language, "").await {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "display run failed");
                format!("Error: {err}")
            }
        }
    }

    /// A backend failure degrades this one case to not-passed with the error
    /// attached; the grading loop keeps going.
    async fn run_test_case(
        &self,
        code: &str,
        language: &Language,
        test_case: &TestCaseRecord,
    ) -> TestCaseResult {
        let prepared = preprocess(code, language, &test_case.input);
        match self.executor.execute(&prepared, language, "").await {
            Ok(actual_output) => {
                let passed = actual_output.trim() == test_case.expected_output.trim();
                TestCaseResult {
                    test_case_id: test_case.id,
                    input: test_case.input.clone(),
                    expected_output: test_case.expected_output.clone(),
                    actual_output,
                    passed,
                    error: None,
                }
            }
            Err(err) => {
                warn!(test_case_id = %test_case.id, error = %err, "test case execution failed");
                TestCaseResult {
                    test_case_id: test_case.id,
                    input: test_case.input.clone(),
                    expected_output: test_case.expected_output.clone(),
                    actual_output: format!("Error: {err}"),
                    passed: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
