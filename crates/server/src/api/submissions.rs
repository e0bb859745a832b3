use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDateTime;
use codegrade_core::domain::Language;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{LeaderboardEntry, SubmissionRecord};
use crate::service::{EvaluationResult, SubmissionRequest, TestCaseResult};

pub fn create_submission_router() -> Router<AppState> {
    Router::new()
        .route("/api/submissions", post(submit_code).get(list_submissions))
        .route("/api/leaderboard", get(leaderboard))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitCodeRequest {
    code: String,
    language: String,
    problem_id: String,
    #[serde(default)]
    run_only: bool,
    #[serde(default)]
    time_spent: Option<i64>,
    candidate_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunResultResponse {
    language: String,
    output: String,
    result: &'static str,
    passed_tests: u32,
    total_tests: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TestCaseResultDto {
    test_case_id: String,
    input: String,
    expected_output: String,
    actual_output: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<TestCaseResult> for TestCaseResultDto {
    fn from(result: TestCaseResult) -> Self {
        Self {
            test_case_id: result.test_case_id.to_string(),
            input: result.input,
            expected_output: result.expected_output,
            actual_output: result.actual_output,
            passed: result.passed,
            error: result.error,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionDto {
    id: String,
    problem_id: String,
    output: String,
    language: String,
    result: &'static str,
    passed_tests: u32,
    total_tests: u32,
    time_spent: Option<i64>,
    submitted_at: NaiveDateTime,
}

impl From<SubmissionRecord> for SubmissionDto {
    fn from(submission: SubmissionRecord) -> Self {
        Self {
            id: submission.id.to_string(),
            problem_id: submission.problem_id.to_string(),
            output: submission.output,
            language: submission.language.tag().to_string(),
            result: submission.verdict.as_str(),
            passed_tests: submission.passed_tests,
            total_tests: submission.total_tests,
            time_spent: submission.time_spent_secs,
            submitted_at: submission.submitted_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailedSubmissionResponse {
    #[serde(flatten)]
    submission: SubmissionDto,
    test_case_results: Vec<TestCaseResultDto>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SubmitCodeResponse {
    Run(RunResultResponse),
    Graded(Box<DetailedSubmissionResponse>),
}

async fn submit_code(
    State(state): State<AppState>,
    Json(request): Json<SubmitCodeRequest>,
) -> Result<Json<SubmitCodeResponse>, ApiError> {
    if request.language.trim().is_empty() {
        return Err(ApiError::validation("missing required field: language"));
    }
    if request.candidate_email.trim().is_empty() {
        return Err(ApiError::validation("missing required field: candidateEmail"));
    }
    let problem_id = request
        .problem_id
        .parse()
        .map_err(|_| ApiError::validation("problemId is not a valid id"))?;

    let result = state
        .grader
        .grade(
            SubmissionRequest {
                problem_id,
                code: request.code,
                language: Language::from_tag(&request.language),
                run_only: request.run_only,
                time_spent_secs: request.time_spent,
            },
            &request.candidate_email,
        )
        .await?;

    let response = match result {
        EvaluationResult::Run { language, output } => SubmitCodeResponse::Run(RunResultResponse {
            language: language.tag().to_string(),
            output,
            result: "RUN",
            passed_tests: 0,
            total_tests: 0,
        }),
        EvaluationResult::Graded {
            submission,
            test_case_results,
        } => SubmitCodeResponse::Graded(Box::new(DetailedSubmissionResponse {
            submission: submission.into(),
            test_case_results: test_case_results.into_iter().map(Into::into).collect(),
        })),
    };

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionsQuery {
    candidate_email: String,
}

async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionsQuery>,
) -> Result<Json<Vec<SubmissionDto>>, ApiError> {
    let submissions = state
        .grader
        .submissions_for_candidate(&query.candidate_email)
        .await?;

    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardDto {
    username: String,
    email: String,
    score: u64,
}

impl From<LeaderboardEntry> for LeaderboardDto {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            username: entry.username,
            email: entry.email,
            score: entry.score,
        }
    }
}

async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardDto>>, ApiError> {
    let entries = state.grader.leaderboard().await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
