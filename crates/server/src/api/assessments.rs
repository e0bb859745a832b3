use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDateTime;
use codegrade_core::domain::{AssessmentId, ProblemId};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;
use crate::repository::{AssessmentRecord, ProblemRecord, SessionRecord};
use crate::service::StartedSession;

pub fn create_assessment_router() -> Router<AppState> {
    Router::new()
        .route("/api/assessments", post(create_assessment).get(list_assessments))
        .route("/api/assessments/sessions", get(list_sessions))
        .route("/api/assessments/start", post(start_assessment))
        .route("/api/assessments/practice", post(start_practice))
        .route("/api/assessments/submit", post(submit_score))
        .route("/api/assessments/{id}/deactivate", post(deactivate_assessment))
        .route("/api/assessments/{id}/duplicate", post(duplicate_assessment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAssessmentRequest {
    problem_ids: Vec<String>,
    time_limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentDto {
    id: String,
    access_code: String,
    problem_ids: Vec<String>,
    time_limit: u32,
    active: bool,
    created_at: NaiveDateTime,
}

impl From<AssessmentRecord> for AssessmentDto {
    fn from(assessment: AssessmentRecord) -> Self {
        Self {
            id: assessment.id.to_string(),
            access_code: assessment.access_code.into_inner(),
            problem_ids: assessment
                .problem_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
            time_limit: assessment.time_limit_minutes,
            active: assessment.active,
            created_at: assessment.created_at,
        }
    }
}

async fn create_assessment(
    State(state): State<AppState>,
    Json(request): Json<CreateAssessmentRequest>,
) -> Result<Json<AssessmentDto>, ApiError> {
    // Malformed ids are dropped along with stale ones; assessment creation
    // tolerates junk references rather than failing the batch.
    let problem_ids: Vec<ProblemId> = request
        .problem_ids
        .iter()
        .filter_map(|id| id.parse().ok())
        .collect();

    let assessment = state
        .assessments
        .create_assessment(problem_ids, request.time_limit)
        .await?;

    Ok(Json(assessment.into()))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    practice: bool,
}

async fn list_assessments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AssessmentDto>>, ApiError> {
    let assessments = state.assessments.list_assessments(query.practice).await?;

    Ok(Json(assessments.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    id: String,
    assessment_id: String,
    candidate_email: String,
    started_at: NaiveDateTime,
    completed: bool,
    submitted_at: Option<NaiveDateTime>,
    score: i32,
}

impl From<SessionRecord> for SessionDto {
    fn from(session: SessionRecord) -> Self {
        Self {
            id: session.id.to_string(),
            assessment_id: session.assessment_id.to_string(),
            candidate_email: session.candidate_email,
            started_at: session.started_at,
            completed: session.completed,
            submitted_at: session.submitted_at,
            score: session.score,
        }
    }
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SessionDto>>, ApiError> {
    let sessions = state.assessments.list_sessions(query.practice).await?;

    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartAssessmentRequest {
    access_code: String,
    candidate_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemDto {
    id: String,
    title: String,
    description: String,
    difficulty: &'static str,
    sample_input: String,
    sample_output: String,
    constraints: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    visual: Option<String>,
}

impl From<ProblemRecord> for ProblemDto {
    fn from(problem: ProblemRecord) -> Self {
        Self {
            id: problem.id.to_string(),
            title: problem.title,
            description: problem.description,
            difficulty: problem.difficulty.as_str(),
            sample_input: problem.sample_input,
            sample_output: problem.sample_output,
            constraints: problem.constraints,
            visual: problem.visual,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartAssessmentResponse {
    session_id: String,
    time_limit: u32,
    problems: Vec<ProblemDto>,
}

impl From<StartedSession> for StartAssessmentResponse {
    fn from(started: StartedSession) -> Self {
        Self {
            session_id: started.session.id.to_string(),
            time_limit: started.time_limit_minutes,
            problems: started.problems.into_iter().map(Into::into).collect(),
        }
    }
}

async fn start_assessment(
    State(state): State<AppState>,
    Json(request): Json<StartAssessmentRequest>,
) -> Result<Json<StartAssessmentResponse>, ApiError> {
    let started = state
        .assessments
        .start_assessment(&request.access_code, &request.candidate_email)
        .await?;

    Ok(Json(started.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartPracticeRequest {
    candidate_email: String,
}

async fn start_practice(
    State(state): State<AppState>,
    Json(request): Json<StartPracticeRequest>,
) -> Result<Json<StartAssessmentResponse>, ApiError> {
    let started = state
        .assessments
        .start_practice(&request.candidate_email)
        .await?;

    Ok(Json(started.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitScoreRequest {
    session_id: String,
    score: i32,
}

async fn submit_score(
    State(state): State<AppState>,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<StatusCode, ApiError> {
    let session_id = request
        .session_id
        .parse()
        .map_err(|_| ApiError::validation("sessionId is not a valid id"))?;

    state.assessments.submit_score(session_id, request.score).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_assessment_id(raw: &str) -> Result<AssessmentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation("assessment id is not a valid id"))
}

async fn deactivate_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let assessment_id = parse_assessment_id(&id)?;

    state.assessments.deactivate_assessment(assessment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn duplicate_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AssessmentDto>, ApiError> {
    let assessment_id = parse_assessment_id(&id)?;

    let copy = state.assessments.duplicate_assessment(assessment_id).await?;

    Ok(Json(copy.into()))
}
