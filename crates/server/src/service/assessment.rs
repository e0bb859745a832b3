//! Assessment lifecycle: access-code-gated session start, randomized
//! practice sessions, score submission. A session only ever moves
//! created→running→completed; completed is terminal.

use std::sync::Arc;

use chrono::Utc;
use codegrade_core::domain::{AccessCode, AssessmentId, ProblemId, SessionId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::info;

use crate::repository::{
    AssessmentRecord, AssessmentRepository, NewAssessment, NewSession, ProblemRecord,
    ProblemRepository, SessionRecord, SessionRepository,
};
use crate::service::ServiceError;

const PRACTICE_MIN_PROBLEMS: usize = 2;
const PRACTICE_MAX_PROBLEMS: usize = 5;

/// Everything a candidate needs to begin working: the session, the clock,
/// and the problem set.
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session: SessionRecord,
    pub time_limit_minutes: u32,
    pub problems: Vec<ProblemRecord>,
}

pub struct AssessmentService {
    assessments: Arc<dyn AssessmentRepository>,
    sessions: Arc<dyn SessionRepository>,
    problems: Arc<dyn ProblemRepository>,
    rng: Mutex<StdRng>,
}

impl AssessmentService {
    pub fn new(
        assessments: Arc<dyn AssessmentRepository>,
        sessions: Arc<dyn SessionRepository>,
        problems: Arc<dyn ProblemRepository>,
    ) -> Self {
        Self::with_rng(assessments, sessions, problems, StdRng::from_entropy())
    }

    /// Injects the random source so practice selection is reproducible in
    /// tests.
    pub fn with_rng(
        assessments: Arc<dyn AssessmentRepository>,
        sessions: Arc<dyn SessionRepository>,
        problems: Arc<dyn ProblemRepository>,
        rng: StdRng,
    ) -> Self {
        Self {
            assessments,
            sessions,
            problems,
            rng: Mutex::new(rng),
        }
    }

    /// Missing problem ids are dropped rather than errored; assessments
    /// tolerate stale references.
    #[tracing::instrument(skip(self, problem_ids))]
    pub async fn create_assessment(
        &self,
        problem_ids: Vec<ProblemId>,
        time_limit_minutes: u32,
    ) -> Result<AssessmentRecord, ServiceError> {
        let problems = self.problems.find_by_ids(&problem_ids).await?;

        let assessment = self
            .assessments
            .create(NewAssessment {
                access_code: AccessCode::generate(),
                problem_ids: problems.iter().map(|p| p.id).collect(),
                time_limit_minutes,
            })
            .await?;

        info!(
            assessment_id = %assessment.id,
            problems = assessment.problem_ids.len(),
            "assessment created"
        );

        Ok(assessment)
    }

    #[tracing::instrument(skip(self))]
    pub async fn start_assessment(
        &self,
        access_code: &str,
        candidate_email: &str,
    ) -> Result<StartedSession, ServiceError> {
        if candidate_email.trim().is_empty() {
            return Err(ServiceError::MissingField("candidateEmail"));
        }

        let assessment = self
            .assessments
            .find_by_access_code(access_code)
            .await?
            .ok_or(ServiceError::AssessmentNotFound)?;

        if !assessment.active {
            return Err(ServiceError::InactiveAssessment);
        }

        let session = self
            .sessions
            .try_create(NewSession {
                assessment_id: assessment.id,
                candidate_email: candidate_email.to_string(),
            })
            .await?
            .ok_or(ServiceError::DuplicateSession)?;

        info!(session_id = %session.id, assessment_id = %assessment.id, "session started");

        let problems = self.problems.find_by_ids(&assessment.problem_ids).await?;

        Ok(StartedSession {
            session,
            time_limit_minutes: assessment.time_limit_minutes,
            problems,
        })
    }

    /// Builds an ephemeral practice assessment from a random subset of the
    /// problem bank and starts a session on it in one step.
    #[tracing::instrument(skip(self))]
    pub async fn start_practice(
        &self,
        candidate_email: &str,
    ) -> Result<StartedSession, ServiceError> {
        if candidate_email.trim().is_empty() {
            return Err(ServiceError::MissingField("candidateEmail"));
        }

        let mut problems = self.problems.list_all().await?;
        if problems.is_empty() {
            return Err(ServiceError::NoProblemsAvailable);
        }

        {
            let mut rng = self.rng.lock().await;
            let count = rng.gen_range(PRACTICE_MIN_PROBLEMS..=PRACTICE_MAX_PROBLEMS);
            problems.shuffle(&mut *rng);
            problems.truncate(count.min(problems.len()));
        }

        let time_limit_minutes: u32 = problems
            .iter()
            .map(|p| p.difficulty.practice_minutes())
            .sum();

        let assessment = self
            .assessments
            .create(NewAssessment {
                access_code: AccessCode::generate_practice(),
                problem_ids: problems.iter().map(|p| p.id).collect(),
                time_limit_minutes,
            })
            .await?;

        let session = self
            .sessions
            .try_create(NewSession {
                assessment_id: assessment.id,
                candidate_email: candidate_email.to_string(),
            })
            .await?
            .ok_or(ServiceError::DuplicateSession)?;

        info!(
            session_id = %session.id,
            assessment_id = %assessment.id,
            problems = problems.len(),
            time_limit_minutes,
            "practice session started"
        );

        Ok(StartedSession {
            session,
            time_limit_minutes,
            problems,
        })
    }

    /// The only transition into the terminal state. A second call is
    /// rejected and the stored score is never overwritten.
    #[tracing::instrument(skip(self))]
    pub async fn submit_score(
        &self,
        session_id: SessionId,
        score: i32,
    ) -> Result<(), ServiceError> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or(ServiceError::SessionNotFound(session_id))?;

        let updated = self
            .sessions
            .complete(session_id, score, Utc::now().naive_utc())
            .await?;
        if !updated {
            return Err(ServiceError::AlreadySubmitted);
        }

        info!(session_id = %session_id, score, "session completed");
        Ok(())
    }

    /// Admin listing; practice assessments are filtered out unless asked
    /// for explicitly.
    pub async fn list_assessments(
        &self,
        practice: bool,
    ) -> Result<Vec<AssessmentRecord>, ServiceError> {
        let assessments = self.assessments.list_all().await?;
        Ok(assessments
            .into_iter()
            .filter(|a| a.access_code.is_practice() == practice)
            .collect())
    }

    pub async fn list_sessions(&self, practice: bool) -> Result<Vec<SessionRecord>, ServiceError> {
        let assessments = self.assessments.list_all().await?;
        let sessions = self.sessions.list_all().await?;

        Ok(sessions
            .into_iter()
            .filter(|session| {
                assessments
                    .iter()
                    .find(|a| a.id == session.assessment_id)
                    .is_some_and(|a| a.access_code.is_practice() == practice)
            })
            .collect())
    }

    /// Blocks new starts only; sessions already running may still submit.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<(), ServiceError> {
        let found = self.assessments.set_active(assessment_id, false).await?;
        if !found {
            return Err(ServiceError::AssessmentNotFound);
        }

        info!(assessment_id = %assessment_id, "assessment deactivated");
        Ok(())
    }

    /// Copies the problem set and time limit into a fresh, active
    /// assessment under a new access code.
    #[tracing::instrument(skip(self))]
    pub async fn duplicate_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<AssessmentRecord, ServiceError> {
        let original = self
            .assessments
            .find_by_id(assessment_id)
            .await?
            .ok_or(ServiceError::AssessmentNotFound)?;

        let copy = self
            .assessments
            .create(NewAssessment {
                access_code: AccessCode::generate(),
                problem_ids: original.problem_ids,
                time_limit_minutes: original.time_limit_minutes,
            })
            .await?;

        info!(assessment_id = %copy.id, copied_from = %assessment_id, "assessment duplicated");
        Ok(copy)
    }
}
