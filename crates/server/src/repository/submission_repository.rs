use crate::entity::{problem, submission, user};
use super::problem_repository::SeaOrmProblemRepository;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use codegrade_core::domain::{Language, ProblemId, SubmissionId, UserId, Verdict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub code: String,
    pub output: String,
    pub passed_tests: u32,
    pub total_tests: u32,
    pub language: Language,
    pub verdict: Verdict,
    pub time_spent_secs: Option<i64>,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: UserId,
    pub problem_id: ProblemId,
    pub code: String,
    pub output: String,
    pub passed_tests: u32,
    pub total_tests: u32,
    pub language: Language,
    pub verdict: Verdict,
    pub time_spent_secs: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub email: String,
    pub score: u64,
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<SubmissionRecord>>;
    /// Difficulty points summed over fully passed submissions, grouped by
    /// user, highest total first.
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>>;
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_verdict(code: i16) -> Result<Verdict> {
        match code {
            0 => Ok(Verdict::Run),
            1 => Ok(Verdict::Passed),
            2 => Ok(Verdict::PartiallyPassed),
            3 => Ok(Verdict::Failed),
            _ => Err(anyhow!("invalid submission.verdict code from database: {code}")),
        }
    }

    pub(crate) fn map_verdict_code(verdict: Verdict) -> i16 {
        match verdict {
            Verdict::Run => 0,
            Verdict::Passed => 1,
            Verdict::PartiallyPassed => 2,
            Verdict::Failed => 3,
        }
    }

    fn map_model(model: submission::Model) -> Result<SubmissionRecord> {
        let id = SubmissionId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid submission.id '{}' from database: {e}", model.id))?;
        let user_id = UserId::from_str(&model.user_id).map_err(|e| {
            anyhow!(
                "invalid submission.user_id '{}' from database: {e}",
                model.user_id
            )
        })?;
        let problem_id = ProblemId::from_str(&model.problem_id).map_err(|e| {
            anyhow!(
                "invalid submission.problem_id '{}' from database: {e}",
                model.problem_id
            )
        })?;

        let passed_tests = u32::try_from(model.passed_tests).map_err(|_| {
            anyhow!(
                "invalid submission.passed_tests from database: {}",
                model.passed_tests
            )
        })?;
        let total_tests = u32::try_from(model.total_tests).map_err(|_| {
            anyhow!(
                "invalid submission.total_tests from database: {}",
                model.total_tests
            )
        })?;

        Ok(SubmissionRecord {
            id,
            user_id,
            problem_id,
            code: model.code,
            output: model.output,
            passed_tests,
            total_tests,
            language: Language::from_tag(&model.language),
            verdict: Self::map_verdict(model.verdict)?,
            time_spent_secs: model.time_spent_secs,
            submitted_at: model.submitted_at,
        })
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let id = SubmissionId::new();

        let active_model = submission::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set(new_submission.user_id.to_string()),
            problem_id: Set(new_submission.problem_id.to_string()),
            code: Set(new_submission.code),
            output: Set(new_submission.output),
            passed_tests: Set(i32::try_from(new_submission.passed_tests)?),
            total_tests: Set(i32::try_from(new_submission.total_tests)?),
            language: Set(new_submission.language.tag().to_string()),
            verdict: Set(Self::map_verdict_code(new_submission.verdict)),
            time_spent_secs: Set(new_submission.time_spent_secs),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<SubmissionRecord>> {
        let models = submission::Entity::find()
            .filter(submission::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(submission::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let passed = submission::Entity::find()
            .filter(submission::Column::Verdict.eq(Self::map_verdict_code(Verdict::Passed)))
            .find_also_related(problem::Entity)
            .all(&self.db)
            .await?;

        let mut totals: HashMap<String, u64> = HashMap::new();
        for (submission, problem) in &passed {
            let Some(problem) = problem else { continue };
            let difficulty = SeaOrmProblemRepository::map_difficulty(problem.difficulty)?;
            *totals.entry(submission.user_id.clone()).or_default() +=
                u64::from(difficulty.points());
        }

        if totals.is_empty() {
            return Ok(Vec::new());
        }

        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(totals.keys().cloned().collect::<Vec<_>>()))
            .all(&self.db)
            .await?;

        let mut entries: Vec<LeaderboardEntry> = users
            .into_iter()
            .filter_map(|user| {
                totals.get(&user.id).map(|score| LeaderboardEntry {
                    username: user.username,
                    email: user.email,
                    score: *score,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.email.cmp(&b.email)));

        Ok(entries)
    }
}
