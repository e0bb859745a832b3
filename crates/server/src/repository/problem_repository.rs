use crate::entity::problem;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use codegrade_core::domain::{Difficulty, ProblemId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ProblemRecord {
    pub id: ProblemId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub sample_input: String,
    pub sample_output: String,
    pub constraints: String,
    pub visual: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProblem {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub sample_input: String,
    pub sample_output: String,
    pub constraints: String,
    pub visual: Option<String>,
}

#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn create(&self, new_problem: NewProblem) -> Result<ProblemRecord>;
    async fn find_by_id(&self, problem_id: ProblemId) -> Result<Option<ProblemRecord>>;
    /// Resolves the given ids, silently dropping the ones that no longer
    /// exist. Stale references are tolerated rather than errored.
    async fn find_by_ids(&self, problem_ids: &[ProblemId]) -> Result<Vec<ProblemRecord>>;
    async fn list_all(&self) -> Result<Vec<ProblemRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmProblemRepository {
    db: DatabaseConnection,
}

impl SeaOrmProblemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_difficulty(code: i16) -> Result<Difficulty> {
        match code {
            0 => Ok(Difficulty::Easy),
            1 => Ok(Difficulty::Medium),
            2 => Ok(Difficulty::Hard),
            _ => Err(anyhow!("invalid problem.difficulty code from database: {code}")),
        }
    }

    pub(crate) fn map_difficulty_code(difficulty: Difficulty) -> i16 {
        match difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    fn map_model(model: problem::Model) -> Result<ProblemRecord> {
        let id = ProblemId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid problem.id '{}' from database: {e}", model.id))?;

        Ok(ProblemRecord {
            id,
            title: model.title,
            description: model.description,
            difficulty: Self::map_difficulty(model.difficulty)?,
            sample_input: model.sample_input,
            sample_output: model.sample_output,
            constraints: model.constraints,
            visual: model.visual,
        })
    }
}

#[async_trait]
impl ProblemRepository for SeaOrmProblemRepository {
    async fn create(&self, new_problem: NewProblem) -> Result<ProblemRecord> {
        let id = ProblemId::new();

        let active_model = problem::ActiveModel {
            id: Set(id.to_string()),
            title: Set(new_problem.title),
            description: Set(new_problem.description),
            difficulty: Set(Self::map_difficulty_code(new_problem.difficulty)),
            sample_input: Set(new_problem.sample_input),
            sample_output: Set(new_problem.sample_output),
            constraints: Set(new_problem.constraints),
            visual: Set(new_problem.visual),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, problem_id: ProblemId) -> Result<Option<ProblemRecord>> {
        let model = problem::Entity::find_by_id(problem_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn find_by_ids(&self, problem_ids: &[ProblemId]) -> Result<Vec<ProblemRecord>> {
        if problem_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = problem_ids.iter().map(ToString::to_string).collect();
        let models = problem::Entity::find()
            .filter(problem::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_all(&self) -> Result<Vec<ProblemRecord>> {
        let models = problem::Entity::find().all(&self.db).await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
