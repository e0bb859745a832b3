use crate::entity::{assessment, assessment_problem};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use codegrade_core::domain::{AccessCode, AssessmentId, ProblemId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub access_code: AccessCode,
    pub problem_ids: Vec<ProblemId>,
    pub time_limit_minutes: u32,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub access_code: AccessCode,
    pub problem_ids: Vec<ProblemId>,
    pub time_limit_minutes: u32,
}

#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn create(&self, new_assessment: NewAssessment) -> Result<AssessmentRecord>;
    async fn find_by_id(&self, assessment_id: AssessmentId) -> Result<Option<AssessmentRecord>>;
    async fn find_by_access_code(&self, access_code: &str) -> Result<Option<AssessmentRecord>>;
    async fn list_all(&self) -> Result<Vec<AssessmentRecord>>;
    /// Returns false when no assessment with the id exists.
    async fn set_active(&self, assessment_id: AssessmentId, active: bool) -> Result<bool>;
}

#[derive(Clone)]
pub struct SeaOrmAssessmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAssessmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: assessment::Model, problem_ids: Vec<ProblemId>) -> Result<AssessmentRecord> {
        let id = AssessmentId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid assessment.id '{}' from database: {e}", model.id))?;
        let time_limit_minutes = u32::try_from(model.time_limit_minutes).map_err(|_| {
            anyhow!(
                "invalid assessment.time_limit_minutes from database: {}",
                model.time_limit_minutes
            )
        })?;

        Ok(AssessmentRecord {
            id,
            access_code: AccessCode::from(model.access_code),
            problem_ids,
            time_limit_minutes,
            active: model.active,
            created_at: model.created_at,
        })
    }

    async fn problem_ids_for(&self, assessment_id: &str) -> Result<Vec<ProblemId>> {
        let links = assessment_problem::Entity::find()
            .filter(assessment_problem::Column::AssessmentId.eq(assessment_id))
            .all(&self.db)
            .await?;

        links
            .into_iter()
            .map(|link| {
                ProblemId::from_str(&link.problem_id).map_err(|e| {
                    anyhow!(
                        "invalid assessment_problem.problem_id '{}' from database: {e}",
                        link.problem_id
                    )
                })
            })
            .collect()
    }
}

#[async_trait]
impl AssessmentRepository for SeaOrmAssessmentRepository {
    async fn create(&self, new_assessment: NewAssessment) -> Result<AssessmentRecord> {
        let id = AssessmentId::new();

        let txn = self.db.begin().await?;

        let active_model = assessment::ActiveModel {
            id: Set(id.to_string()),
            access_code: Set(new_assessment.access_code.as_str().to_string()),
            time_limit_minutes: Set(i32::try_from(new_assessment.time_limit_minutes)?),
            active: Set(true),
            ..Default::default()
        };
        let model = active_model.insert(&txn).await?;

        for problem_id in &new_assessment.problem_ids {
            let link = assessment_problem::ActiveModel {
                assessment_id: Set(id.to_string()),
                problem_id: Set(problem_id.to_string()),
            };
            link.insert(&txn).await?;
        }

        txn.commit().await?;

        Self::map_model(model, new_assessment.problem_ids)
    }

    async fn find_by_id(&self, assessment_id: AssessmentId) -> Result<Option<AssessmentRecord>> {
        let Some(model) = assessment::Entity::find_by_id(assessment_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let problem_ids = self.problem_ids_for(&model.id).await?;
        Self::map_model(model, problem_ids).map(Some)
    }

    async fn find_by_access_code(&self, access_code: &str) -> Result<Option<AssessmentRecord>> {
        let Some(model) = assessment::Entity::find()
            .filter(assessment::Column::AccessCode.eq(access_code))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let problem_ids = self.problem_ids_for(&model.id).await?;
        Self::map_model(model, problem_ids).map(Some)
    }

    async fn list_all(&self) -> Result<Vec<AssessmentRecord>> {
        let models = assessment::Entity::find().all(&self.db).await?;
        let links = assessment_problem::Entity::find().all(&self.db).await?;

        let mut grouped: HashMap<String, Vec<ProblemId>> = HashMap::new();
        for link in links {
            let problem_id = ProblemId::from_str(&link.problem_id).map_err(|e| {
                anyhow!(
                    "invalid assessment_problem.problem_id '{}' from database: {e}",
                    link.problem_id
                )
            })?;
            grouped
                .entry(link.assessment_id)
                .or_default()
                .push(problem_id);
        }

        models
            .into_iter()
            .map(|model| {
                let problem_ids = grouped.remove(&model.id).unwrap_or_default();
                Self::map_model(model, problem_ids)
            })
            .collect()
    }

    async fn set_active(&self, assessment_id: AssessmentId, active: bool) -> Result<bool> {
        let Some(model) = assessment::Entity::find_by_id(assessment_id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(false);
        };

        let mut active_model: assessment::ActiveModel = model.into();
        active_model.active = Set(active);
        active_model.update(&self.db).await?;

        Ok(true)
    }
}
