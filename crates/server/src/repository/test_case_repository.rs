use crate::entity::test_case;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use codegrade_core::domain::{ProblemId, TestCaseId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct TestCaseRecord {
    pub id: TestCaseId,
    pub problem_id: ProblemId,
    pub input: String,
    pub expected_output: String,
}

#[derive(Debug, Clone)]
pub struct NewTestCase {
    pub problem_id: ProblemId,
    pub input: String,
    pub expected_output: String,
}

#[async_trait]
pub trait TestCaseRepository: Send + Sync {
    async fn create(&self, new_test_case: NewTestCase) -> Result<TestCaseRecord>;
    /// Test cases in stored (creation) order; grading iterates them in this
    /// order and result lists must match it.
    async fn list_by_problem(&self, problem_id: ProblemId) -> Result<Vec<TestCaseRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmTestCaseRepository {
    db: DatabaseConnection,
}

impl SeaOrmTestCaseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: test_case::Model) -> Result<TestCaseRecord> {
        let id = TestCaseId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid test_case.id '{}' from database: {e}", model.id))?;
        let problem_id = ProblemId::from_str(&model.problem_id).map_err(|e| {
            anyhow!(
                "invalid test_case.problem_id '{}' from database: {e}",
                model.problem_id
            )
        })?;

        Ok(TestCaseRecord {
            id,
            problem_id,
            input: model.input,
            expected_output: model.expected_output,
        })
    }
}

#[async_trait]
impl TestCaseRepository for SeaOrmTestCaseRepository {
    async fn create(&self, new_test_case: NewTestCase) -> Result<TestCaseRecord> {
        let id = TestCaseId::new();

        let active_model = test_case::ActiveModel {
            id: Set(id.to_string()),
            problem_id: Set(new_test_case.problem_id.to_string()),
            input: Set(new_test_case.input),
            expected_output: Set(new_test_case.expected_output),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn list_by_problem(&self, problem_id: ProblemId) -> Result<Vec<TestCaseRecord>> {
        let models = test_case::Entity::find()
            .filter(test_case::Column::ProblemId.eq(problem_id.to_string()))
            .order_by_asc(test_case::Column::CreatedAt)
            .order_by_asc(test_case::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
