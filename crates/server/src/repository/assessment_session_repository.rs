use crate::entity::assessment_session;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use codegrade_core::domain::{AssessmentId, SessionId};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: SessionId,
    pub assessment_id: AssessmentId,
    pub candidate_email: String,
    pub started_at: NaiveDateTime,
    pub completed: bool,
    pub submitted_at: Option<NaiveDateTime>,
    pub score: i32,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub assessment_id: AssessmentId,
    pub candidate_email: String,
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates a session unless one already exists for the (assessment,
    /// candidate) pair; returns `None` on conflict. The check and insert are
    /// a single atomic step, so concurrent starts yield exactly one session.
    async fn try_create(&self, new_session: NewSession) -> Result<Option<SessionRecord>>;
    async fn find_by_id(&self, session_id: SessionId) -> Result<Option<SessionRecord>>;
    async fn list_all(&self) -> Result<Vec<SessionRecord>>;
    /// Marks the session completed with the given score, only if it has not
    /// completed yet. Returns false when the guarded update matched no row,
    /// i.e. the session was already submitted.
    async fn complete(
        &self,
        session_id: SessionId,
        score: i32,
        submitted_at: NaiveDateTime,
    ) -> Result<bool>;
}

#[derive(Clone)]
pub struct SeaOrmSessionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: assessment_session::Model) -> Result<SessionRecord> {
        let id = SessionId::from_str(&model.id).map_err(|e| {
            anyhow!("invalid assessment_session.id '{}' from database: {e}", model.id)
        })?;
        let assessment_id = AssessmentId::from_str(&model.assessment_id).map_err(|e| {
            anyhow!(
                "invalid assessment_session.assessment_id '{}' from database: {e}",
                model.assessment_id
            )
        })?;

        Ok(SessionRecord {
            id,
            assessment_id,
            candidate_email: model.candidate_email,
            started_at: model.started_at,
            completed: model.completed,
            submitted_at: model.submitted_at,
            score: model.score,
        })
    }
}

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn try_create(&self, new_session: NewSession) -> Result<Option<SessionRecord>> {
        let id = SessionId::new();
        let started_at = Utc::now().naive_utc();

        let active_model = assessment_session::ActiveModel {
            id: Set(id.to_string()),
            assessment_id: Set(new_session.assessment_id.to_string()),
            candidate_email: Set(new_session.candidate_email.clone()),
            started_at: Set(started_at),
            completed: Set(false),
            submitted_at: Set(None),
            score: Set(0),
        };

        let insert = assessment_session::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    assessment_session::Column::AssessmentId,
                    assessment_session::Column::CandidateEmail,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&self.db)
            .await;

        match insert {
            Ok(_) => Ok(Some(SessionRecord {
                id,
                assessment_id: new_session.assessment_id,
                candidate_email: new_session.candidate_email,
                started_at,
                completed: false,
                submitted_at: None,
                score: 0,
            })),
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, session_id: SessionId) -> Result<Option<SessionRecord>> {
        let model = assessment_session::Entity::find_by_id(session_id.to_string())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_all(&self) -> Result<Vec<SessionRecord>> {
        let models = assessment_session::Entity::find().all(&self.db).await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn complete(
        &self,
        session_id: SessionId,
        score: i32,
        submitted_at: NaiveDateTime,
    ) -> Result<bool> {
        let result = assessment_session::Entity::update_many()
            .col_expr(assessment_session::Column::Completed, Expr::value(true))
            .col_expr(assessment_session::Column::Score, Expr::value(score))
            .col_expr(
                assessment_session::Column::SubmittedAt,
                Expr::value(Some(submitted_at)),
            )
            .filter(assessment_session::Column::Id.eq(session_id.to_string()))
            .filter(assessment_session::Column::Completed.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
