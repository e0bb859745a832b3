use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assessment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub access_code: String,
    pub time_limit_minutes: i32,
    pub active: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assessment_problem::Entity")]
    AssessmentProblem,
    #[sea_orm(has_many = "super::assessment_session::Entity")]
    AssessmentSession,
}

impl Related<super::assessment_problem::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentProblem.def()
    }
}

impl Related<super::assessment_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
