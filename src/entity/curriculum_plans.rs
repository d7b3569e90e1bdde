//! 教学计划实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "curriculum_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    pub academic_year: String,
    pub term: i32,
    /// JSON 数组
    #[sea_orm(column_type = "Text")]
    pub topics: String,
    pub status: String,
    pub created_by: i64,
    pub reviewer_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_comment: Option<String>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_plan(self) -> crate::models::curriculum::entities::CurriculumPlan {
        use crate::models::curriculum::entities::{CurriculumPlan, PlanStatus};

        let topics = serde_json::from_str(&self.topics).unwrap_or_else(|e| {
            tracing::warn!("教学计划 {} 的 topics 解析失败: {}", self.id, e);
            Vec::new()
        });

        CurriculumPlan {
            id: self.id,
            subject_id: self.subject_id,
            title: self.title,
            academic_year: self.academic_year,
            term: self.term,
            topics,
            status: self.status.parse::<PlanStatus>().unwrap_or(PlanStatus::Draft),
            created_by: self.created_by,
            reviewer_id: self.reviewer_id,
            review_comment: self.review_comment,
            reviewed_at: self.reviewed_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
