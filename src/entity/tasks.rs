//! 待办任务实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub assignee_id: i64,
    pub created_by: i64,
    pub due_date: Option<i64>,
    pub priority: String,
    pub status: String,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssigneeId",
        to = "super::users::Column::Id"
    )]
    Assignee,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_task(self) -> crate::models::tasks::entities::Task {
        use crate::models::tasks::entities::{Task, TaskPriority, TaskStatus};

        Task {
            id: self.id,
            title: self.title,
            description: self.description,
            assignee_id: self.assignee_id,
            created_by: self.created_by,
            due_date: self.due_date.map(super::to_datetime),
            priority: self
                .priority
                .parse::<TaskPriority>()
                .unwrap_or(TaskPriority::Medium),
            status: self.status.parse::<TaskStatus>().unwrap_or(TaskStatus::Todo),
            completed_at: self.completed_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
