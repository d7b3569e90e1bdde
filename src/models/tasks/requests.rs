use serde::Deserialize;
use ts_rs::TS;

use super::entities::{TaskPriority, TaskStatus};
use crate::define_string_enum;
use crate::models::common::PaginationQuery;

define_string_enum! {
    // 列表范围
    #[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
    pub enum TaskScope("任务范围") {
        Assigned => "assigned",
        Created => "created",
        All => "all",
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// 为空时指派给自己
    pub assignee_id: Option<i64>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<i64>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    /// 是否只修改了状态
    pub fn is_status_only(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assignee_id.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct TaskListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub scope: Option<TaskScope>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: i64,
    pub created_by: i64,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub priority: TaskPriority,
}

#[derive(Debug, Clone)]
pub struct TaskListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub user_id: i64,
    pub scope: TaskScope,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}
