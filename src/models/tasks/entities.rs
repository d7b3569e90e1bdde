use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
    pub enum TaskPriority("任务优先级") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

define_string_enum! {
    #[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
    pub enum TaskStatus("任务状态") {
        Todo => "todo",
        InProgress => "in_progress",
        Done => "done",
    }
}

// 待办任务
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: i64,
    pub created_by: i64,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
