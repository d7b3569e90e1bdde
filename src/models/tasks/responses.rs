use serde::Serialize;
use ts_rs::TS;

use super::entities::Task;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct TaskListResponse {
    pub items: Vec<Task>,
    pub pagination: PaginationInfo,
}
