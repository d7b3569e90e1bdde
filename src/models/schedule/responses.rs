use serde::Serialize;
use ts_rs::TS;

use super::entities::{ScheduleEntry, ScheduleItem};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleListResponse {
    pub items: Vec<ScheduleEntry>,
}

// 冲突时随 409 返回
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleConflictResponse {
    pub conflicts: Vec<ScheduleItem>,
}
