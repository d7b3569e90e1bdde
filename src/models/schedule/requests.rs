use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct CreateScheduleItemRequest {
    pub subject_id: i64,
    pub title: String,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct UpdateScheduleItemRequest {
    pub title: Option<String>,
    pub day_of_week: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleListParams {
    pub day_of_week: Option<i32>,
    pub subject_id: Option<i64>,
}

// 存储层查询，subject_ids 为 None 表示不限制
#[derive(Debug, Clone, Default)]
pub struct ScheduleQuery {
    pub subject_ids: Option<Vec<i64>>,
    pub day_of_week: Option<i32>,
    pub room: Option<String>,
}
