use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 通知类型
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum NotificationType("通知类型") {
        AssignmentCreated => "assignment_created",
        GradePosted => "grade_posted",
        RequestReviewed => "request_reviewed",
        TaskAssigned => "task_assigned",
        CurriculumReviewed => "curriculum_reviewed",
        System => "system",
    }
}

/// 通知
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    /// 关联对象类型，如 assignment / grade / request
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
