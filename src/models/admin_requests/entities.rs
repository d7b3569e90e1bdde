use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 申请类型
    #[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
    pub enum RequestType("申请类型") {
        Leave => "leave",
        Certificate => "certificate",
        GradeAppeal => "grade_appeal",
        ScheduleChange => "schedule_change",
        Other => "other",
    }
}

define_string_enum! {
    // 审批状态
    #[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
    pub enum RequestStatus("审批状态") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

// 事务申请（请假、证明、成绩复核等）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct AdminRequest {
    pub id: i64,
    pub requester_id: i64,
    pub request_type: RequestType,
    pub title: String,
    pub description: Option<String>,
    pub status: RequestStatus,
    pub reviewer_id: Option<i64>,
    pub review_comment: Option<String>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
