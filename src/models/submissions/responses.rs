use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;
use crate::models::common::PaginationInfo;
use crate::models::grades::entities::Grade;
use crate::models::users::entities::UserBrief;

// 提交列表条目
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student: Option<UserBrief>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionListItem>,
    pub pagination: PaginationInfo,
}

// 提交详情（含成绩）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionDetailResponse {
    pub submission: Submission,
    pub grade: Option<Grade>,
}

// 批改结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionResponse {
    pub submission: Submission,
    pub grade: Grade,
}
