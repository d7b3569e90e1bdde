use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 提交状态
    #[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
    pub enum SubmissionStatus("提交状态") {
        Submitted => "submitted",
        Late => "late",
        Graded => "graded",
    }
}

// 作业提交
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    pub document_id: Option<i64>,
    pub status: SubmissionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
