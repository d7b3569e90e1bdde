use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserBrief;

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Enrollment {
    pub id: i64,
    pub subject_id: i64,
    pub student_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

// 选课名单条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct EnrolledStudent {
    pub enrollment_id: i64,
    pub student: UserBrief,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
