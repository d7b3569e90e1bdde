use serde::Serialize;
use ts_rs::TS;

use super::entities::{EnrolledStudent, Subject};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserBrief;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectListResponse {
    pub items: Vec<Subject>,
    pub pagination: PaginationInfo,
}

// 课程详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectDetailResponse {
    pub subject: Subject,
    pub teacher: Option<UserBrief>,
    pub student_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrolledStudent>,
    pub pagination: PaginationInfo,
}
