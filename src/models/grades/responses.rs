use serde::Serialize;
use ts_rs::TS;

use super::entities::Grade;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListResponse {
    pub items: Vec<Grade>,
    pub pagination: PaginationInfo,
}

// 单门课程的成绩统计，百分比保留两位小数
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SubjectGradeSummary {
    pub subject_id: i64,
    pub subject_name: String,
    pub grade_count: i64,
    pub student_count: i64,
    pub average_percentage: f64,
    pub min_percentage: f64,
    pub max_percentage: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeReportResponse {
    pub subjects: Vec<SubjectGradeSummary>,
}
