use serde::Deserialize;
use ts_rs::TS;

use super::entities::GradeType;
use crate::models::common::PaginationQuery;

// 直接录入成绩（考试、测验等）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub grade_type: GradeType,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    pub title: Option<String>,
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub subject_id: Option<i64>,
    pub student_id: Option<i64>,
    pub grade_type: Option<GradeType>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeReportParams {
    pub subject_id: Option<i64>,
}

// 存储层写入
#[derive(Debug, Clone)]
pub struct NewGrade {
    pub student_id: i64,
    pub subject_id: i64,
    pub assignment_id: Option<i64>,
    pub submission_id: Option<i64>,
    pub graded_by: i64,
    pub grade_type: GradeType,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GradeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub subject_ids: Option<Vec<i64>>,
    pub student_id: Option<i64>,
    pub grade_type: Option<GradeType>,
}
