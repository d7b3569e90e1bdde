use serde::Deserialize;
use ts_rs::TS;

use super::entities::{CurriculumTopic, PlanStatus};
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CreateCurriculumPlanRequest {
    pub subject_id: i64,
    pub title: String,
    pub academic_year: String,
    pub term: i32,
    #[serde(default)]
    pub topics: Vec<CurriculumTopic>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct UpdateCurriculumPlanRequest {
    pub title: Option<String>,
    pub academic_year: Option<String>,
    pub term: Option<i32>,
    pub topics: Option<Vec<CurriculumTopic>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct ReviewCurriculumPlanRequest {
    pub approve: bool,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CurriculumPlanListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub subject_id: Option<i64>,
    pub status: Option<PlanStatus>,
}

#[derive(Debug, Clone)]
pub struct NewCurriculumPlan {
    pub subject_id: i64,
    pub title: String,
    pub academic_year: String,
    pub term: i32,
    pub topics: Vec<CurriculumTopic>,
    pub created_by: i64,
}

// visible_subject_ids 为 None 表示全部课程；approved_only 用于学生视角
#[derive(Debug, Clone, Default)]
pub struct CurriculumPlanListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub subject_id: Option<i64>,
    pub status: Option<PlanStatus>,
    pub visible_subject_ids: Option<Vec<i64>>,
    pub approved_only: bool,
}
