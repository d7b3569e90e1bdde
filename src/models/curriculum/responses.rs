use serde::Serialize;
use ts_rs::TS;

use super::entities::CurriculumPlan;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/curriculum.ts")]
pub struct CurriculumPlanListResponse {
    pub items: Vec<CurriculumPlan>,
    pub pagination: PaginationInfo,
}
