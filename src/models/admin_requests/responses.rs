use serde::Serialize;
use ts_rs::TS;

use super::entities::AdminRequest;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserBrief;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct AdminRequestListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub request: AdminRequest,
    pub requester: Option<UserBrief>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct AdminRequestListResponse {
    pub items: Vec<AdminRequestListItem>,
    pub pagination: PaginationInfo,
}
