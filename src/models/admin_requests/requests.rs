use serde::Deserialize;
use ts_rs::TS;

use super::entities::{RequestStatus, RequestType};
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct CreateAdminRequest {
    pub request_type: RequestType,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct ReviewAdminRequest {
    /// 只能是 approved 或 rejected
    pub status: RequestStatus,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct AdminRequestListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminRequestListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub requester_id: Option<i64>,
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
}
