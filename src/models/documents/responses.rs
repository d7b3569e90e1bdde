use serde::Serialize;
use ts_rs::TS;

use super::entities::Document;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct DocumentListResponse {
    pub items: Vec<Document>,
    pub pagination: PaginationInfo,
}
