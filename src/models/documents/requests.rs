use serde::Deserialize;
use ts_rs::TS;

use super::entities::DocumentCategory;
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct DocumentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub subject_id: Option<i64>,
    pub category: Option<DocumentCategory>,
    pub search: Option<String>,
}

// 存储层写入
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub owner_id: i64,
    pub subject_id: Option<i64>,
    pub title: String,
    pub category: DocumentCategory,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub is_public: bool,
}

// 可见范围：自己上传的、公开的、或属于 visible_subject_ids 的；None 表示全部可见
// 课程内的作业附件另需在 managed_subject_ids 中
#[derive(Debug, Clone, Default)]
pub struct DocumentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub viewer_id: Option<i64>,
    pub visible_subject_ids: Option<Vec<i64>>,
    // 可查看其中作业附件的课程
    pub managed_subject_ids: Vec<i64>,
    pub subject_id: Option<i64>,
    pub category: Option<DocumentCategory>,
    pub search: Option<String>,
}
