use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::define_string_enum;

define_string_enum! {
    // 文档分类
    #[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
    pub enum DocumentCategory("文档分类") {
        Material => "material",
        Homework => "homework",
        Administrative => "administrative",
        Other => "other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/document.ts")]
pub struct Document {
    pub id: i64,
    // 上传者
    pub owner_id: i64,
    pub subject_id: Option<i64>,
    pub title: String,
    pub category: DocumentCategory,
    // 原始文件名
    pub original_name: String,
    // 磁盘上的文件名
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    // 文件大小（以字节为单位）
    pub file_size: i64,
    pub file_type: String,
    pub is_public: bool,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
