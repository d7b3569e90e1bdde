use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    pub content: String,
}

// 向前翻页：before_id 为空时取最新一页
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ConversationParams {
    pub before_id: Option<i64>,
    pub limit: Option<u64>,
}
