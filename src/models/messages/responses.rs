use serde::Serialize;
use ts_rs::TS;

use super::entities::Message;
use crate::models::users::entities::UserBrief;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ConversationResponse {
    pub partner: UserBrief,
    /// 按发送顺序排列
    pub messages: Vec<Message>,
    pub has_more: bool,
}

// 会话摘要（存储层统计）
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationStat {
    pub partner_id: i64,
    pub last_message_id: i64,
    pub unread_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ConversationSummary {
    pub partner: UserBrief,
    pub last_message: Message,
    pub unread_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ConversationListResponse {
    pub items: Vec<ConversationSummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct MarkReadResponse {
    pub marked_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct UnreadMessageCountResponse {
    pub unread_count: i64,
}
