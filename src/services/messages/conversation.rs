use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::MessageService;
use crate::models::{
    ApiResponse, ErrorCode,
    messages::{
        requests::ConversationParams,
        responses::{ConversationListResponse, ConversationResponse, ConversationSummary},
    },
};
use crate::services::permissions::{current_user, internal_error};

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 100;

pub async fn get_conversation(
    service: &MessageService,
    partner_id: i64,
    params: ConversationParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let partner = match storage.get_user_by_id(partner_id).await {
        Ok(Some(partner)) => partner,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
        }
        Err(e) => return Ok(internal_error("Failed to load user", e)),
    };

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    // 多取一条判断是否还有更早的消息
    let mut messages = match storage
        .list_conversation_messages(user.id, partner_id, params.before_id, limit + 1)
        .await
    {
        Ok(messages) => messages,
        Err(e) => return Ok(internal_error("Failed to load conversation", e)),
    };

    let has_more = messages.len() as u64 > limit;
    messages.truncate(limit as usize);
    messages.reverse();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ConversationResponse {
            partner: partner.brief(),
            messages,
            has_more,
        },
        "获取会话成功",
    )))
}

pub async fn list_conversations(
    service: &MessageService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let stats = match storage.list_conversation_stats(user.id).await {
        Ok(stats) => stats,
        Err(e) => return Ok(internal_error("Failed to list conversations", e)),
    };

    let partner_ids: Vec<i64> = stats.iter().map(|s| s.partner_id).collect();
    let message_ids: Vec<i64> = stats.iter().map(|s| s.last_message_id).collect();

    let partners: HashMap<i64, _> = match storage.get_users_by_ids(&partner_ids).await {
        Ok(users) => users.into_iter().map(|u| (u.id, u.brief())).collect(),
        Err(e) => return Ok(internal_error("Failed to load conversation partners", e)),
    };
    let mut last_messages: HashMap<i64, _> = match storage.get_messages_by_ids(&message_ids).await
    {
        Ok(messages) => messages.into_iter().map(|m| (m.id, m)).collect(),
        Err(e) => return Ok(internal_error("Failed to load last messages", e)),
    };

    // 已删除的用户不再出现在会话列表里
    let items = stats
        .into_iter()
        .filter_map(|stat| {
            let partner = partners.get(&stat.partner_id)?.clone();
            let last_message = last_messages.remove(&stat.last_message_id)?;
            Some(ConversationSummary {
                partner,
                last_message,
                unread_count: stat.unread_count,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ConversationListResponse { items },
        "获取会话列表成功",
    )))
}
