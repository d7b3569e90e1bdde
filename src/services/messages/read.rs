use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::MessageService;
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    messages::responses::{MarkReadResponse, UnreadMessageCountResponse},
};
use crate::services::permissions::{current_user, internal_error};
use crate::services::websocket::{ConnectionManager, WsMessage};
use crate::storage::Storage;

/// 将对方发来的消息标为已读，并通知对方
pub async fn mark_conversation_read(
    storage: &Arc<dyn Storage>,
    reader_id: i64,
    partner_id: i64,
) -> Result<u64> {
    let count = storage.mark_conversation_read(reader_id, partner_id).await?;
    if count > 0 {
        ConnectionManager::get()
            .send_to_user(partner_id, WsMessage::MessagesRead { reader_id, count });
    }
    Ok(count)
}

pub async fn handle_mark_read(
    service: &MessageService,
    partner_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match mark_conversation_read(&storage, user.id, partner_id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkReadResponse {
                marked_count: count as i64,
            },
            "已标记为已读",
        ))),
        Err(e) => Ok(internal_error("Failed to mark messages as read", e)),
    }
}

pub async fn get_unread_count(
    service: &MessageService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.count_unread_messages(user.id).await {
        Ok(unread_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadMessageCountResponse { unread_count },
            "获取未读私信数量成功",
        ))),
        Err(e) => Ok(internal_error("Failed to count unread messages", e)),
    }
}
