use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::MessageService;
use crate::errors::EduPortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    messages::{
        entities::{Message, MessageStatus},
        requests::SendMessageRequest,
    },
    users::entities::User,
};
use crate::services::permissions::current_user;
use crate::services::system::DynamicConfig;
use crate::services::websocket::{ConnectionManager, WsMessage};
use crate::storage::Storage;

#[derive(Debug)]
pub enum SendMessageError {
    InvalidContent(String),
    InvalidRecipient(&'static str),
    Storage(EduPortalError),
}

impl fmt::Display for SendMessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendMessageError::InvalidContent(msg) => write!(f, "{msg}"),
            SendMessageError::InvalidRecipient(msg) => write!(f, "{msg}"),
            SendMessageError::Storage(e) => write!(f, "Failed to send message: {e}"),
        }
    }
}

impl SendMessageError {
    pub fn into_response(self) -> HttpResponse {
        match self {
            SendMessageError::InvalidContent(msg) => HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::MessageContentInvalid, msg)),
            SendMessageError::InvalidRecipient(msg) => HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::MessageRecipientInvalid, msg)),
            SendMessageError::Storage(e) => {
                error!("Failed to send message: {}", e);
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to send message: {e}"),
                ))
            }
        }
    }
}

/// 保存私信；接收方在线时立即推送并标记为已送达
pub async fn send_message(
    storage: &Arc<dyn Storage>,
    sender: &User,
    recipient_id: i64,
    content: String,
) -> Result<Message, SendMessageError> {
    let max_length = DynamicConfig::message_max_length().await;
    if content.trim().is_empty() {
        return Err(SendMessageError::InvalidContent(
            "Message content cannot be empty".to_string(),
        ));
    }
    if content.chars().count() > max_length {
        return Err(SendMessageError::InvalidContent(format!(
            "Message content cannot exceed {max_length} characters"
        )));
    }

    if recipient_id == sender.id {
        return Err(SendMessageError::InvalidRecipient(
            "Cannot send a message to yourself",
        ));
    }

    match storage.get_user_by_id(recipient_id).await {
        Ok(Some(recipient)) if recipient.is_active() => {}
        Ok(_) => {
            return Err(SendMessageError::InvalidRecipient(
                "Recipient does not exist or is not active",
            ));
        }
        Err(e) => return Err(SendMessageError::Storage(e)),
    }

    let mut message = storage
        .create_message(sender.id, recipient_id, content)
        .await
        .map_err(SendMessageError::Storage)?;

    let manager = ConnectionManager::get();
    if manager.is_online(recipient_id) {
        message = mark_delivered(storage, message).await;
        manager.send_to_user(
            recipient_id,
            WsMessage::Message {
                payload: message.clone(),
            },
        );
    }

    // 同步给发送方的其他连接
    manager.send_to_user(
        sender.id,
        WsMessage::MessageSent {
            payload: message.clone(),
        },
    );

    info!(
        "Message {} sent from {} to {} ({})",
        message.id, sender.id, recipient_id, message.status
    );
    Ok(message)
}

async fn mark_delivered(storage: &Arc<dyn Storage>, message: Message) -> Message {
    if let Err(e) = storage.mark_messages_delivered(&[message.id]).await {
        warn!("Failed to mark message {} delivered: {}", message.id, e);
        return message;
    }
    match storage.get_messages_by_ids(&[message.id]).await {
        Ok(mut found) if !found.is_empty() => found.remove(0),
        _ => Message {
            status: MessageStatus::Delivered,
            delivered_at: Some(chrono::Utc::now()),
            ..message
        },
    }
}

/// 连接建立后按写入顺序补发未送达的私信
pub async fn deliver_pending_messages(storage: &Arc<dyn Storage>, user_id: i64) {
    let pending = match storage.list_undelivered_messages(user_id).await {
        Ok(pending) => pending,
        Err(e) => {
            warn!("Failed to load pending messages for user {}: {}", user_id, e);
            return;
        }
    };
    if pending.is_empty() {
        return;
    }

    let ids: Vec<i64> = pending.iter().map(|m| m.id).collect();
    if let Err(e) = storage.mark_messages_delivered(&ids).await {
        warn!("Failed to mark pending messages delivered for user {}: {}", user_id, e);
        return;
    }
    let delivered = storage.get_messages_by_ids(&ids).await.unwrap_or(pending);

    let manager = ConnectionManager::get();
    for message in delivered {
        manager.send_to_user(user_id, WsMessage::Message { payload: message });
    }
    info!("Delivered {} pending messages to user {}", ids.len(), user_id);
}

pub async fn handle_send(
    service: &MessageService,
    body: SendMessageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match send_message(&storage, &user, body.recipient_id, body.content).await {
        Ok(message) => Ok(HttpResponse::Created().json(ApiResponse::success(message, "消息已发送"))),
        Err(e) => Ok(e.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::models::users::requests::UpdateUserRequest;
    use crate::storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::create_user;
    use tokio::sync::broadcast;

    async fn setup() -> (Arc<dyn Storage>, User, i64) {
        setup_after(0).await
    }

    /// 连接表是进程级的，先插入 `skip` 个占位用户让各测试的用户 ID 互不重叠
    async fn setup_after(skip: usize) -> (Arc<dyn Storage>, User, i64) {
        let concrete = SeaOrmStorage::in_memory().await.unwrap();
        for i in 0..skip {
            create_user(&concrete, &format!("filler{i:02}"), UserRole::Student).await;
        }
        let sender_id = create_user(&concrete, "sender01", UserRole::Student).await;
        let recipient_id = create_user(&concrete, "recipient", UserRole::Teacher).await;
        let storage: Arc<dyn Storage> = Arc::new(concrete);
        let sender = storage.get_user_by_id(sender_id).await.unwrap().unwrap();
        (storage, sender, recipient_id)
    }

    /// 取出通道中来自 sender 的私信帧
    fn drain_messages(rx: &mut broadcast::Receiver<WsMessage>, sender_id: i64) -> Vec<Message> {
        let mut messages = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            if let WsMessage::Message { payload } = frame
                && payload.sender_id == sender_id
            {
                messages.push(payload);
            }
        }
        messages
    }

    #[actix_web::test]
    async fn test_offline_recipient_keeps_sent() {
        let (storage, sender, recipient_id) = setup().await;

        let message = send_message(&storage, &sender, recipient_id, "hello".to_string())
            .await
            .unwrap();
        assert_eq!(message.status, MessageStatus::Sent);
        assert!(message.delivered_at.is_none());

        let pending = storage.list_undelivered_messages(recipient_id).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[actix_web::test]
    async fn test_invalid_recipient_and_content() {
        let (storage, sender, recipient_id) = setup().await;

        let err = send_message(&storage, &sender, sender.id, "hi".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SendMessageError::InvalidRecipient(_)));

        let err = send_message(&storage, &sender, 9999, "hi".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SendMessageError::InvalidRecipient(_)));

        let err = send_message(&storage, &sender, recipient_id, "   ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SendMessageError::InvalidContent(_)));

        storage
            .update_user(
                recipient_id,
                UpdateUserRequest {
                    status: Some(UserStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = send_message(&storage, &sender, recipient_id, "hi".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SendMessageError::InvalidRecipient(_)));
    }

    #[actix_web::test]
    async fn test_online_recipient_gets_push_and_delivered() {
        let (storage, sender, recipient_id) = setup_after(40).await;
        let manager = ConnectionManager::get();
        let mut rx = manager.register(recipient_id);

        let message = send_message(&storage, &sender, recipient_id, "are you there?".to_string())
            .await
            .unwrap();
        assert_eq!(message.status, MessageStatus::Delivered);
        assert!(message.delivered_at.is_some());

        let pushed = drain_messages(&mut rx, sender.id);
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].id, message.id);
        assert_eq!(pushed[0].status, MessageStatus::Delivered);
        assert!(storage.list_undelivered_messages(recipient_id).await.unwrap().is_empty());

        drop(rx);
        manager.unregister(recipient_id);
    }

    #[actix_web::test]
    async fn test_pending_messages_replayed_in_order_on_connect() {
        let (storage, sender, recipient_id) = setup_after(60).await;

        let first = send_message(&storage, &sender, recipient_id, "first".to_string())
            .await
            .unwrap();
        let second = send_message(&storage, &sender, recipient_id, "second".to_string())
            .await
            .unwrap();
        assert_eq!(first.status, MessageStatus::Sent);
        assert_eq!(second.status, MessageStatus::Sent);

        let manager = ConnectionManager::get();
        let mut rx = manager.register(recipient_id);
        deliver_pending_messages(&storage, recipient_id).await;

        let replayed = drain_messages(&mut rx, sender.id);
        let ids: Vec<i64> = replayed.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(replayed.iter().all(|m| m.status == MessageStatus::Delivered));
        assert!(storage.list_undelivered_messages(recipient_id).await.unwrap().is_empty());

        // 已送达的消息不会重复补发
        deliver_pending_messages(&storage, recipient_id).await;
        assert!(drain_messages(&mut rx, sender.id).is_empty());

        drop(rx);
        manager.unregister(recipient_id);
    }
}
