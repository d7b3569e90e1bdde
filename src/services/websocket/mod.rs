/*!
 * WebSocket 实时推送
 *
 * 客户端连接 `ws://host/api/v1/ws?token=<access_token>`，握手前校验令牌。
 * 每个用户一个广播通道，多个标签页各自订阅；接收方落后时直接丢弃旧消息。
 *
 * ## 帧格式（按 `type` 区分）
 *
 * 客户端发送：
 * ```json
 * {"type": "ping"}
 * {"type": "send_message", "recipient_id": 7, "content": "hi"}
 * {"type": "mark_read", "partner_id": 7}
 * ```
 *
 * 服务端推送：
 * ```json
 * {"type": "connected", "user_id": 3}
 * {"type": "message", "payload": {"id": 1, "sender_id": 7, "status": "delivered", ...}}
 * {"type": "messages_read", "reader_id": 7, "count": 2}
 * {"type": "notification", "payload": {"id": 5, "notification_type": "grade_posted", ...}}
 * ```
 */

use actix_ws::Message as WsFrame;
use dashmap::DashMap;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::{messages::entities::Message, notifications::entities::Notification};
use crate::models::users::entities::User;
use crate::services::messages::{deliver_pending_messages, mark_conversation_read, send_message};
use crate::storage::Storage;

static CONNECTION_MANAGER: Lazy<ConnectionManager> = Lazy::new(ConnectionManager::new);

/// 服务端推送的帧
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    Connected { user_id: i64 },
    Pong,
    /// 收到的私信
    Message { payload: Message },
    /// 自己发出的私信已保存
    MessageSent { payload: Message },
    /// 对方已读
    MessagesRead { reader_id: i64, count: u64 },
    Notification { payload: Notification },
    Error { message: String },
}

/// 客户端发送的帧
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Ping,
    SendMessage { recipient_id: i64, content: String },
    MarkRead { partner_id: i64 },
}

pub struct ConnectionManager {
    connections: DashMap<i64, broadcast::Sender<WsMessage>>,
}

impl ConnectionManager {
    fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn get() -> &'static Self {
        &CONNECTION_MANAGER
    }

    pub fn register(&self, user_id: i64) -> broadcast::Receiver<WsMessage> {
        let capacity = AppConfig::get().websocket.channel_capacity.max(1);
        self.connections
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(capacity).0)
            .subscribe()
    }

    /// 最后一个订阅者离开时移除通道
    pub fn unregister(&self, user_id: i64) {
        self.connections
            .remove_if(&user_id, |_, sender| sender.receiver_count() == 0);
    }

    /// 用户不在线时返回 false
    pub fn send_to_user(&self, user_id: i64, message: WsMessage) -> bool {
        self.connections
            .get(&user_id)
            .is_some_and(|sender| sender.send(message).is_ok())
    }

    pub fn push_notification(&self, notification: Notification) -> bool {
        let user_id = notification.user_id;
        self.send_to_user(
            user_id,
            WsMessage::Notification {
                payload: notification,
            },
        )
    }

    pub fn online_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.receiver_count() > 0)
            .count()
    }

    pub fn is_online(&self, user_id: i64) -> bool {
        self.connections
            .get(&user_id)
            .is_some_and(|sender| sender.receiver_count() > 0)
    }
}

fn encode(message: &WsMessage) -> Option<String> {
    serde_json::to_string(message)
        .map_err(|e| warn!("Failed to encode websocket frame: {}", e))
        .ok()
}

pub struct WebSocketService;

impl WebSocketService {
    /// 处理一条已升级的连接，直到任一方关闭
    pub async fn handle_connection(
        user: User,
        storage: Arc<dyn Storage>,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        let user_id = user.id;
        info!("WebSocket connected for user: {}", user_id);

        let manager = ConnectionManager::get();
        let mut rx = manager.register(user_id);

        if let Some(json) = encode(&WsMessage::Connected { user_id }) {
            let _ = session.text(json).await;
        }

        // 补发离线期间的私信
        deliver_pending_messages(&storage, user_id).await;

        let heartbeat_secs = AppConfig::get().websocket.heartbeat_interval.max(1);
        let mut heartbeat = tokio::time::interval(std::time::Duration::from_secs(heartbeat_secs));

        loop {
            tokio::select! {
                frame = stream.next() => {
                    match frame {
                        Some(Ok(WsFrame::Text(text))) => {
                            if let Some(reply) = Self::handle_client_frame(&user, &storage, &text).await
                                && let Some(json) = encode(&reply)
                                && session.text(json).await.is_err()
                            {
                                break;
                            }
                        }
                        Some(Ok(WsFrame::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(WsFrame::Close(reason))) => {
                            debug!("WebSocket close frame from user {}: {:?}", user_id, reason);
                            break;
                        }
                        None => break,
                        Some(Err(e)) => {
                            warn!("WebSocket error for user {}: {:?}", user_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                pushed = rx.recv() => {
                    match pushed {
                        Ok(message) => {
                            if let Some(json) = encode(&message)
                                && session.text(json).await.is_err()
                            {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("WebSocket for user {} lagged by {} messages", user_id, n);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(rx);
        manager.unregister(user_id);
        let _ = session.close(None).await;
        info!("WebSocket disconnected for user: {}", user_id);
    }

    /// 返回需要直接回给本连接的帧；其余结果经广播通道送达
    async fn handle_client_frame(
        user: &User,
        storage: &Arc<dyn Storage>,
        text: &str,
    ) -> Option<WsMessage> {
        let frame = match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => frame,
            Err(e) => {
                return Some(WsMessage::Error {
                    message: format!("Invalid frame: {e}"),
                });
            }
        };

        match frame {
            ClientFrame::Ping => Some(WsMessage::Pong),
            ClientFrame::SendMessage {
                recipient_id,
                content,
            } => match send_message(storage, user, recipient_id, content).await {
                Ok(_) => None,
                Err(e) => Some(WsMessage::Error {
                    message: e.to_string(),
                }),
            },
            ClientFrame::MarkRead { partner_id } => {
                match mark_conversation_read(storage, user.id, partner_id).await {
                    Ok(_) => None,
                    Err(e) => Some(WsMessage::Error {
                        message: format!("Failed to mark messages as read: {e}"),
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_frames_decode() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"send_message","recipient_id":4,"content":"hi"}"#)
                .unwrap();
        assert!(matches!(
            frame,
            ClientFrame::SendMessage { recipient_id: 4, ref content } if content == "hi"
        ));
        assert!(matches!(
            serde_json::from_str::<ClientFrame>(r#"{"type":"ping"}"#).unwrap(),
            ClientFrame::Ping
        ));
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"shout"}"#).is_err());
    }

    #[test]
    fn test_server_frames_are_tagged() {
        let json = serde_json::to_value(WsMessage::MessagesRead {
            reader_id: 3,
            count: 2,
        })
        .unwrap();
        assert_eq!(json["type"], "messages_read");
        assert_eq!(json["reader_id"], 3);
        assert_eq!(
            serde_json::to_value(WsMessage::Pong).unwrap()["type"],
            "pong"
        );
    }

    #[actix_web::test]
    async fn test_register_and_send() {
        let manager = ConnectionManager::new();
        assert!(!manager.send_to_user(42, WsMessage::Pong));

        let mut rx = manager.register(42);
        assert!(manager.is_online(42));
        assert_eq!(manager.online_count(), 1);
        assert!(manager.send_to_user(42, WsMessage::Connected { user_id: 42 }));
        assert!(matches!(
            rx.recv().await.unwrap(),
            WsMessage::Connected { user_id: 42 }
        ));

        drop(rx);
        manager.unregister(42);
        assert!(!manager.is_online(42));
        assert_eq!(manager.online_count(), 0);
    }
}
