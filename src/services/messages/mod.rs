pub mod conversation;
pub mod read;
pub mod send;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::messages::requests::{ConversationParams, SendMessageRequest};
use crate::storage::Storage;

pub use read::mark_conversation_read;
pub use send::{SendMessageError, deliver_pending_messages, send_message};

pub struct MessageService {
    storage: Option<Arc<dyn Storage>>,
}

impl MessageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 发送私信
    pub async fn send(
        &self,
        body: SendMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        send::handle_send(self, body, request).await
    }

    // 与某个用户的会话记录
    pub async fn conversation(
        &self,
        partner_id: i64,
        params: ConversationParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        conversation::get_conversation(self, partner_id, params, request).await
    }

    // 会话列表
    pub async fn conversations(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        conversation::list_conversations(self, request).await
    }

    // 标记与某用户的会话为已读
    pub async fn mark_read(&self, partner_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::handle_mark_read(self, partner_id, request).await
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::get_unread_count(self, request).await
    }
}
