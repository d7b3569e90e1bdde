use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::messages::requests::{ConversationParams, SendMessageRequest};
use crate::services::MessageService;
use crate::utils::SafeIDI64;

// 懒加载的全局 MessageService 实例
static MESSAGE_SERVICE: Lazy<MessageService> = Lazy::new(MessageService::new_lazy);

pub async fn send_message(
    req: HttpRequest,
    body: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.send(body.into_inner(), &req).await
}

pub async fn list_conversations(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.conversations(&req).await
}

// 与某个用户的会话
pub async fn get_conversation(
    req: HttpRequest,
    partner: SafeIDI64,
    query: web::Query<ConversationParams>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE
        .conversation(partner.0, query.into_inner(), &req)
        .await
}

pub async fn mark_read(req: HttpRequest, partner: SafeIDI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.mark_read(partner.0, &req).await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.unread_count(&req).await
}

// 配置路由
pub fn configure_message_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/messages")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .wrap(RateLimit::message_send())
                    .route(web::post().to(send_message)),
            )
            .route("/conversations", web::get().to(list_conversations))
            .route("/unread-count", web::get().to(unread_count))
            .route("/conversations/{id}", web::get().to(get_conversation))
            .route("/conversations/{id}/read", web::post().to(mark_read)),
    );
}
