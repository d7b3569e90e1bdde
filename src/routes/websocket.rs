use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::cache::ObjectCache;
use crate::middlewares::create_error_response;
use crate::middlewares::require_jwt::authenticate_access_token;
use crate::models::ErrorCode;
use crate::services::WebSocketService;
use crate::storage::Storage;

/// 浏览器无法给 WebSocket 握手加请求头，令牌放在查询串里
#[derive(Debug, Deserialize)]
pub struct WsConnectQuery {
    pub token: Option<String>,
}

fn unauthorized(message: &str) -> HttpResponse {
    create_error_response(
        actix_web::http::StatusCode::UNAUTHORIZED,
        ErrorCode::Unauthorized,
        message,
    )
}

pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<WsConnectQuery>,
    storage: web::Data<Arc<dyn Storage>>,
    cache: web::Data<Arc<dyn ObjectCache>>,
) -> ActixResult<HttpResponse> {
    let Some(token) = query.into_inner().token.filter(|t| !t.is_empty()) else {
        return Ok(unauthorized("Missing access token"));
    };

    // 升级前完成认证，失败直接返回 401
    let user = match authenticate_access_token(&token, storage.get_ref(), cache.get_ref()).await {
        Ok(user) => user,
        Err(reason) => {
            info!("WebSocket authentication failed: {}", reason);
            return Ok(unauthorized(&reason));
        }
    };

    let (response, session, stream) = actix_ws::handle(&req, body)?;
    actix_web::rt::spawn(WebSocketService::handle_connection(
        user,
        storage.get_ref().clone(),
        session,
        stream,
    ));

    Ok(response)
}

// 配置路由
pub fn configure_websocket_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/ws", web::get().to(connect));
}
