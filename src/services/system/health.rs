use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::{
    ApiResponse, AppStartTime,
    system::responses::{HealthResponse, WebSocketStatusResponse},
};
use crate::services::websocket::ConnectionManager;

/// 公开的健康检查
pub async fn health(_service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| (chrono::Utc::now() - start.start_datetime).num_seconds())
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
        },
        "Service is healthy",
    )))
}

pub async fn websocket_status() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        WebSocketStatusResponse {
            online_users: ConnectionManager::get().online_count(),
            status: "running".to_string(),
        },
        "WebSocket status retrieved successfully",
    )))
}
