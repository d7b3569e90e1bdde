use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::system::requests::{SettingAuditQuery, UpdateSettingRequest};
use crate::models::users::entities::UserRole;
use crate::services::SystemService;
use crate::utils::SafeSettingKey;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn health(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.health(&request).await
}

pub async fn get_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_settings(&request).await
}

pub async fn list_admin_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.list_admin_settings(&request).await
}

pub async fn update_setting(
    request: HttpRequest,
    key: SafeSettingKey,
    body: web::Json<UpdateSettingRequest>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .update_setting(key.0, body.into_inner(), &request)
        .await
}

pub async fn list_setting_audits(
    request: HttpRequest,
    query: web::Query<SettingAuditQuery>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .list_setting_audits(query.into_inner(), &request)
        .await
}

pub async fn websocket_status() -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.websocket_status().await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    // 健康检查无需登录
    cfg.route("/api/v1/health", web::get().to(health));

    cfg.service(
        web::scope("/api/v1/system")
            .wrap(middleware::Compress::default())
            .wrap(middlewares::RequireJWT)
            .route("/settings", web::get().to(get_settings))
            .service(
                web::scope("/admin")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/settings", web::get().to(list_admin_settings))
                    .route("/settings/audits", web::get().to(list_setting_audits))
                    .route("/settings/{key}", web::put().to(update_setting))
                    .route("/websocket", web::get().to(websocket_status)),
            ),
    );
}
