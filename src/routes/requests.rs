use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::admin_requests::requests::{
    AdminRequestListParams, CreateAdminRequest, ReviewAdminRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AdminRequestService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AdminRequestService 实例
static REQUEST_SERVICE: Lazy<AdminRequestService> = Lazy::new(AdminRequestService::new_lazy);

pub async fn list_requests(
    req: HttpRequest,
    query: web::Query<AdminRequestListParams>,
) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE.list_requests(query.into_inner(), &req).await
}

pub async fn create_request(
    req: HttpRequest,
    body: web::Json<CreateAdminRequest>,
) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE.create_request(body.into_inner(), &req).await
}

pub async fn get_request(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE.get_request(path.0, &req).await
}

// 审批
pub async fn review_request(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ReviewAdminRequest>,
) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE
        .review_request(path.0, body.into_inner(), &req)
        .await
}

// 撤回
pub async fn withdraw_request(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE.withdraw_request(path.0, &req).await
}

// 配置路由
pub fn configure_request_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/requests")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_requests))
                    .route(
                        web::post()
                            .to(create_request)
                            .wrap(middlewares::RequireRole::new_any(&[
                                &UserRole::Student,
                                &UserRole::Teacher,
                            ])),
                    ),
            )
            .service(
                web::resource("/{id}")
                    // 申请人本人或管理层
                    .route(web::get().to(get_request))
                    .route(web::delete().to(withdraw_request)),
            )
            .service(
                web::resource("/{id}/review")
                    .wrap(middlewares::RequireRole::new_any(UserRole::management_roles()))
                    .route(web::post().to(review_request)),
            ),
    );
}
