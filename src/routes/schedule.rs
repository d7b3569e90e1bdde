use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schedule::requests::{
    CreateScheduleItemRequest, ScheduleListParams, UpdateScheduleItemRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ScheduleService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ScheduleService 实例
static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn list_schedule(
    req: HttpRequest,
    query: web::Query<ScheduleListParams>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.list_schedule(query.into_inner(), &req).await
}

pub async fn create_item(
    req: HttpRequest,
    body: web::Json<CreateScheduleItemRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.create_item(body.into_inner(), &req).await
}

pub async fn update_item(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateScheduleItemRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .update_item(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_item(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_item(path.0, &req).await
}

// 配置路由
pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedule")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 课表对所有登录用户可见，按可见课程过滤
                    .route(web::get().to(list_schedule))
                    .route(
                        web::post()
                            .to(create_item)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::put().to(update_item))
                    .route(web::delete().to(delete_item)),
            ),
    );
}
