use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::curriculum::requests::{
    CreateCurriculumPlanRequest, CurriculumPlanListParams, ReviewCurriculumPlanRequest,
    UpdateCurriculumPlanRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CurriculumService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CurriculumService 实例
static CURRICULUM_SERVICE: Lazy<CurriculumService> = Lazy::new(CurriculumService::new_lazy);

pub async fn list_plans(
    req: HttpRequest,
    query: web::Query<CurriculumPlanListParams>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.list_plans(query.into_inner(), &req).await
}

pub async fn create_plan(
    req: HttpRequest,
    body: web::Json<CreateCurriculumPlanRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.create_plan(body.into_inner(), &req).await
}

pub async fn get_plan(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.get_plan(path.0, &req).await
}

pub async fn update_plan(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateCurriculumPlanRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .update_plan(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_plan(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.delete_plan(path.0, &req).await
}

// 提交审核
pub async fn submit_plan(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE.submit_plan(path.0, &req).await
}

// 审核
pub async fn review_plan(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ReviewCurriculumPlanRequest>,
) -> ActixResult<HttpResponse> {
    CURRICULUM_SERVICE
        .review_plan(path.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_curriculum_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/curriculum")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_plans))
                    .route(
                        web::post()
                            .to(create_plan)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_plan))
                    .route(
                        web::put()
                            .to(update_plan)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_plan)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/submit")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(submit_plan)),
            )
            .service(
                web::resource("/{id}/review")
                    .wrap(middlewares::RequireRole::new_any(UserRole::management_roles()))
                    .route(web::post().to(review_plan)),
            ),
    );
}
