use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CurriculumService, invalid_state, load_plan, plan_not_found};
use crate::models::{
    ApiResponse, curriculum::entities::PlanStatus, users::entities::UserRole,
};
use crate::services::permissions::{current_user, forbidden, internal_error};

/// 创建者可删除未批准的计划，管理员可删除任意计划
pub async fn delete_plan(
    service: &CurriculumService,
    plan_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let plan = match load_plan(&storage, plan_id).await {
        Ok(plan) => plan,
        Err(resp) => return Ok(resp),
    };

    if user.role != UserRole::Admin {
        if plan.created_by != user.id {
            return Ok(forbidden("Only the creator or an administrator can delete this plan"));
        }
        if plan.status == PlanStatus::Approved {
            return Ok(invalid_state("Approved plans can only be deleted by an administrator"));
        }
    }

    match storage.delete_curriculum_plan(plan_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("教学计划已删除"))),
        Ok(false) => Ok(plan_not_found()),
        Err(e) => Ok(internal_error("Failed to delete curriculum plan", e)),
    }
}
