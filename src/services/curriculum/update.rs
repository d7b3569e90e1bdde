use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    CurriculumService, invalid_fields, invalid_state, load_plan, plan_not_found,
    validate_plan_fields,
};
use crate::models::{ApiResponse, curriculum::requests::UpdateCurriculumPlanRequest};
use crate::services::permissions::{current_user, forbidden, internal_error};

/// 草稿或被驳回的计划可由创建者或管理层修改
pub async fn update_plan(
    service: &CurriculumService,
    plan_id: i64,
    mut body: UpdateCurriculumPlanRequest,
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
    if plan.created_by != user.id && !user.role.is_management() {
        return Ok(forbidden("Only the creator or administrators can edit this plan"));
    }
    if !plan.status.is_editable() {
        return Ok(invalid_state("Only draft or rejected plans can be edited"));
    }

    if let Some(title) = body.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Ok(invalid_fields("Title cannot be empty".to_string()));
        }
    }
    if let Err(msg) = validate_plan_fields(
        body.academic_year.as_deref(),
        body.term,
        body.topics.as_deref(),
    ) {
        return Ok(invalid_fields(msg));
    }

    match storage.update_curriculum_plan(plan_id, body).await {
        Ok(Some(plan)) => Ok(HttpResponse::Ok().json(ApiResponse::success(plan, "教学计划更新成功"))),
        Ok(None) => Ok(plan_not_found()),
        Err(e) => Ok(internal_error("Failed to update curriculum plan", e)),
    }
}
