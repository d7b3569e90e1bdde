use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CurriculumService;
use crate::models::{
    ApiResponse,
    curriculum::requests::{CurriculumPlanListParams, CurriculumPlanListQuery},
    users::entities::UserRole,
};
use crate::services::permissions::{current_user, internal_error, visible_subject_ids};

/// 学生只看已选课程中已批准的计划，教师看任课课程的全部计划
pub async fn list_plans(
    service: &CurriculumService,
    params: CurriculumPlanListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let visible = match visible_subject_ids(&storage, &user).await {
        Ok(visible) => visible,
        Err(resp) => return Ok(resp),
    };

    let query = CurriculumPlanListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        subject_id: params.subject_id,
        status: params.status,
        visible_subject_ids: visible,
        approved_only: user.role == UserRole::Student,
    };

    match storage.list_curriculum_plans_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取教学计划列表成功"))),
        Err(e) => Ok(internal_error("Failed to list curriculum plans", e)),
    }
}
