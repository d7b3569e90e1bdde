use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{
    ApiResponse,
    assignments::requests::{AssignmentListParams, AssignmentListQuery},
};
use crate::services::permissions::{current_user, internal_error, visible_subject_ids};

pub async fn list_assignments(
    service: &AssignmentService,
    params: AssignmentListParams,
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
    let subject_ids = match (visible, params.subject_id) {
        (None, None) => None,
        (None, Some(id)) => Some(vec![id]),
        (Some(ids), None) => Some(ids),
        (Some(ids), Some(id)) => Some(ids.into_iter().filter(|v| *v == id).collect()),
    };

    let query = AssignmentListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        subject_ids,
        search: params.search,
    };

    match storage.list_assignments_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取作业列表成功"))),
        Err(e) => Ok(internal_error("Failed to list assignments", e)),
    }
}
