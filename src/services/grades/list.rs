use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::{
    ApiResponse,
    grades::requests::{GradeListParams, GradeListQuery},
    users::entities::UserRole,
};
use crate::services::permissions::{
    current_user, forbidden, internal_error, managed_subject_ids,
};

pub async fn list_grades(
    service: &GradeService,
    params: GradeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let (subject_ids, student_id) = if user.role == UserRole::Student {
        // 学生只能查看自己的成绩
        if params.student_id.is_some_and(|id| id != user.id) {
            return Ok(forbidden("Students can only view their own grades"));
        }
        (params.subject_id.map(|id| vec![id]), Some(user.id))
    } else {
        let managed = match managed_subject_ids(&storage, &user).await {
            Ok(managed) => managed,
            Err(resp) => return Ok(resp),
        };
        let subject_ids = match (managed, params.subject_id) {
            (None, None) => None,
            (None, Some(id)) => Some(vec![id]),
            (Some(ids), None) => Some(ids),
            (Some(ids), Some(id)) => Some(ids.into_iter().filter(|v| *v == id).collect()),
        };
        (subject_ids, params.student_id)
    };

    let query = GradeListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        subject_ids,
        student_id,
        grade_type: params.grade_type,
    };

    match storage.list_grades_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取成绩列表成功"))),
        Err(e) => Ok(internal_error("Failed to list grades", e)),
    }
}
