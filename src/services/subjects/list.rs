use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::{
    ApiResponse,
    subjects::requests::{SubjectListParams, SubjectListQuery},
    users::entities::UserRole,
};
use crate::services::permissions::{current_user, internal_error};

pub async fn list_subjects(
    service: &SubjectService,
    params: SubjectListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let mut query = SubjectListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        search: params.search,
        teacher_id: params.teacher_id,
        student_id: None,
    };

    // 教师只看自己任课的课程，学生只看已选课程
    match user.role {
        UserRole::Teacher => query.teacher_id = Some(user.id),
        UserRole::Student => query.student_id = Some(user.id),
        UserRole::Admin | UserRole::Director => {}
    }

    match storage.list_subjects_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取课程列表成功"))),
        Err(e) => Ok(internal_error("Failed to list subjects", e)),
    }
}
