use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, check_teacher};
use crate::models::{ApiResponse, ErrorCode, subjects::requests::UpdateSubjectRequest};
use crate::services::permissions::{
    current_user, forbidden, internal_error, load_subject, require_subject_manager,
};

pub async fn update_subject(
    service: &SubjectService,
    subject_id: i64,
    body: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let subject = match load_subject(&storage, subject_id).await {
        Ok(subject) => subject,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    if body.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Subject name cannot be empty",
        )));
    }

    // 更换任课教师只能由管理层操作
    if let Some(teacher_id) = body.teacher_id
        && subject.teacher_id != Some(teacher_id)
    {
        if !user.role.is_management() {
            return Ok(forbidden("Only administrators and directors can change the teacher"));
        }
        if let Err(resp) = check_teacher(&storage, teacher_id).await {
            return Ok(resp);
        }
    }

    match storage.update_subject(subject_id, body).await {
        Ok(Some(subject)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(subject, "课程更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubjectNotFound, "Subject not found"))),
        Err(e) => Ok(internal_error("Failed to update subject", e)),
    }
}
