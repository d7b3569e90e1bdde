use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::{ApiResponse, subjects::responses::SubjectDetailResponse};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_member,
};

pub async fn get_subject(
    service: &SubjectService,
    subject_id: i64,
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
    if let Err(resp) = require_subject_member(&storage, &user, &subject).await {
        return Ok(resp);
    }

    let teacher = match subject.teacher_id {
        Some(teacher_id) => match storage.get_user_by_id(teacher_id).await {
            Ok(teacher) => teacher.map(|t| t.brief()),
            Err(e) => return Ok(internal_error("Failed to load teacher", e)),
        },
        None => None,
    };
    let student_count = match storage.count_enrollments(subject.id).await {
        Ok(count) => count,
        Err(e) => return Ok(internal_error("Failed to count enrollments", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubjectDetailResponse {
            subject,
            teacher,
            student_count,
        },
        "获取课程成功",
    )))
}
