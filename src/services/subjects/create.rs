use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubjectService, check_teacher};
use crate::models::{ApiResponse, ErrorCode, subjects::requests::CreateSubjectRequest};
use crate::services::permissions::{current_user, internal_error, require_management};
use crate::utils::validate::validate_subject_code;

fn code_taken() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::SubjectCodeAlreadyExists,
        "Subject code already exists",
    ))
}

pub async fn create_subject(
    service: &SubjectService,
    mut body: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_management(&user) {
        return Ok(resp);
    }

    body.code = body.code.trim().to_string();
    body.name = body.name.trim().to_string();

    if let Err(msg) = validate_subject_code(&body.code) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SubjectCodeInvalid, msg)));
    }
    if body.name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Subject name cannot be empty",
        )));
    }

    let storage = service.get_storage(request);

    if let Some(teacher_id) = body.teacher_id
        && let Err(resp) = check_teacher(&storage, teacher_id).await
    {
        return Ok(resp);
    }

    match storage.get_subject_by_code(&body.code).await {
        Ok(Some(_)) => return Ok(code_taken()),
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check subject code", e)),
    }

    match storage.create_subject(body).await {
        Ok(subject) => {
            info!("Subject {} created by {}", subject.code, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(subject, "课程创建成功")))
        }
        Err(e) if e.is_unique_violation() => Ok(code_taken()),
        Err(e) => Ok(internal_error("Failed to create subject", e)),
    }
}
