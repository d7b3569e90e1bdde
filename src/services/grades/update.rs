use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, grade_not_found, invalid_score, load_grade};
use crate::models::{
    ApiResponse, ErrorCode,
    grades::{entities::is_valid_score, requests::UpdateGradeRequest},
};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

pub async fn update_grade(
    service: &GradeService,
    grade_id: i64,
    mut body: UpdateGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let grade = match load_grade(&storage, grade_id).await {
        Ok(grade) => grade,
        Err(resp) => return Ok(resp),
    };
    let subject = match load_subject(&storage, grade.subject_id).await {
        Ok(subject) => subject,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    if let Some(title) = body.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Title cannot be empty",
            )));
        }
    }

    // 合并后仍需满足 0 <= score <= max_score
    let score = body.score.unwrap_or(grade.score);
    let max_score = body.max_score.unwrap_or(grade.max_score);
    if !is_valid_score(score, max_score) {
        return Ok(invalid_score());
    }

    match storage.update_grade(grade_id, body).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "成绩更新成功"))),
        Ok(None) => Ok(grade_not_found()),
        Err(e) => Ok(internal_error("Failed to update grade", e)),
    }
}
