use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment, validate_max_score};
use crate::models::{ApiResponse, ErrorCode, assignments::requests::UpdateAssignmentRequest};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

pub async fn update_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    mut body: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };
    let subject = match load_subject(&storage, assignment.subject_id).await {
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
    if let Some(max_score) = body.max_score
        && let Err(resp) = validate_max_score(max_score)
    {
        return Ok(resp);
    }

    match storage.update_assignment(assignment_id, body).await {
        Ok(Some(assignment)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "作业更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(internal_error("Failed to update assignment", e)),
    }
}
