use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::ApiResponse;
use crate::services::permissions::{current_user, load_subject, require_subject_member};

pub async fn get_assignment(
    service: &AssignmentService,
    assignment_id: i64,
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
    if let Err(resp) = require_subject_member(&storage, &user, &subject).await {
        return Ok(resp);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "获取作业成功")))
}
