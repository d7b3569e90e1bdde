use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{AssignmentService, DEFAULT_MAX_SCORE, validate_max_score};
use crate::models::{
    ApiResponse, ErrorCode, assignments::requests::CreateAssignmentRequest,
    notifications::entities::NotificationType,
};
use crate::services::notifications::{NotificationDraft, notify};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

pub async fn create_assignment(
    service: &AssignmentService,
    mut body: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let subject = match load_subject(&storage, body.subject_id).await {
        Ok(subject) => subject,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    body.title = body.title.trim().to_string();
    if body.title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Title cannot be empty",
        )));
    }
    let max_score = body.max_score.unwrap_or(DEFAULT_MAX_SCORE);
    if let Err(resp) = validate_max_score(max_score) {
        return Ok(resp);
    }
    body.max_score = Some(max_score);

    let assignment = match storage.create_assignment(user.id, body).await {
        Ok(assignment) => assignment,
        Err(e) => return Ok(internal_error("Failed to create assignment", e)),
    };
    info!(
        "Assignment {} created in subject {} by {}",
        assignment.id, subject.code, user.id
    );

    match storage.list_enrolled_student_ids(subject.id).await {
        Ok(student_ids) => {
            notify(
                &storage,
                &student_ids,
                NotificationDraft {
                    notification_type: NotificationType::AssignmentCreated,
                    title: format!("新作业：{}", assignment.title),
                    content: Some(format!("{} 发布了新作业", subject.name)),
                    reference_type: "assignment",
                    reference_id: assignment.id,
                },
            )
            .await;
        }
        Err(e) => warn!(
            "Failed to load students of subject {} for notification: {}",
            subject.id, e
        ),
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "作业创建成功")))
}
