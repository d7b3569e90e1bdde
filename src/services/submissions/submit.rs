use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, already_graded};
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{
        entities::SubmissionStatus,
        requests::{NewSubmission, SubmitAssignmentRequest},
    },
    users::entities::UserRole,
};
use crate::services::assignments::load_assignment;
use crate::services::permissions::{current_user, forbidden, internal_error};

pub async fn submit_assignment(
    service: &SubmissionService,
    assignment_id: i64,
    body: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if user.role != UserRole::Student {
        return Ok(forbidden("Only students can submit assignments"));
    }
    let storage = service.get_storage(request);

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };

    match storage.get_enrollment(assignment.subject_id, user.id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "You are not enrolled in this subject",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to check enrollment", e)),
    }

    let content = body.content.trim().to_string();
    if content.is_empty() && body.document_id.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Submission must have content or an attached document",
        )));
    }

    // 附件必须是自己上传的文档
    if let Some(document_id) = body.document_id {
        match storage.get_document_by_id(document_id).await {
            Ok(Some(document)) if document.owner_id == user.id => {}
            Ok(Some(_)) => {
                return Ok(forbidden("The attached document does not belong to you"));
            }
            Ok(None) => {
                return Ok(HttpResponse::NotFound()
                    .json(ApiResponse::error_empty(ErrorCode::FileNotFound, "Document not found")));
            }
            Err(e) => return Ok(internal_error("Failed to load document", e)),
        }
    }

    let status = if assignment.is_late_at(chrono::Utc::now()) {
        SubmissionStatus::Late
    } else {
        SubmissionStatus::Submitted
    };

    let existing = match storage
        .get_submission_by_assignment_and_student(assignment_id, user.id)
        .await
    {
        Ok(existing) => existing,
        Err(e) => return Ok(internal_error("Failed to load submission", e)),
    };

    if let Some(existing) = existing {
        if existing.status == SubmissionStatus::Graded {
            return Ok(already_graded());
        }
        return match storage
            .resubmit_submission(existing.id, content, body.document_id, status)
            .await
        {
            Ok(Some(submission)) => {
                info!(
                    "Submission {} replaced by student {} ({})",
                    submission.id, user.id, submission.status
                );
                Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "作业已重新提交")))
            }
            // 检查之后被批改
            Ok(None) => Ok(already_graded()),
            Err(e) => Ok(internal_error("Failed to resubmit assignment", e)),
        };
    }

    let new_submission = NewSubmission {
        assignment_id,
        student_id: user.id,
        content,
        document_id: body.document_id,
        status,
    };
    match storage.create_submission(new_submission).await {
        Ok(submission) => {
            info!(
                "Submission {} created by student {} ({})",
                submission.id, user.id, submission.status
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "作业提交成功")))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::Conflict, "Submission was created concurrently"),
        )),
        Err(e) => Ok(internal_error("Failed to submit assignment", e)),
    }
}
