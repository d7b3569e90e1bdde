use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{SubmissionService, load_submission};
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{entities::Submission, responses::SubmissionDetailResponse},
};
use crate::services::assignments::load_assignment;
use crate::services::permissions::{
    can_manage_subject, current_user, forbidden, internal_error, load_subject,
};
use crate::storage::Storage;

async fn with_grade(
    storage: &Arc<dyn Storage>,
    submission: Submission,
) -> Result<SubmissionDetailResponse, HttpResponse> {
    let grade = storage
        .get_grade_by_submission_id(submission.id)
        .await
        .map_err(|e| internal_error("Failed to load grade", e))?;
    Ok(SubmissionDetailResponse { submission, grade })
}

/// 提交者本人或课程管理者可查看
pub async fn get_submission(
    service: &SubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let submission = match load_submission(&storage, submission_id).await {
        Ok(submission) => submission,
        Err(resp) => return Ok(resp),
    };

    if submission.student_id != user.id {
        let assignment = match load_assignment(&storage, submission.assignment_id).await {
            Ok(assignment) => assignment,
            Err(resp) => return Ok(resp),
        };
        let subject = match load_subject(&storage, assignment.subject_id).await {
            Ok(subject) => subject,
            Err(resp) => return Ok(resp),
        };
        if !can_manage_subject(&user, &subject) {
            return Ok(forbidden("You do not have permission to view this submission"));
        }
    }

    match with_grade(&storage, submission).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "获取提交成功"))),
        Err(resp) => Ok(resp),
    }
}

pub async fn get_my_submission(
    service: &SubmissionService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let submission = match storage
        .get_submission_by_assignment_and_student(assignment_id, user.id)
        .await
    {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "You have not submitted this assignment",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to load submission", e)),
    };

    match with_grade(&storage, submission).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "获取提交成功"))),
        Err(resp) => Ok(resp),
    }
}
