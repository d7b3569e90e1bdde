use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, already_graded, load_submission};
use crate::models::{
    ApiResponse, ErrorCode,
    grades::{
        entities::{GradeType, is_valid_score},
        requests::NewGrade,
    },
    notifications::entities::NotificationType,
    submissions::{
        entities::SubmissionStatus, requests::GradeSubmissionRequest,
        responses::GradeSubmissionResponse,
    },
};
use crate::services::assignments::load_assignment;
use crate::services::notifications::{NotificationDraft, notify};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

/// 批改提交：写成绩、标记已批改并通知学生
pub async fn grade_submission(
    service: &SubmissionService,
    submission_id: i64,
    body: GradeSubmissionRequest,
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
    let assignment = match load_assignment(&storage, submission.assignment_id).await {
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

    if submission.status == SubmissionStatus::Graded {
        return Ok(already_graded());
    }
    if !is_valid_score(body.score, assignment.max_score) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradeScoreInvalid,
            format!("Score must be between 0 and {}", assignment.max_score),
        )));
    }

    let new_grade = NewGrade {
        student_id: submission.student_id,
        subject_id: subject.id,
        assignment_id: Some(assignment.id),
        submission_id: Some(submission.id),
        graded_by: user.id,
        grade_type: GradeType::Assignment,
        title: assignment.title.clone(),
        score: body.score,
        max_score: assignment.max_score,
        comment: body.comment,
    };

    let (submission, grade) = match storage.grade_submission(submission_id, new_grade).await {
        Ok(Some(graded)) => graded,
        Ok(None) => return Ok(already_graded()),
        Err(e) => return Ok(internal_error("Failed to grade submission", e)),
    };
    info!(
        "Submission {} graded by {}: {}/{}",
        submission.id, user.id, grade.score, grade.max_score
    );

    notify(
        &storage,
        &[submission.student_id],
        NotificationDraft {
            notification_type: NotificationType::GradePosted,
            title: format!("成绩已发布：{}", assignment.title),
            content: Some(format!("得分 {}/{}", grade.score, grade.max_score)),
            reference_type: "grade",
            reference_id: grade.id,
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeSubmissionResponse { submission, grade },
        "批改成功",
    )))
}
