use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradeService, invalid_score};
use crate::models::{
    ApiResponse, ErrorCode,
    grades::{
        entities::is_valid_score,
        requests::{CreateGradeRequest, NewGrade},
    },
};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

/// 直接录入成绩，学生必须已选该课程
pub async fn create_grade(
    service: &GradeService,
    body: CreateGradeRequest,
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

    let title = body.title.trim().to_string();
    if title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Title cannot be empty",
        )));
    }
    if !is_valid_score(body.score, body.max_score) {
        return Ok(invalid_score());
    }

    match storage.get_enrollment(subject.id, body.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "Student is not enrolled in this subject",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to check enrollment", e)),
    }

    let new_grade = NewGrade {
        student_id: body.student_id,
        subject_id: subject.id,
        assignment_id: None,
        submission_id: None,
        graded_by: user.id,
        grade_type: body.grade_type,
        title,
        score: body.score,
        max_score: body.max_score,
        comment: body.comment,
    };

    match storage.create_grade(new_grade).await {
        Ok(grade) => {
            info!(
                "Grade {} ({}) recorded for student {} by {}",
                grade.id, grade.grade_type, grade.student_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(grade, "成绩录入成功")))
        }
        Err(e) => Ok(internal_error("Failed to create grade", e)),
    }
}
