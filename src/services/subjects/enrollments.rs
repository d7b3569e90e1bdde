use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use tracing::info;

use super::SubjectService;
use crate::models::{
    ApiResponse, ErrorCode, PaginationQuery,
    subjects::{
        entities::EnrolledStudent, requests::EnrollStudentRequest,
        responses::EnrollmentListResponse,
    },
    users::entities::UserRole,
};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

fn already_enrolled() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::EnrollmentAlreadyExists,
        "Student is already enrolled in this subject",
    ))
}

pub async fn list_students(
    service: &SubjectService,
    subject_id: i64,
    pagination: PaginationQuery,
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
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    let page = match storage
        .list_enrollments_with_pagination(
            subject_id,
            Some(pagination.page),
            Some(pagination.size),
        )
        .await
    {
        Ok(page) => page,
        Err(e) => return Ok(internal_error("Failed to list enrollments", e)),
    };

    let student_ids: Vec<i64> = page.items.iter().map(|e| e.student_id).collect();
    let students: HashMap<i64, _> = match storage.get_users_by_ids(&student_ids).await {
        Ok(users) => users.into_iter().map(|u| (u.id, u.brief())).collect(),
        Err(e) => return Ok(internal_error("Failed to load students", e)),
    };

    let items = page
        .items
        .into_iter()
        .filter_map(|enrollment| {
            Some(EnrolledStudent {
                enrollment_id: enrollment.id,
                student: students.get(&enrollment.student_id)?.clone(),
                enrolled_at: enrollment.enrolled_at,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EnrollmentListResponse {
            items,
            pagination: page.pagination,
        },
        "获取选课名单成功",
    )))
}

pub async fn enroll_student(
    service: &SubjectService,
    subject_id: i64,
    body: EnrollStudentRequest,
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
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    match storage.get_user_by_id(body.student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Only students can be enrolled",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
        }
        Err(e) => return Ok(internal_error("Failed to load student", e)),
    }

    match storage.get_enrollment(subject_id, body.student_id).await {
        Ok(Some(_)) => return Ok(already_enrolled()),
        Ok(None) => {}
        Err(e) => return Ok(internal_error("Failed to check enrollment", e)),
    }

    match storage.enroll_student(subject_id, body.student_id).await {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in subject {} by {}",
                body.student_id, subject_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "选课成功")))
        }
        Err(e) if e.is_unique_violation() => Ok(already_enrolled()),
        Err(e) => Ok(internal_error("Failed to enroll student", e)),
    }
}

pub async fn unenroll_student(
    service: &SubjectService,
    subject_id: i64,
    student_id: i64,
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
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    match storage.unenroll_student(subject_id, student_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("已退课"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(internal_error("Failed to unenroll student", e)),
    }
}
