use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::SubmissionService;
use crate::models::{
    ApiResponse,
    submissions::{
        requests::{SubmissionListParams, SubmissionListQuery},
        responses::{SubmissionListItem, SubmissionListResponse},
    },
};
use crate::services::assignments::load_assignment;
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

pub async fn list_for_assignment(
    service: &SubmissionService,
    assignment_id: i64,
    params: SubmissionListParams,
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

    let query = SubmissionListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        assignment_id: Some(assignment_id),
        student_id: None,
        status: params.status,
    };
    let page = match storage.list_submissions_with_pagination(query).await {
        Ok(page) => page,
        Err(e) => return Ok(internal_error("Failed to list submissions", e)),
    };

    let student_ids: Vec<i64> = page.items.iter().map(|s| s.student_id).collect();
    let mut students: HashMap<i64, _> = match storage.get_users_by_ids(&student_ids).await {
        Ok(users) => users.into_iter().map(|u| (u.id, u.brief())).collect(),
        Err(e) => return Ok(internal_error("Failed to load students", e)),
    };

    let items = page
        .items
        .into_iter()
        .map(|submission| SubmissionListItem {
            student: students.remove(&submission.student_id),
            submission,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionListResponse {
            items,
            pagination: page.pagination,
        },
        "获取提交列表成功",
    )))
}
