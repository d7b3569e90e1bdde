use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AdminRequestService, already_reviewed, load_request};
use crate::models::{
    ApiResponse, ErrorCode,
    admin_requests::{entities::RequestStatus, requests::ReviewAdminRequest},
    notifications::entities::NotificationType,
};
use crate::services::notifications::{NotificationDraft, notify};
use crate::services::permissions::{current_user, internal_error, require_management};

pub async fn review_request(
    service: &AdminRequestService,
    request_id: i64,
    body: ReviewAdminRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_management(&user) {
        return Ok(resp);
    }

    if body.status == RequestStatus::Pending {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Review status must be approved or rejected",
        )));
    }

    let storage = service.get_storage(request);
    let existing = match load_request(&storage, request_id).await {
        Ok(existing) => existing,
        Err(resp) => return Ok(resp),
    };
    if existing.status != RequestStatus::Pending {
        return Ok(already_reviewed());
    }

    let reviewed = match storage
        .review_admin_request(request_id, user.id, body.status, body.comment)
        .await
    {
        Ok(Some(reviewed)) => reviewed,
        Ok(None) => return Ok(already_reviewed()),
        Err(e) => return Ok(internal_error("Failed to review request", e)),
    };
    info!("Request {} {} by {}", reviewed.id, reviewed.status, user.id);

    let verdict = if reviewed.status == RequestStatus::Approved {
        "已通过"
    } else {
        "已驳回"
    };
    notify(
        &storage,
        &[reviewed.requester_id],
        NotificationDraft {
            notification_type: NotificationType::RequestReviewed,
            title: format!("申请{}：{}", verdict, reviewed.title),
            content: reviewed.review_comment.clone(),
            reference_type: "request",
            reference_id: reviewed.id,
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(reviewed, "审批完成")))
}
