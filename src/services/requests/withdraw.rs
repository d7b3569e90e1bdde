use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AdminRequestService, already_reviewed, load_request, request_not_found};
use crate::models::{ApiResponse, admin_requests::entities::RequestStatus};
use crate::services::permissions::{current_user, forbidden, internal_error};

/// 申请人撤回仍在待审批的申请
pub async fn withdraw_request(
    service: &AdminRequestService,
    request_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let existing = match load_request(&storage, request_id).await {
        Ok(existing) => existing,
        Err(resp) => return Ok(resp),
    };
    if existing.requester_id != user.id {
        return Ok(forbidden("Only the requester can withdraw a request"));
    }
    if existing.status != RequestStatus::Pending {
        return Ok(already_reviewed());
    }

    match storage.delete_pending_admin_request(request_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("申请已撤回"))),
        // 并发审批或删除
        Ok(false) => match storage.get_admin_request_by_id(request_id).await {
            Ok(Some(_)) => Ok(already_reviewed()),
            Ok(None) => Ok(request_not_found()),
            Err(e) => Ok(internal_error("Failed to load request", e)),
        },
        Err(e) => Ok(internal_error("Failed to withdraw request", e)),
    }
}
