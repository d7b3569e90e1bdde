use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AdminRequestService, load_request};
use crate::models::ApiResponse;
use crate::services::permissions::{current_user, forbidden};

pub async fn get_request(
    service: &AdminRequestService,
    request_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let admin_request = match load_request(&storage, request_id).await {
        Ok(admin_request) => admin_request,
        Err(resp) => return Ok(resp),
    };
    if admin_request.requester_id != user.id && !user.role.is_management() {
        return Ok(forbidden("You do not have permission to view this request"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(admin_request, "获取申请成功")))
}
