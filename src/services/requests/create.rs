use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AdminRequestService;
use crate::models::{
    ApiResponse, ErrorCode, admin_requests::requests::CreateAdminRequest,
    users::entities::UserRole,
};
use crate::services::permissions::{current_user, forbidden, internal_error};

pub async fn create_request(
    service: &AdminRequestService,
    mut body: CreateAdminRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if !matches!(user.role, UserRole::Student | UserRole::Teacher) {
        return Ok(forbidden("Only students and teachers can file requests"));
    }

    body.title = body.title.trim().to_string();
    if body.title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Title cannot be empty",
        )));
    }

    let storage = service.get_storage(request);
    match storage.create_admin_request(user.id, body).await {
        Ok(created) => {
            info!(
                "Request {} ({}) filed by {}",
                created.id, created.request_type, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(created, "申请已提交")))
        }
        Err(e) => Ok(internal_error("Failed to create request", e)),
    }
}
