use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::UpdateProfileRequest, responses::UserInfoResponse},
    users::requests::UpdateUserRequest,
};
use crate::services::permissions::{current_user, internal_error};
use crate::services::users::{check_identity_available, invalidate_cached_user};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_email, validate_password_simple};

use super::AuthService;

pub async fn handle_update_profile(
    service: &AuthService,
    update_request: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let mut update = UpdateUserRequest {
        display_name: update_request.display_name,
        avatar_url: update_request.avatar_url,
        ..Default::default()
    };

    if let Some(email) = update_request.email.filter(|e| *e != user.email) {
        if let Err(msg) = validate_email(&email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        if let Err(resp) = check_identity_available(&storage, None, Some(&email), Some(user.id)).await
        {
            return Ok(resp);
        }
        update.email = Some(email);
    }

    if let Some(password) = update_request.password {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
        }

        // 请求扩展里的用户来自缓存，不含密码哈希
        let stored = match storage.get_user_by_id(user.id).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                return Ok(HttpResponse::NotFound()
                    .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found")));
            }
            Err(e) => return Ok(internal_error("Failed to load user", e)),
        };
        let current_ok = update_request
            .current_password
            .as_deref()
            .is_some_and(|current| verify_password(current, &stored.password_hash));
        if !current_ok {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserPasswordInvalid,
                "Current password is incorrect",
            )));
        }

        update.password = match hash_password(&password) {
            Ok(hash) => Some(hash),
            Err(e) => return Ok(internal_error("Password hashing failed", e)),
        };
    }

    match storage.update_user(user.id, update).await {
        Ok(Some(updated)) => {
            invalidate_cached_user(request, user.id).await;
            info!("User {} updated their profile", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserInfoResponse { user: updated },
                "个人资料已更新",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"))),
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, "Email already exists"),
        )),
        Err(e) => Ok(internal_error("Failed to update profile", e)),
    }
}
