use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::auth::responses::{
    RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
use crate::errors::Result;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::permissions::{current_user, internal_error};
use crate::services::system::DynamicConfig;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn refresh_rejected(message: &str) -> HttpResponse {
    // 清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

/// 存储出错时返回 500 并保留 cookie，只有账号确实不可用才清除
fn refresh_user(lookup: Result<Option<User>>) -> std::result::Result<User, HttpResponse> {
    match lookup {
        Ok(Some(user)) if user.is_active() => Ok(user),
        Ok(_) => Err(refresh_rejected("Account is unavailable, please login again")),
        Err(e) => Err(internal_error("Failed to load user for token refresh", e)),
    }
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(refresh_rejected(
                "Login expired or invalid, please login again",
            ));
        }
    };

    // 角色以数据库为准，签发后被停用的账号不能续期
    let storage = service.get_storage(request);
    let lookup = match claims.user_id() {
        Some(user_id) => storage.get_user_by_id(user_id).await,
        None => Ok(None),
    };
    let user = match refresh_user(lookup) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let access_minutes = DynamicConfig::access_token_expiry().await;
    match JwtUtils::generate_access_token(
        user.id,
        &user.role.to_string(),
        chrono::Duration::minutes(access_minutes),
    ) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: access_minutes * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to generate access token", e)),
    }
}

/// max_age=0 的空 cookie 会让浏览器删除 refresh token
pub async fn handle_logout() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("登出成功")))
}

pub async fn handle_verify_token(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 能走到这里说明 RequireJWT 已通过
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match current_user(request) {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EduPortalError;
    use crate::models::users::entities::{UserProfile, UserRole, UserStatus};
    use actix_web::http::{StatusCode, header::SET_COOKIE};

    fn user(status: UserStatus) -> User {
        let now = chrono::Utc::now();
        User {
            id: 7,
            username: "pupil07".to_string(),
            email: "pupil07@school.edu".to_string(),
            password_hash: String::new(),
            role: UserRole::Student,
            status,
            profile: UserProfile {
                display_name: "Pupil".to_string(),
                avatar_url: None,
            },
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_refresh_user_outcomes() {
        assert_eq!(refresh_user(Ok(Some(user(UserStatus::Active)))).unwrap().id, 7);

        let missing = refresh_user(Ok(None)).unwrap_err();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert!(missing.headers().contains_key(SET_COOKIE));

        let suspended = refresh_user(Ok(Some(user(UserStatus::Suspended)))).unwrap_err();
        assert_eq!(suspended.status(), StatusCode::UNAUTHORIZED);

        // 数据库故障不应把用户登出
        let outage =
            refresh_user(Err(EduPortalError::database_operation("connection reset"))).unwrap_err();
        assert_eq!(outage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!outage.headers().contains_key(SET_COOKIE));
    }
}
