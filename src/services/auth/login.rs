use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
    users::entities::User,
};
use crate::services::permissions::internal_error;
use crate::services::system::DynamicConfig;
use crate::utils::jwt::{JwtUtils, TokenPair};
use crate::utils::password::verify_password;

use super::AuthService;

/// 签发的令牌及其有效期
pub(crate) struct IssuedTokens {
    pub pair: TokenPair,
    /// access token 有效秒数
    pub expires_in: i64,
    /// refresh cookie 有效天数
    pub refresh_days: i64,
}

/// 按当前动态配置为用户签发令牌对
pub(crate) async fn issue_tokens(user: &User, remember_me: bool) -> Result<IssuedTokens, String> {
    let access_minutes = DynamicConfig::access_token_expiry().await;
    let refresh_days = if remember_me {
        DynamicConfig::refresh_token_remember_me_expiry().await
    } else {
        DynamicConfig::refresh_token_expiry().await
    };

    let pair = user.generate_token_pair(
        chrono::Duration::minutes(access_minutes),
        chrono::Duration::days(refresh_days),
    )?;

    Ok(IssuedTokens {
        pair,
        expires_in: access_minutes * 60,
        refresh_days,
    })
}

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 根据用户名或邮箱查找用户
    let user = match storage
        .get_user_by_username_or_email(&login_request.username)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(auth_failed()),
        Err(e) => return Ok(internal_error("Login failed", e)),
    };

    // 2. 校验密码
    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Login failed for user {}: wrong password", user.username);
        return Ok(auth_failed());
    }

    // 3. 非活跃账号不允许登录
    if !user.is_active() {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            format!("Account is {}", user.status),
        )));
    }

    // 4. 签发令牌
    let tokens = match issue_tokens(&user, login_request.remember_me).await {
        Ok(tokens) => tokens,
        Err(e) => return Ok(internal_error("Login failed, unable to generate token", e)),
    };

    // 5. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    info!("User {} logged in successfully", user.username);

    let refresh_cookie =
        JwtUtils::create_refresh_token_cookie(&tokens.pair.refresh_token, tokens.refresh_days);
    let response = LoginResponse {
        access_token: tokens.pair.access_token,
        expires_in: tokens.expires_in,
        user: User {
            last_login: Some(chrono::Utc::now()),
            ..user
        },
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
