//! 服务层共用的身份与课程权限检查
//!
//! 检查失败时直接返回可用的 `HttpResponse`，调用方写成
//! `if let Err(resp) = ... { return Ok(resp); }`。

use actix_web::{HttpRequest, HttpResponse};
use std::fmt::Display;
use std::sync::Arc;
use tracing::error;

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    subjects::entities::Subject,
    users::entities::{User, UserRole},
};
use crate::storage::Storage;

/// 取出中间件放入的当前用户
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user information",
        ))
    })
}

/// 记录日志并返回 500
pub(crate) fn internal_error(context: &str, err: impl Display) -> HttpResponse {
    error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {err}"),
    ))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

/// 管理员或校领导
pub(crate) fn require_management(user: &User) -> Result<(), HttpResponse> {
    if user.role.is_management() {
        Ok(())
    } else {
        Err(forbidden("Only administrators and directors can perform this action"))
    }
}

pub(crate) async fn load_subject(
    storage: &Arc<dyn Storage>,
    subject_id: i64,
) -> Result<Subject, HttpResponse> {
    match storage.get_subject_by_id(subject_id).await {
        Ok(Some(subject)) => Ok(subject),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubjectNotFound,
            "Subject not found",
        ))),
        Err(e) => Err(internal_error("Failed to load subject", e)),
    }
}

/// 管理层或课程的任课教师
pub(crate) fn can_manage_subject(user: &User, subject: &Subject) -> bool {
    user.role.is_management()
        || (user.role == UserRole::Teacher && subject.teacher_id == Some(user.id))
}

pub(crate) fn require_subject_manager(user: &User, subject: &Subject) -> Result<(), HttpResponse> {
    if can_manage_subject(user, subject) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::SubjectPermissionDenied,
            "You do not manage this subject",
        )))
    }
}

/// 课程管理者或已选课学生
pub(crate) async fn is_subject_member(
    storage: &Arc<dyn Storage>,
    user: &User,
    subject: &Subject,
) -> Result<bool, HttpResponse> {
    if can_manage_subject(user, subject) {
        return Ok(true);
    }
    if user.role != UserRole::Student {
        return Ok(false);
    }
    storage
        .get_enrollment(subject.id, user.id)
        .await
        .map(|enrollment| enrollment.is_some())
        .map_err(|e| internal_error("Failed to check enrollment", e))
}

pub(crate) async fn require_subject_member(
    storage: &Arc<dyn Storage>,
    user: &User,
    subject: &Subject,
) -> Result<(), HttpResponse> {
    if is_subject_member(storage, user, subject).await? {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::NotEnrolled,
            "You are not a member of this subject",
        )))
    }
}

/// 用户可见的课程 ID，None 表示全部可见
pub(crate) async fn visible_subject_ids(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Option<Vec<i64>>, HttpResponse> {
    let ids = match user.role {
        UserRole::Admin | UserRole::Director => return Ok(None),
        UserRole::Teacher => storage.list_subject_ids_by_teacher(user.id).await,
        UserRole::Student => storage.list_subject_ids_by_student(user.id).await,
    };
    ids.map(Some)
        .map_err(|e| internal_error("Failed to resolve visible subjects", e))
}

/// 只对调用方可管理的课程 ID，None 表示全部
pub(crate) async fn managed_subject_ids(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Option<Vec<i64>>, HttpResponse> {
    match user.role {
        UserRole::Admin | UserRole::Director => Ok(None),
        UserRole::Teacher => storage
            .list_subject_ids_by_teacher(user.id)
            .await
            .map(Some)
            .map_err(|e| internal_error("Failed to resolve taught subjects", e)),
        UserRole::Student => Ok(Some(Vec::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserStatus};

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@school.edu"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            profile: UserProfile {
                display_name: format!("User {id}"),
                avatar_url: None,
            },
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn subject(teacher_id: Option<i64>) -> Subject {
        let now = chrono::Utc::now();
        Subject {
            id: 1,
            code: "MATH-101".to_string(),
            name: "Algebra".to_string(),
            description: None,
            teacher_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_manage_subject() {
        let math = subject(Some(2));
        assert!(can_manage_subject(&user(1, UserRole::Admin), &math));
        assert!(can_manage_subject(&user(9, UserRole::Director), &math));
        assert!(can_manage_subject(&user(2, UserRole::Teacher), &math));
        assert!(!can_manage_subject(&user(3, UserRole::Teacher), &math));
        // 学生即使 ID 相同也不能管理
        assert!(!can_manage_subject(&user(2, UserRole::Student), &math));
        assert!(!can_manage_subject(&user(2, UserRole::Teacher), &subject(None)));
    }

    #[test]
    fn test_require_subject_manager_status() {
        let resp = require_subject_manager(&user(3, UserRole::Teacher), &subject(Some(2)))
            .unwrap_err();
        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
    }
}
