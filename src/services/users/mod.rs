pub mod create;
pub mod delete;
pub mod directory;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::require_jwt::invalidate_user_cache;
use crate::models::{
    ApiResponse, ErrorCode,
    users::requests::{CreateUserRequest, UpdateUserRequest, UserDirectoryParams, UserListParams},
};
use crate::services::permissions::internal_error;
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }

    // 通讯录
    pub async fn directory(
        &self,
        query: UserDirectoryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        directory::list_directory(self, query, request).await
    }
}

/// 用户资料变化后清除认证缓存
pub(crate) async fn invalidate_cached_user(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>() {
        invalidate_user_cache(cache.get_ref(), user_id).await;
    }
}

/// 检查用户名、邮箱是否已被其他用户占用
pub(crate) async fn check_identity_available(
    storage: &Arc<dyn Storage>,
    username: Option<&str>,
    email: Option<&str>,
    exclude_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let taken = |found: &Option<crate::models::users::entities::User>| {
        found.as_ref().is_some_and(|u| Some(u.id) != exclude_id)
    };

    if let Some(username) = username {
        match storage.get_user_by_username(username).await {
            Ok(found) if taken(&found) => {
                return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserNameAlreadyExists,
                    "Username already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(internal_error("Failed to check username", e)),
        }
    }

    if let Some(email) = email {
        match storage.get_user_by_email(email).await {
            Ok(found) if taken(&found) => {
                return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserEmailAlreadyExists,
                    "Email already exists",
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(internal_error("Failed to check email", e)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::create_user;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_identity_conflicts_ignore_the_user_being_updated() {
        let concrete = SeaOrmStorage::in_memory().await.unwrap();
        let alice = create_user(&concrete, "alice", UserRole::Student).await;
        let bob = create_user(&concrete, "bob", UserRole::Student).await;
        let storage: Arc<dyn Storage> = Arc::new(concrete);

        let taken = check_identity_available(&storage, Some("alice"), None, None)
            .await
            .unwrap_err();
        assert_eq!(taken.status(), StatusCode::CONFLICT);

        let taken = check_identity_available(&storage, None, Some("alice@school.test"), Some(bob))
            .await
            .unwrap_err();
        assert_eq!(taken.status(), StatusCode::CONFLICT);

        // 保留自己的用户名和邮箱不算冲突
        assert!(
            check_identity_available(
                &storage,
                Some("alice"),
                Some("alice@school.test"),
                Some(alice)
            )
            .await
            .is_ok()
        );
        assert!(
            check_identity_available(&storage, Some("carol"), Some("carol@school.test"), None)
                .await
                .is_ok()
        );
    }
}
