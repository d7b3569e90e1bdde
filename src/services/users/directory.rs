use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse,
    users::{
        entities::UserStatus,
        requests::{UserDirectoryParams, UserListQuery},
        responses::UserDirectoryResponse,
    },
};
use crate::services::permissions::internal_error;

/// 活跃用户的简要信息，选择私信对象和任务负责人时使用
pub async fn list_directory(
    service: &UserService,
    query: UserDirectoryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = UserListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        role: query.role,
        status: Some(UserStatus::Active),
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    match storage.list_users_with_pagination(list_query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserDirectoryResponse {
                items: list.items.iter().map(|u| u.brief()).collect(),
                pagination: list.pagination,
            },
            "获取通讯录成功",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve directory", e)),
    }
}
