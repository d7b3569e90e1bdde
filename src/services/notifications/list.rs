use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::{
    ApiResponse,
    notifications::requests::{NotificationListParams, NotificationListQuery},
};
use crate::services::permissions::{current_user, internal_error};

pub async fn list_notifications(
    service: &NotificationService,
    params: NotificationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let query = NotificationListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        unread_only: params.unread_only,
    };

    match storage.list_notifications_with_pagination(user.id, query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取通知列表成功"))),
        Err(e) => Ok(internal_error("Failed to list notifications", e)),
    }
}
