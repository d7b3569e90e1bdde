use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::NotificationService;
use crate::models::{
    ApiResponse, ErrorCode,
    notifications::{
        entities::Notification,
        responses::{MarkAllReadResponse, UnreadCountResponse},
    },
};
use crate::services::permissions::{current_user, internal_error};
use crate::storage::Storage;

/// 只能操作自己的通知，别人的通知按不存在处理
async fn load_own_notification(
    storage: &Arc<dyn Storage>,
    notification_id: i64,
    user_id: i64,
) -> Result<Notification, HttpResponse> {
    match storage.get_notification_by_id(notification_id).await {
        Ok(Some(n)) if n.user_id == user_id => Ok(n),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        ))),
        Err(e) => Err(internal_error("Failed to load notification", e)),
    }
}

pub async fn get_unread_count(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_unread_notification_count(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse {
                unread_count: count,
            },
            "查询成功",
        ))),
        Err(e) => Ok(internal_error("Failed to count unread notifications", e)),
    }
}

pub async fn mark_as_read(
    service: &NotificationService,
    notification_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = load_own_notification(&storage, notification_id, user.id).await {
        return Ok(resp);
    }

    match storage.mark_notification_as_read(notification_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("已标记为已读"))),
        Err(e) => Ok(internal_error("Failed to mark notification as read", e)),
    }
}

pub async fn mark_all_as_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.mark_all_notifications_as_read(user.id).await {
        Ok(marked_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse { marked_count },
            "已全部标记为已读",
        ))),
        Err(e) => Ok(internal_error("Failed to mark notifications as read", e)),
    }
}

pub async fn delete_notification(
    service: &NotificationService,
    notification_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = load_own_notification(&storage, notification_id, user.id).await {
        return Ok(resp);
    }

    match storage.delete_notification(notification_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("通知已删除"))),
        Err(e) => Ok(internal_error("Failed to delete notification", e)),
    }
}
