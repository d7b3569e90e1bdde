use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TaskService, load_task, task_not_found};
use crate::models::{ApiResponse, users::entities::UserRole};
use crate::services::permissions::{current_user, forbidden, internal_error};

pub async fn delete_task(
    service: &TaskService,
    task_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let task = match load_task(&storage, task_id).await {
        Ok(task) => task,
        Err(resp) => return Ok(resp),
    };
    if task.created_by != user.id && user.role != UserRole::Admin {
        return Ok(forbidden("Only the creator or an administrator can delete this task"));
    }

    match storage.delete_task(task_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("任务已删除"))),
        Ok(false) => Ok(task_not_found()),
        Err(e) => Ok(internal_error("Failed to delete task", e)),
    }
}
