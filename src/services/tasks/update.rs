use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TaskService, check_assignee, load_task, notify_assignee, task_not_found};
use crate::models::{ApiResponse, ErrorCode, tasks::requests::UpdateTaskRequest};
use crate::services::permissions::{current_user, forbidden, internal_error};

/// 创建者可修改全部字段，被指派人只能改状态
pub async fn update_task(
    service: &TaskService,
    task_id: i64,
    mut body: UpdateTaskRequest,
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

    let is_creator = task.created_by == user.id;
    let is_assignee = task.assignee_id == user.id;
    if !is_creator {
        if !is_assignee {
            return Ok(forbidden("You do not have permission to update this task"));
        }
        if !body.is_status_only() {
            return Ok(forbidden("The assignee can only change the task status"));
        }
    }

    if let Some(title) = body.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Title cannot be empty",
            )));
        }
    }

    let reassigned = body.assignee_id.filter(|id| *id != task.assignee_id);
    if let Some(assignee_id) = reassigned
        && let Err(resp) = check_assignee(&storage, &user, assignee_id).await
    {
        return Ok(resp);
    }

    let updated = match storage.update_task(task_id, body).await {
        Ok(Some(updated)) => updated,
        Ok(None) => return Ok(task_not_found()),
        Err(e) => return Ok(internal_error("Failed to update task", e)),
    };

    if reassigned.is_some() {
        notify_assignee(&storage, &user, &updated).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "任务更新成功")))
}
