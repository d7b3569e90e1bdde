use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TaskService, check_assignee, notify_assignee};
use crate::models::{
    ApiResponse, ErrorCode,
    tasks::{
        entities::TaskPriority,
        requests::{CreateTaskRequest, NewTask},
    },
};
use crate::services::permissions::{current_user, internal_error};

pub async fn create_task(
    service: &TaskService,
    body: CreateTaskRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let title = body.title.trim().to_string();
    if title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Title cannot be empty",
        )));
    }

    let assignee_id = body.assignee_id.unwrap_or(user.id);
    if let Err(resp) = check_assignee(&storage, &user, assignee_id).await {
        return Ok(resp);
    }

    let new_task = NewTask {
        title,
        description: body.description,
        assignee_id,
        created_by: user.id,
        due_date: body.due_date,
        priority: body.priority.unwrap_or(TaskPriority::Medium),
    };

    let task = match storage.create_task(new_task).await {
        Ok(task) => task,
        Err(e) => return Ok(internal_error("Failed to create task", e)),
    };
    info!("Task {} created by {} for {}", task.id, user.id, task.assignee_id);

    notify_assignee(&storage, &user, &task).await;

    Ok(HttpResponse::Created().json(ApiResponse::success(task, "任务创建成功")))
}
