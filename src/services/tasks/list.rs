use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaskService;
use crate::models::{
    ApiResponse,
    tasks::requests::{TaskListParams, TaskListQuery, TaskScope},
};
use crate::services::permissions::{current_user, internal_error};

pub async fn list_tasks(
    service: &TaskService,
    params: TaskListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let query = TaskListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        user_id: user.id,
        scope: params.scope.unwrap_or(TaskScope::All),
        status: params.status,
        priority: params.priority,
    };

    match storage.list_tasks_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取任务列表成功"))),
        Err(e) => Ok(internal_error("Failed to list tasks", e)),
    }
}
