use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TaskService, can_view_task, load_task};
use crate::models::ApiResponse;
use crate::services::permissions::{current_user, forbidden};

pub async fn get_task(
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
    if !can_view_task(&user, &task) {
        return Ok(forbidden("You do not have permission to view this task"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(task, "获取任务成功")))
}
