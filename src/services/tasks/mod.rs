pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    notifications::entities::NotificationType,
    tasks::{
        entities::Task,
        requests::{CreateTaskRequest, TaskListParams, UpdateTaskRequest},
    },
    users::entities::{User, UserRole},
};
use crate::services::notifications::{NotificationDraft, notify};
use crate::services::permissions::{forbidden, internal_error};
use crate::storage::Storage;

pub struct TaskService {
    storage: Option<Arc<dyn Storage>>,
}

impl TaskService {
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

    pub async fn list_tasks(
        &self,
        params: TaskListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_tasks(self, params, request).await
    }

    pub async fn create_task(
        &self,
        body: CreateTaskRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_task(self, body, request).await
    }

    pub async fn get_task(&self, task_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_task(self, task_id, request).await
    }

    pub async fn update_task(
        &self,
        task_id: i64,
        body: UpdateTaskRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_task(self, task_id, body, request).await
    }

    pub async fn delete_task(&self, task_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_task(self, task_id, request).await
    }
}

pub(crate) fn task_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::TaskNotFound, "Task not found"))
}

pub(crate) async fn load_task(storage: &Arc<dyn Storage>, task_id: i64) -> Result<Task, HttpResponse> {
    match storage.get_task_by_id(task_id).await {
        Ok(Some(task)) => Ok(task),
        Ok(None) => Err(task_not_found()),
        Err(e) => Err(internal_error("Failed to load task", e)),
    }
}

/// 指派给他人需要教职工角色，且对方必须是有效用户
pub(crate) async fn check_assignee(
    storage: &Arc<dyn Storage>,
    user: &User,
    assignee_id: i64,
) -> Result<(), HttpResponse> {
    if assignee_id == user.id {
        return Ok(());
    }
    if !user.role.is_staff() {
        return Err(forbidden("Only staff can assign tasks to other users"));
    }
    match storage.get_user_by_id(assignee_id).await {
        Ok(Some(assignee)) if assignee.is_active() => Ok(()),
        Ok(_) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Assignee does not exist or is not active",
        ))),
        Err(e) => Err(internal_error("Failed to load assignee", e)),
    }
}

pub(crate) async fn notify_assignee(storage: &Arc<dyn Storage>, assigner: &User, task: &Task) {
    if task.assignee_id == assigner.id {
        return;
    }
    notify(
        storage,
        &[task.assignee_id],
        NotificationDraft {
            notification_type: NotificationType::TaskAssigned,
            title: format!("新任务：{}", task.title),
            content: Some(format!("{} 给你指派了任务", assigner.profile.display_name)),
            reference_type: "task",
            reference_id: task.id,
        },
    )
    .await;
}

pub(crate) fn can_view_task(user: &User, task: &Task) -> bool {
    task.assignee_id == user.id || task.created_by == user.id || user.role == UserRole::Admin
}
