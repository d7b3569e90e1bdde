//! 待办任务存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::tasks::{ActiveModel, Column, Entity as Tasks};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginationInfo,
    tasks::{
        entities::{Task, TaskStatus},
        requests::{NewTask, TaskListQuery, TaskScope, UpdateTaskRequest},
        responses::TaskListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建任务
    pub async fn create_task_impl(&self, task: NewTask) -> Result<Task> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(task.title),
            description: Set(task.description),
            assignee_id: Set(task.assignee_id),
            created_by: Set(task.created_by),
            due_date: Set(task.due_date.map(|d| d.timestamp())),
            priority: Set(task.priority.to_string()),
            status: Set(TaskStatus::Todo.to_string()),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建任务失败: {e}")))?;

        Ok(result.into_task())
    }

    /// 通过 ID 获取任务
    pub async fn get_task_by_id_impl(&self, id: i64) -> Result<Option<Task>> {
        let result = Tasks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询任务失败: {e}")))?;

        Ok(result.map(|m| m.into_task()))
    }

    /// 分页列出任务
    pub async fn list_tasks_with_pagination_impl(
        &self,
        query: TaskListQuery,
    ) -> Result<TaskListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let scope = match query.scope {
            TaskScope::Assigned => Condition::all().add(Column::AssigneeId.eq(query.user_id)),
            TaskScope::Created => Condition::all().add(Column::CreatedBy.eq(query.user_id)),
            TaskScope::All => Condition::any()
                .add(Column::AssigneeId.eq(query.user_id))
                .add(Column::CreatedBy.eq(query.user_id)),
        };
        let mut select = Tasks::find().filter(scope);

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(priority) = query.priority {
            select = select.filter(Column::Priority.eq(priority.to_string()));
        }

        // 有截止时间的排前面
        select = select
            .order_by_asc(Column::DueDate.is_null())
            .order_by_asc(Column::DueDate)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询任务总数失败: {e}")))?;

        let tasks = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询任务列表失败: {e}")))?;

        Ok(TaskListResponse {
            items: tasks.into_iter().map(|m| m.into_task()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新任务，完成时记录完成时间
    pub async fn update_task_impl(&self, id: i64, update: UpdateTaskRequest) -> Result<Option<Task>> {
        let Some(current) = self.get_task_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(assignee_id) = update.assignee_id {
            model.assignee_id = Set(assignee_id);
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }
        if let Some(priority) = update.priority {
            model.priority = Set(priority.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
            // 已完成的任务再次标记完成时保留原完成时间
            if status != TaskStatus::Done {
                model.completed_at = Set(None);
            } else if current.status != TaskStatus::Done {
                model.completed_at = Set(Some(now));
            }
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新任务失败: {e}")))?;

        self.get_task_by_id_impl(id).await
    }

    /// 删除任务
    pub async fn delete_task_impl(&self, id: i64) -> Result<bool> {
        let result = Tasks::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("删除任务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tasks::entities::TaskPriority;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::create_user;

    fn new_task(title: &str, assignee_id: i64, created_by: i64) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            assignee_id,
            created_by,
            due_date: None,
            priority: TaskPriority::Medium,
        }
    }

    fn list_query(user_id: i64, scope: TaskScope) -> TaskListQuery {
        TaskListQuery {
            page: None,
            size: None,
            user_id,
            scope,
            status: None,
            priority: None,
        }
    }

    #[actix_web::test]
    async fn test_scope_filters() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = create_user(&storage, "admin", UserRole::Admin).await;
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;

        storage
            .create_task_impl(new_task("own", teacher, teacher))
            .await
            .unwrap();
        storage
            .create_task_impl(new_task("delegated", teacher, admin))
            .await
            .unwrap();
        storage
            .create_task_impl(new_task("admin only", admin, admin))
            .await
            .unwrap();

        let assigned = storage
            .list_tasks_with_pagination_impl(list_query(teacher, TaskScope::Assigned))
            .await
            .unwrap();
        assert_eq!(assigned.pagination.total, 2);

        let created = storage
            .list_tasks_with_pagination_impl(list_query(admin, TaskScope::Created))
            .await
            .unwrap();
        assert_eq!(created.pagination.total, 2);

        let all = storage
            .list_tasks_with_pagination_impl(list_query(admin, TaskScope::All))
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);
    }

    #[actix_web::test]
    async fn test_completed_at_follows_status() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = create_user(&storage, "worker", UserRole::Teacher).await;
        let task = storage
            .create_task_impl(new_task("grade essays", user, user))
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Todo);

        let done = storage
            .update_task_impl(
                task.id,
                UpdateTaskRequest {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(done.completed_at.is_some());

        // 重复标记完成不改变完成时间
        ActiveModel {
            id: Set(task.id),
            completed_at: Set(Some(1_700_000_000)),
            ..Default::default()
        }
        .update(&storage.db)
        .await
        .unwrap();
        let done_again = storage
            .update_task_impl(
                task.id,
                UpdateTaskRequest {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            done_again.completed_at.map(|at| at.timestamp()),
            Some(1_700_000_000)
        );

        let reopened = storage
            .update_task_impl(
                task.id,
                UpdateTaskRequest {
                    status: Some(TaskStatus::InProgress),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reopened.completed_at.is_none());

        assert!(storage.delete_task_impl(task.id).await.unwrap());
        assert!(
            storage
                .update_task_impl(task.id, UpdateTaskRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
