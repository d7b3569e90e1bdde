//! 作业存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

/// 未指定满分时的默认值
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            created_by: Set(created_by),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            max_score: Set(req.max_score.unwrap_or(DEFAULT_MAX_SCORE)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 分页列出作业
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Assignments::find();

        if let Some(subject_ids) = query.subject_ids {
            select = select.filter(Column::SubjectId.is_in(subject_ids));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = like_contains(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(pattern.clone()))
                    .add(Column::Description.like(pattern)),
            );
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询作业总数失败: {e}")))?;

        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(AssignmentListResponse {
            items: assignments
                .into_iter()
                .map(|m| m.into_assignment())
                .collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

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
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新作业失败: {e}")))?;

        self.get_assignment_by_id_impl(id).await
    }

    /// 删除作业（提交级联删除）
    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{create_subject, create_user};

    fn request(subject_id: i64, title: &str) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            subject_id,
            title: title.to_string(),
            description: None,
            due_date: None,
            max_score: None,
        }
    }

    #[actix_web::test]
    async fn test_default_max_score_and_visibility_filter() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let math = create_subject(&storage, "MATH", Some(teacher)).await;
        let art = create_subject(&storage, "ART", None).await;

        let created = storage
            .create_assignment_impl(teacher, request(math, "Algebra homework"))
            .await
            .unwrap();
        assert_eq!(created.max_score, DEFAULT_MAX_SCORE);
        storage
            .create_assignment_impl(teacher, request(art, "Sketch"))
            .await
            .unwrap();

        let visible = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                subject_ids: Some(vec![math]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(visible.pagination.total, 1);
        assert_eq!(visible.items[0].id, created.id);

        let searched = storage
            .list_assignments_with_pagination_impl(AssignmentListQuery {
                search: Some("sketch".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.items.len(), 1);
    }
}
