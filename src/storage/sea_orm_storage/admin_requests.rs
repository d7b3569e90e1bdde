//! 事务申请存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::requests::{ActiveModel, Column, Entity as Requests};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    admin_requests::{
        entities::{AdminRequest, RequestStatus},
        requests::{AdminRequestListQuery, CreateAdminRequest},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建申请
    pub async fn create_admin_request_impl(
        &self,
        requester_id: i64,
        req: CreateAdminRequest,
    ) -> Result<AdminRequest> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            requester_id: Set(requester_id),
            request_type: Set(req.request_type.to_string()),
            title: Set(req.title),
            description: Set(req.description),
            status: Set(RequestStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建申请失败: {e}")))?;

        Ok(result.into_admin_request())
    }

    /// 通过 ID 获取申请
    pub async fn get_admin_request_by_id_impl(&self, id: i64) -> Result<Option<AdminRequest>> {
        let result = Requests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询申请失败: {e}")))?;

        Ok(result.map(|m| m.into_admin_request()))
    }

    /// 分页列出申请
    pub async fn list_admin_requests_with_pagination_impl(
        &self,
        query: AdminRequestListQuery,
    ) -> Result<PaginatedResponse<AdminRequest>> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Requests::find();

        if let Some(requester_id) = query.requester_id {
            select = select.filter(Column::RequesterId.eq(requester_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(request_type) = query.request_type {
            select = select.filter(Column::RequestType.eq(request_type.to_string()));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询申请总数失败: {e}")))?;

        let requests = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询申请列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: requests
                .into_iter()
                .map(|m| m.into_admin_request())
                .collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 审批申请，只对 pending 状态生效
    pub async fn review_admin_request_impl(
        &self,
        id: i64,
        reviewer_id: i64,
        status: RequestStatus,
        comment: Option<String>,
    ) -> Result<Option<AdminRequest>> {
        let now = chrono::Utc::now().timestamp();

        let result = Requests::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::ReviewerId, Expr::value(reviewer_id))
            .col_expr(Column::ReviewComment, Expr::value(comment))
            .col_expr(Column::ReviewedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RequestStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("审批申请失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_admin_request_by_id_impl(id).await
    }

    /// 撤回（删除）待审批的申请
    pub async fn delete_pending_admin_request_impl(&self, id: i64) -> Result<bool> {
        let result = Requests::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RequestStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("撤回申请失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::admin_requests::entities::RequestType;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::create_user;

    #[actix_web::test]
    async fn test_review_only_once() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = create_user(&storage, "student", UserRole::Student).await;
        let admin = create_user(&storage, "admin", UserRole::Admin).await;

        let request = storage
            .create_admin_request_impl(
                student,
                CreateAdminRequest {
                    request_type: RequestType::Leave,
                    title: "Sick leave".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);

        let reviewed = storage
            .review_admin_request_impl(
                request.id,
                admin,
                RequestStatus::Approved,
                Some("get well".to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reviewed.status, RequestStatus::Approved);
        assert_eq!(reviewed.reviewer_id, Some(admin));
        assert!(reviewed.reviewed_at.is_some());

        assert!(
            storage
                .review_admin_request_impl(request.id, admin, RequestStatus::Rejected, None)
                .await
                .unwrap()
                .is_none()
        );
        // 已审批的申请不能撤回
        assert!(
            !storage
                .delete_pending_admin_request_impl(request.id)
                .await
                .unwrap()
        );
    }

    #[actix_web::test]
    async fn test_list_by_requester() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let a = create_user(&storage, "requester_a", UserRole::Student).await;
        let b = create_user(&storage, "requester_b", UserRole::Teacher).await;
        for (user, kind) in [
            (a, RequestType::Certificate),
            (a, RequestType::GradeAppeal),
            (b, RequestType::ScheduleChange),
        ] {
            storage
                .create_admin_request_impl(
                    user,
                    CreateAdminRequest {
                        request_type: kind,
                        title: kind.to_string(),
                        description: None,
                    },
                )
                .await
                .unwrap();
        }

        let own = storage
            .list_admin_requests_with_pagination_impl(AdminRequestListQuery {
                requester_id: Some(a),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(own.pagination.total, 2);

        let appeals = storage
            .list_admin_requests_with_pagination_impl(AdminRequestListQuery {
                request_type: Some(RequestType::GradeAppeal),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(appeals.items.len(), 1);
        assert!(
            storage
                .delete_pending_admin_request_impl(appeals.items[0].id)
                .await
                .unwrap()
        );
    }
}
