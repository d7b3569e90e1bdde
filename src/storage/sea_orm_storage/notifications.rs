//! 通知存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginationInfo,
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

fn to_active_model(req: CreateNotificationRequest, now: i64) -> ActiveModel {
    ActiveModel {
        user_id: Set(req.user_id),
        notification_type: Set(req.notification_type.to_string()),
        title: Set(req.title),
        content: Set(req.content),
        reference_type: Set(req.reference_type),
        reference_id: Set(req.reference_id),
        is_read: Set(false),
        created_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(
        &self,
        req: CreateNotificationRequest,
    ) -> Result<Notification> {
        let now = chrono::Utc::now().timestamp();

        let result = to_active_model(req, now)
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 批量创建通知（单事务）
    pub async fn create_notifications_batch_impl(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<Vec<Notification>> {
        if reqs.is_empty() {
            return Ok(Vec::new());
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("开启事务失败: {e}")))?;

        let mut notifications = Vec::with_capacity(reqs.len());
        for req in reqs {
            let result = to_active_model(req, now)
                .insert(&txn)
                .await
                .map_err(|e| {
                    EduPortalError::database_operation(format!("批量创建通知失败: {e}"))
                })?;
            notifications.push(result.into_notification());
        }

        txn.commit()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(notifications)
    }

    /// 通过 ID 获取通知
    pub async fn get_notification_by_id_impl(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>> {
        let result = Notifications::find_by_id(notification_id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询通知失败: {e}")))?;

        Ok(result.map(|m| m.into_notification()))
    }

    /// 列出用户通知（分页）
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));

        // 未读筛选
        if query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        // 最新的在前
        select = select.order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询通知总数失败: {e}")))?;

        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(NotificationListResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 获取用户未读通知数量
    pub async fn get_unread_notification_count_impl(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| {
                EduPortalError::database_operation(format!("查询未读通知数量失败: {e}"))
            })?;

        Ok(count as i64)
    }

    /// 标记通知为已读
    pub async fn mark_notification_as_read_impl(&self, notification_id: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 标记用户所有通知为已读
    pub async fn mark_all_notifications_as_read_impl(&self, user_id: i64) -> Result<i64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EduPortalError::database_operation(format!("标记全部通知已读失败: {e}"))
            })?;

        Ok(result.rows_affected as i64)
    }

    /// 删除通知
    pub async fn delete_notification_impl(&self, notification_id: i64) -> Result<bool> {
        let result = Notifications::delete_by_id(notification_id)
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::entities::NotificationType;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::create_user;

    async fn storage_with_user() -> (SeaOrmStorage, i64) {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user_id = create_user(&storage, "notified", UserRole::Student).await;
        (storage, user_id)
    }

    fn notice(user_id: i64, title: &str) -> CreateNotificationRequest {
        CreateNotificationRequest {
            user_id,
            notification_type: NotificationType::System,
            title: title.to_string(),
            content: None,
            reference_type: None,
            reference_id: None,
        }
    }

    #[actix_web::test]
    async fn test_batch_create_and_unread_flow() {
        let (storage, user_id) = storage_with_user().await;
        let created = storage
            .create_notifications_batch_impl(vec![
                notice(user_id, "first"),
                notice(user_id, "second"),
                notice(user_id, "third"),
            ])
            .await
            .unwrap();
        assert_eq!(created.len(), 3);
        assert_eq!(
            storage
                .get_unread_notification_count_impl(user_id)
                .await
                .unwrap(),
            3
        );

        assert!(
            storage
                .mark_notification_as_read_impl(created[0].id)
                .await
                .unwrap()
        );
        let unread = storage
            .list_notifications_with_pagination_impl(
                user_id,
                NotificationListQuery {
                    unread_only: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(unread.pagination.total, 2);
        // 最新的排在最前
        assert_eq!(unread.items[0].title, "third");

        assert_eq!(
            storage
                .mark_all_notifications_as_read_impl(user_id)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            storage
                .get_unread_notification_count_impl(user_id)
                .await
                .unwrap(),
            0
        );
    }

    #[actix_web::test]
    async fn test_delete_notification() {
        let (storage, user_id) = storage_with_user().await;
        let created = storage
            .create_notification_impl(notice(user_id, "bye"))
            .await
            .unwrap();
        assert_eq!(created.notification_type, NotificationType::System);
        assert!(storage.delete_notification_impl(created.id).await.unwrap());
        assert!(
            storage
                .get_notification_by_id_impl(created.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
