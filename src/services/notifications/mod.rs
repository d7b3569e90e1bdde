pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::warn;

use crate::models::notifications::{
    entities::NotificationType,
    requests::{CreateNotificationRequest, NotificationListParams},
};
use crate::services::websocket::ConnectionManager;
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
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

    pub async fn list(
        &self,
        params: NotificationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, params, request).await
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::get_unread_count(self, request).await
    }

    pub async fn mark_read(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        read::mark_as_read(self, notification_id, request).await
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::mark_all_as_read(self, request).await
    }

    pub async fn delete(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        read::delete_notification(self, notification_id, request).await
    }
}

/// 一条待发送的通知，收件人在 [`notify`] 时展开
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: &'static str,
    pub reference_id: i64,
}

/// 批量写入通知并推送给在线用户
///
/// 通知是附带动作，失败只记日志，不影响主流程。
pub async fn notify(storage: &Arc<dyn Storage>, user_ids: &[i64], draft: NotificationDraft) {
    if user_ids.is_empty() {
        return;
    }

    let requests = user_ids
        .iter()
        .map(|&user_id| CreateNotificationRequest {
            user_id,
            notification_type: draft.notification_type,
            title: draft.title.clone(),
            content: draft.content.clone(),
            reference_type: Some(draft.reference_type.to_string()),
            reference_id: Some(draft.reference_id),
        })
        .collect();

    match storage.create_notifications_batch(requests).await {
        Ok(created) => {
            let manager = ConnectionManager::get();
            for notification in created {
                manager.push_notification(notification);
            }
        }
        Err(e) => warn!(
            "Failed to create {} notifications: {}",
            draft.notification_type, e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::requests::NotificationListQuery;
    use crate::models::users::entities::UserRole;
    use crate::storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::create_user;

    #[actix_web::test]
    async fn test_notify_creates_one_per_recipient() {
        let concrete = SeaOrmStorage::in_memory().await.unwrap();
        let a = create_user(&concrete, "alice01", UserRole::Student).await;
        let b = create_user(&concrete, "bobby01", UserRole::Student).await;
        let storage: Arc<dyn Storage> = Arc::new(concrete);

        notify(
            &storage,
            &[a, b],
            NotificationDraft {
                notification_type: NotificationType::AssignmentCreated,
                title: "New assignment".to_string(),
                content: None,
                reference_type: "assignment",
                reference_id: 5,
            },
        )
        .await;

        for user_id in [a, b] {
            let list = storage
                .list_notifications_with_pagination(user_id, NotificationListQuery::default())
                .await
                .unwrap();
            assert_eq!(list.items.len(), 1);
            assert_eq!(list.items[0].reference_id, Some(5));
            assert_eq!(list.items[0].reference_type.as_deref(), Some("assignment"));
            assert!(!list.items[0].is_read);
        }
    }
}
