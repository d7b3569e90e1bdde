//! 私信存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::messages::{ActiveModel, Column, Entity as Messages};
use crate::errors::{EduPortalError, Result};
use crate::models::messages::{
    entities::{Message, MessageStatus},
    responses::ConversationStat,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 写入一条消息，初始状态为 sent
    pub async fn create_message_impl(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: String,
    ) -> Result<Message> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            content: Set(content),
            status: Set(MessageStatus::Sent.to_string()),
            created_at: Set(now),
            delivered_at: Set(None),
            read_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("保存消息失败: {e}")))?;

        Ok(result.into_message())
    }

    /// 批量获取消息
    pub async fn get_messages_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Message>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Messages::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询消息失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_message()).collect())
    }

    /// 待投递消息，按写入顺序
    pub async fn list_undelivered_messages_impl(&self, recipient_id: i64) -> Result<Vec<Message>> {
        let result = Messages::find()
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::Status.eq(MessageStatus::Sent.to_string()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询待投递消息失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_message()).collect())
    }

    /// 标记为已投递，只推进 sent 状态的消息
    pub async fn mark_messages_delivered_impl(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let result = Messages::update_many()
            .col_expr(
                Column::Status,
                Expr::value(MessageStatus::Delivered.to_string()),
            )
            .col_expr(Column::DeliveredAt, Expr::value(now))
            .filter(Column::Id.is_in(ids.iter().copied()))
            .filter(Column::Status.eq(MessageStatus::Sent.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新投递状态失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 两人之间的消息，按 id 倒序取 limit 条
    pub async fn list_conversation_messages_impl(
        &self,
        user_id: i64,
        partner_id: i64,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<Message>> {
        let mut select = Messages::find().filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(Column::SenderId.eq(user_id))
                        .add(Column::RecipientId.eq(partner_id)),
                )
                .add(
                    Condition::all()
                        .add(Column::SenderId.eq(partner_id))
                        .add(Column::RecipientId.eq(user_id)),
                ),
        );

        if let Some(before_id) = before_id {
            select = select.filter(Column::Id.lt(before_id));
        }

        let result = select
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询会话消息失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_message()).collect())
    }

    /// 会话统计：对方、最后一条消息 ID、未读数，按最后消息倒序
    pub async fn list_conversation_stats_impl(&self, user_id: i64) -> Result<Vec<ConversationStat>> {
        let sent: Vec<(i64, i64)> = Messages::find()
            .select_only()
            .column(Column::RecipientId)
            .column_as(Column::Id.max(), "last_id")
            .filter(Column::SenderId.eq(user_id))
            .group_by(Column::RecipientId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("统计会话失败: {e}")))?;

        let received: Vec<(i64, i64)> = Messages::find()
            .select_only()
            .column(Column::SenderId)
            .column_as(Column::Id.max(), "last_id")
            .filter(Column::RecipientId.eq(user_id))
            .group_by(Column::SenderId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("统计会话失败: {e}")))?;

        let unread: Vec<(i64, i64)> = Messages::find()
            .select_only()
            .column(Column::SenderId)
            .column_as(Column::Id.count(), "unread")
            .filter(Column::RecipientId.eq(user_id))
            .filter(Column::Status.ne(MessageStatus::Read.to_string()))
            .group_by(Column::SenderId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("统计未读消息失败: {e}")))?;

        let mut last_ids: HashMap<i64, i64> = HashMap::new();
        for (partner_id, last_id) in sent.into_iter().chain(received) {
            let entry = last_ids.entry(partner_id).or_insert(last_id);
            *entry = (*entry).max(last_id);
        }
        let unread: HashMap<i64, i64> = unread.into_iter().collect();

        let mut stats: Vec<ConversationStat> = last_ids
            .into_iter()
            .map(|(partner_id, last_message_id)| ConversationStat {
                partner_id,
                last_message_id,
                unread_count: unread.get(&partner_id).copied().unwrap_or(0),
            })
            .collect();
        stats.sort_by(|a, b| b.last_message_id.cmp(&a.last_message_id));

        Ok(stats)
    }

    /// 将对方发来的消息全部标记为已读
    pub async fn mark_conversation_read_impl(&self, reader_id: i64, partner_id: i64) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();

        // 未经投递直接读取的消息补记投递时间
        Messages::update_many()
            .col_expr(Column::DeliveredAt, Expr::value(now))
            .filter(Column::SenderId.eq(partner_id))
            .filter(Column::RecipientId.eq(reader_id))
            .filter(Column::DeliveredAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新投递时间失败: {e}")))?;

        let result = Messages::update_many()
            .col_expr(Column::Status, Expr::value(MessageStatus::Read.to_string()))
            .col_expr(Column::ReadAt, Expr::value(now))
            .filter(Column::SenderId.eq(partner_id))
            .filter(Column::RecipientId.eq(reader_id))
            .filter(Column::Status.ne(MessageStatus::Read.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("标记消息已读失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 用户未读消息总数
    pub async fn count_unread_messages_impl(&self, user_id: i64) -> Result<i64> {
        let count = Messages::find()
            .filter(Column::RecipientId.eq(user_id))
            .filter(Column::Status.ne(MessageStatus::Read.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("统计未读消息失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::create_user;

    #[actix_web::test]
    async fn test_delivery_status_progression() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let alice = create_user(&storage, "alice", UserRole::Teacher).await;
        let bob = create_user(&storage, "bob", UserRole::Student).await;

        let first = storage
            .create_message_impl(alice, bob, "hello".to_string())
            .await
            .unwrap();
        let second = storage
            .create_message_impl(alice, bob, "are you there?".to_string())
            .await
            .unwrap();
        assert_eq!(first.status, MessageStatus::Sent);

        let pending = storage.list_undelivered_messages_impl(bob).await.unwrap();
        assert_eq!(
            pending.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );

        assert_eq!(
            storage
                .mark_messages_delivered_impl(&[first.id])
                .await
                .unwrap(),
            1
        );
        assert_eq!(storage.count_unread_messages_impl(bob).await.unwrap(), 2);

        assert_eq!(storage.mark_conversation_read_impl(bob, alice).await.unwrap(), 2);
        let messages = storage
            .get_messages_by_ids_impl(&[first.id, second.id])
            .await
            .unwrap();
        assert!(messages.iter().all(|m| m.status == MessageStatus::Read));
        assert!(messages.iter().all(|m| m.delivered_at.is_some()));
        // 已读的消息不会回退为已投递
        assert_eq!(
            storage
                .mark_messages_delivered_impl(&[first.id, second.id])
                .await
                .unwrap(),
            0
        );
    }

    #[actix_web::test]
    async fn test_conversation_paging_and_stats() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let alice = create_user(&storage, "alice", UserRole::Teacher).await;
        let bob = create_user(&storage, "bob", UserRole::Student).await;
        let carol = create_user(&storage, "carol", UserRole::Student).await;

        let mut ids = Vec::new();
        for i in 0..5 {
            let (from, to) = if i % 2 == 0 { (alice, bob) } else { (bob, alice) };
            ids.push(
                storage
                    .create_message_impl(from, to, format!("msg {i}"))
                    .await
                    .unwrap()
                    .id,
            );
        }
        let to_carol = storage
            .create_message_impl(carol, alice, "hi".to_string())
            .await
            .unwrap();

        let newest = storage
            .list_conversation_messages_impl(alice, bob, None, 2)
            .await
            .unwrap();
        assert_eq!(newest.iter().map(|m| m.id).collect::<Vec<_>>(), vec![ids[4], ids[3]]);

        let older = storage
            .list_conversation_messages_impl(alice, bob, Some(ids[3]), 10)
            .await
            .unwrap();
        assert_eq!(older.len(), 3);

        let stats = storage.list_conversation_stats_impl(alice).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].partner_id, carol);
        assert_eq!(stats[0].last_message_id, to_carol.id);
        assert_eq!(stats[0].unread_count, 1);
        assert_eq!(stats[1].partner_id, bob);
        assert_eq!(stats[1].last_message_id, ids[4]);
        // bob 发给 alice 的是第 1、3 条
        assert_eq!(stats[1].unread_count, 2);
    }
}
