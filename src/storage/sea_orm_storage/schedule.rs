//! 课表存储操作

use super::SeaOrmStorage;
use crate::entity::schedule_items::{ActiveModel, Column, Entity as ScheduleItems};
use crate::errors::{EduPortalError, Result};
use crate::models::schedule::{
    entities::ScheduleItem,
    requests::{CreateScheduleItemRequest, ScheduleQuery, UpdateScheduleItemRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建课表条目
    pub async fn create_schedule_item_impl(
        &self,
        req: CreateScheduleItemRequest,
    ) -> Result<ScheduleItem> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            title: Set(req.title),
            day_of_week: Set(req.day_of_week),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            room: Set(req.room),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建课表条目失败: {e}")))?;

        Ok(result.into_schedule_item())
    }

    /// 通过 ID 获取课表条目
    pub async fn get_schedule_item_by_id_impl(&self, id: i64) -> Result<Option<ScheduleItem>> {
        let result = ScheduleItems::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询课表条目失败: {e}")))?;

        Ok(result.map(|m| m.into_schedule_item()))
    }

    /// 列出课表，HH:MM 字符串按字典序即时间顺序
    pub async fn list_schedule_items_impl(&self, query: ScheduleQuery) -> Result<Vec<ScheduleItem>> {
        let mut select = ScheduleItems::find();

        if let Some(subject_ids) = query.subject_ids {
            if subject_ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::SubjectId.is_in(subject_ids));
        }

        if let Some(day) = query.day_of_week {
            select = select.filter(Column::DayOfWeek.eq(day));
        }

        if let Some(room) = query.room {
            select = select.filter(Column::Room.eq(room));
        }

        let result = select
            .order_by_asc(Column::DayOfWeek)
            .order_by_asc(Column::StartTime)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_schedule_item()).collect())
    }

    /// 更新课表条目
    pub async fn update_schedule_item_impl(
        &self,
        id: i64,
        update: UpdateScheduleItemRequest,
    ) -> Result<Option<ScheduleItem>> {
        if self.get_schedule_item_by_id_impl(id).await?.is_none() {
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
        if let Some(day) = update.day_of_week {
            model.day_of_week = Set(day);
        }
        if let Some(start_time) = update.start_time {
            model.start_time = Set(start_time);
        }
        if let Some(end_time) = update.end_time {
            model.end_time = Set(end_time);
        }
        if let Some(room) = update.room {
            // 空字符串表示清除教室
            model.room = Set(Some(room).filter(|r| !r.trim().is_empty()));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新课表条目失败: {e}")))?;

        self.get_schedule_item_by_id_impl(id).await
    }

    /// 删除课表条目
    pub async fn delete_schedule_item_impl(&self, id: i64) -> Result<bool> {
        let result = ScheduleItems::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("删除课表条目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::create_subject;

    fn item(subject_id: i64, day: i32, start: &str, end: &str) -> CreateScheduleItemRequest {
        CreateScheduleItemRequest {
            subject_id,
            title: format!("{start}-{end}"),
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            room: Some("A101".to_string()),
        }
    }

    #[actix_web::test]
    async fn test_list_sorted_by_day_and_time() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let subject_id = create_subject(&storage, "CHEM", None).await;

        for (day, start, end) in [(3, "10:00", "11:00"), (1, "13:00", "14:00"), (1, "08:00", "09:30")]
        {
            storage
                .create_schedule_item_impl(item(subject_id, day, start, end))
                .await
                .unwrap();
        }

        let items = storage
            .list_schedule_items_impl(ScheduleQuery::default())
            .await
            .unwrap();
        let order: Vec<(i32, &str)> = items
            .iter()
            .map(|i| (i.day_of_week, i.start_time.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "08:00"), (1, "13:00"), (3, "10:00")]);

        let monday = storage
            .list_schedule_items_impl(ScheduleQuery {
                day_of_week: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(monday.len(), 2);

        let none = storage
            .list_schedule_items_impl(ScheduleQuery {
                subject_ids: Some(Vec::new()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[actix_web::test]
    async fn test_update_clears_room() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let subject_id = create_subject(&storage, "PHYS", None).await;
        let created = storage
            .create_schedule_item_impl(item(subject_id, 2, "09:00", "10:00"))
            .await
            .unwrap();

        let updated = storage
            .update_schedule_item_impl(
                created.id,
                UpdateScheduleItemRequest {
                    room: Some(String::new()),
                    end_time: Some("10:30".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.room, None);
        assert_eq!(updated.end_time, "10:30");
    }
}
