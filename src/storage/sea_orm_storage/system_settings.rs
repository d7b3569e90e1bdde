//! 系统设置存储实现

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entity::prelude::{SystemSettings, SystemSettingsAudit};
use crate::entity::{system_settings, system_settings_audit};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    common::PaginationInfo,
    system::{
        entities::SystemSetting, requests::SettingAuditQuery, responses::SettingAuditListResponse,
    },
};

use super::{SeaOrmStorage, page_params};

impl SeaOrmStorage {
    /// 获取所有设置
    pub(crate) async fn list_all_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = SystemSettings::find()
            .order_by_asc(system_settings::Column::Key)
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("获取设置列表失败: {e}")))?;

        Ok(settings.into_iter().map(|s| s.into_setting()).collect())
    }

    /// 通过 key 获取设置
    pub(crate) async fn get_setting_by_key_impl(&self, key: &str) -> Result<Option<SystemSetting>> {
        let setting = SystemSettings::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("获取设置失败: {e}")))?;

        Ok(setting.map(|s| s.into_setting()))
    }

    /// 更新设置并写审计日志，配置项不存在时返回 None
    pub(crate) async fn update_setting_impl(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = SystemSettings::find_by_id(key.to_string())
            .one(&txn)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("获取设置失败: {e}")))?
        else {
            txn.rollback()
                .await
                .map_err(|e| EduPortalError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        };

        let old_value = existing.value.clone();

        let mut active_model: system_settings::ActiveModel = existing.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.updated_by = Set(Some(user_id));

        let updated = active_model
            .update(&txn)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新设置失败: {e}")))?;

        let audit = system_settings_audit::ActiveModel {
            setting_key: Set(key.to_string()),
            old_value: Set(Some(old_value)),
            new_value: Set(value.to_string()),
            changed_by: Set(user_id),
            changed_at: Set(now),
            ip_address: Set(ip_address),
            ..Default::default()
        };

        audit
            .insert(&txn)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建审计日志失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_setting()))
    }

    /// 获取审计日志
    pub(crate) async fn list_setting_audits_impl(
        &self,
        query: SettingAuditQuery,
    ) -> Result<SettingAuditListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = SystemSettingsAudit::find();

        if let Some(key) = &query.key {
            select = select.filter(system_settings_audit::Column::SettingKey.eq(key));
        }

        let paginator = select
            .order_by_desc(system_settings_audit::Column::ChangedAt)
            .order_by_desc(system_settings_audit::Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("统计审计日志失败: {e}")))?;

        let audits = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("获取审计日志失败: {e}")))?;

        Ok(SettingAuditListResponse {
            audits: audits.into_iter().map(|a| a.into_audit()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::create_user;

    #[actix_web::test]
    async fn test_update_writes_audit() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = create_user(&storage, "admin", UserRole::Admin).await;

        let settings = storage.list_all_settings_impl().await.unwrap();
        assert!(settings.iter().any(|s| s.key == "app.system_name"));

        let updated = storage
            .update_setting_impl(
                "app.system_name",
                "Riverside High",
                admin,
                Some("127.0.0.1".to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value, "Riverside High");
        assert_eq!(updated.updated_by, Some(admin));

        let audits = storage
            .list_setting_audits_impl(SettingAuditQuery {
                key: Some("app.system_name".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(audits.pagination.total, 1);
        assert_eq!(audits.audits[0].old_value.as_deref(), Some("EduPortal"));
        assert_eq!(audits.audits[0].new_value, "Riverside High");
    }

    #[actix_web::test]
    async fn test_unknown_key() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let admin = create_user(&storage, "admin", UserRole::Admin).await;

        assert!(
            storage
                .update_setting_impl("no.such.key", "1", admin, None)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .get_setting_by_key_impl("no.such.key")
                .await
                .unwrap()
                .is_none()
        );
        let audits = storage
            .list_setting_audits_impl(SettingAuditQuery::default())
            .await
            .unwrap();
        assert_eq!(audits.pagination.total, 0);
    }
}
