//! 运行期可修改的配置
//!
//! 启动时从 `system_settings` 表加载，管理员修改后原地更新。
//! 未加载或值无法解析时回退到 `AppConfig`。

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;

/// 私信长度上限的默认值
pub const DEFAULT_MESSAGE_MAX_LENGTH: usize = 5000;

static DYNAMIC_CONFIG: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn store() -> &'static RwLock<HashMap<String, String>> {
    DYNAMIC_CONFIG.get_or_init(|| RwLock::new(HashMap::new()))
}

pub struct DynamicConfig;

impl DynamicConfig {
    /// 用数据库中的全部设置替换缓存
    pub async fn init(settings: Vec<(String, String)>) {
        let mut guard = store().write().await;
        guard.clear();
        guard.extend(settings);
        tracing::info!("Dynamic settings loaded: {} entries", guard.len());
    }

    pub async fn update(key: &str, value: &str) {
        store()
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        tracing::debug!("Dynamic setting updated: {} = {}", key, value);
    }

    async fn raw(key: KnownSettingKey) -> Option<String> {
        store().read().await.get(key.as_str()).cloned()
    }

    async fn integer(key: KnownSettingKey) -> Option<i64> {
        Self::raw(key).await.and_then(|v| v.parse().ok())
    }

    async fn string_list(key: KnownSettingKey) -> Option<Vec<String>> {
        Self::raw(key)
            .await
            .and_then(|v| serde_json::from_str(&v).ok())
    }

    pub async fn system_name() -> String {
        Self::raw(KnownSettingKey::SystemName)
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    /// 分钟
    pub async fn access_token_expiry() -> i64 {
        Self::integer(KnownSettingKey::AccessTokenExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.access_token_expiry)
    }

    /// 天
    pub async fn refresh_token_expiry() -> i64 {
        Self::integer(KnownSettingKey::RefreshTokenExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.refresh_token_expiry)
    }

    /// 天
    pub async fn refresh_token_remember_me_expiry() -> i64 {
        Self::integer(KnownSettingKey::RefreshTokenRememberMeExpiry)
            .await
            .unwrap_or(AppConfig::get().jwt.refresh_token_remember_me_expiry)
    }

    pub async fn upload_max_size() -> usize {
        Self::integer(KnownSettingKey::UploadMaxSize)
            .await
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(AppConfig::get().upload.max_size)
    }

    pub async fn upload_allowed_types() -> Vec<String> {
        Self::string_list(KnownSettingKey::UploadAllowedTypes)
            .await
            .unwrap_or_else(|| AppConfig::get().upload.allowed_types.clone())
    }

    pub async fn cors_allowed_origins() -> Vec<String> {
        Self::string_list(KnownSettingKey::CorsAllowedOrigins)
            .await
            .unwrap_or_else(|| AppConfig::get().cors.allowed_origins.clone())
    }

    pub async fn cors_max_age() -> usize {
        Self::integer(KnownSettingKey::CorsMaxAge)
            .await
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(AppConfig::get().cors.max_age)
    }

    pub async fn message_max_length() -> usize {
        Self::integer(KnownSettingKey::MessageMaxLength)
            .await
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MESSAGE_MAX_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_update_and_fallback() {
        DynamicConfig::update("messages.max_length", "120").await;
        assert_eq!(DynamicConfig::message_max_length().await, 120);

        // 无法解析时回退
        DynamicConfig::update("messages.max_length", "lots").await;
        assert_eq!(
            DynamicConfig::message_max_length().await,
            DEFAULT_MESSAGE_MAX_LENGTH
        );

        DynamicConfig::update("upload.allowed_types", r#"[".pdf",".png"]"#).await;
        assert_eq!(
            DynamicConfig::upload_allowed_types().await,
            vec![".pdf".to_string(), ".png".to_string()]
        );
    }
}
