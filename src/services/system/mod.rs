pub mod health;
pub mod settings;
pub mod settings_cache;

pub use settings_cache::DynamicConfig;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::system::requests::{SettingAuditQuery, UpdateSettingRequest};
use crate::storage::Storage;

pub struct SystemService {
    storage: Option<Arc<dyn Storage>>,
}

impl SystemService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        health::health(self, request).await
    }

    pub async fn get_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_settings(self, request).await
    }

    pub async fn list_admin_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::list_admin_settings(self, request).await
    }

    pub async fn update_setting(
        &self,
        key: String,
        body: UpdateSettingRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        settings::update_setting(self, key, body, request).await
    }

    pub async fn list_setting_audits(
        &self,
        query: SettingAuditQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        settings::list_setting_audits(self, query, request).await
    }

    pub async fn websocket_status(&self) -> ActixResult<HttpResponse> {
        health::websocket_status().await
    }
}
