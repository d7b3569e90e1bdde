pub mod conflict;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    schedule::{
        entities::ScheduleItem,
        requests::{CreateScheduleItemRequest, ScheduleListParams, UpdateScheduleItemRequest},
    },
};
use crate::services::permissions::internal_error;
use crate::storage::Storage;

pub struct ScheduleService {
    storage: Option<Arc<dyn Storage>>,
}

impl ScheduleService {
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

    pub async fn list_schedule(
        &self,
        params: ScheduleListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_schedule(self, params, request).await
    }

    pub async fn create_item(
        &self,
        body: CreateScheduleItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_item(self, body, request).await
    }

    pub async fn update_item(
        &self,
        item_id: i64,
        body: UpdateScheduleItemRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_item(self, item_id, body, request).await
    }

    pub async fn delete_item(&self, item_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_item(self, item_id, request).await
    }
}

pub(crate) async fn load_item(
    storage: &Arc<dyn Storage>,
    item_id: i64,
) -> Result<ScheduleItem, HttpResponse> {
    match storage.get_schedule_item_by_id(item_id).await {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleItemNotFound,
            "Schedule item not found",
        ))),
        Err(e) => Err(internal_error("Failed to load schedule item", e)),
    }
}
