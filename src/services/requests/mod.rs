pub mod create;
pub mod get;
pub mod list;
pub mod review;
pub mod withdraw;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    admin_requests::{
        entities::AdminRequest,
        requests::{AdminRequestListParams, CreateAdminRequest, ReviewAdminRequest},
    },
};
use crate::services::permissions::internal_error;
use crate::storage::Storage;

pub struct AdminRequestService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminRequestService {
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

    pub async fn create_request(
        &self,
        body: CreateAdminRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_request(self, body, request).await
    }

    pub async fn list_requests(
        &self,
        params: AdminRequestListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_requests(self, params, request).await
    }

    pub async fn get_request(
        &self,
        request_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_request(self, request_id, request).await
    }

    pub async fn review_request(
        &self,
        request_id: i64,
        body: ReviewAdminRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_request(self, request_id, body, request).await
    }

    pub async fn withdraw_request(
        &self,
        request_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        withdraw::withdraw_request(self, request_id, request).await
    }
}

pub(crate) async fn load_request(
    storage: &Arc<dyn Storage>,
    request_id: i64,
) -> Result<AdminRequest, HttpResponse> {
    match storage.get_admin_request_by_id(request_id).await {
        Ok(Some(admin_request)) => Ok(admin_request),
        Ok(None) => Err(request_not_found()),
        Err(e) => Err(internal_error("Failed to load request", e)),
    }
}

pub(crate) fn request_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::RequestNotFound,
        "Request not found",
    ))
}

pub(crate) fn already_reviewed() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::RequestAlreadyReviewed,
        "Request has already been reviewed",
    ))
}
