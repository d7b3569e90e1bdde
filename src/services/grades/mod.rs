pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod report;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    grades::{
        entities::Grade,
        requests::{CreateGradeRequest, GradeListParams, GradeReportParams, UpdateGradeRequest},
    },
};
use crate::services::permissions::internal_error;
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    pub async fn list_grades(
        &self,
        params: GradeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, params, request).await
    }

    pub async fn create_grade(
        &self,
        body: CreateGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grade(self, body, request).await
    }

    pub async fn get_grade(&self, grade_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_grade(self, grade_id, request).await
    }

    pub async fn update_grade(
        &self,
        grade_id: i64,
        body: UpdateGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grade(self, grade_id, body, request).await
    }

    pub async fn delete_grade(
        &self,
        grade_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_grade(self, grade_id, request).await
    }

    pub async fn report(
        &self,
        params: GradeReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::grade_report(self, params, request).await
    }
}

pub(crate) async fn load_grade(
    storage: &Arc<dyn Storage>,
    grade_id: i64,
) -> Result<Grade, HttpResponse> {
    match storage.get_grade_by_id(grade_id).await {
        Ok(Some(grade)) => Ok(grade),
        Ok(None) => Err(grade_not_found()),
        Err(e) => Err(internal_error("Failed to load grade", e)),
    }
}

pub(crate) fn grade_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::GradeNotFound,
        "Grade not found",
    ))
}

pub(crate) fn invalid_score() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::GradeScoreInvalid,
        "Score must be between 0 and max_score, and max_score must be positive",
    ))
}
