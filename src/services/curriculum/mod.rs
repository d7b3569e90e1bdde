pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod transition;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    curriculum::{
        entities::{CurriculumPlan, CurriculumTopic},
        requests::{
            CreateCurriculumPlanRequest, CurriculumPlanListParams, ReviewCurriculumPlanRequest,
            UpdateCurriculumPlanRequest,
        },
    },
};
use crate::services::permissions::internal_error;
use crate::storage::Storage;
use crate::utils::validate::validate_academic_year;

pub struct CurriculumService {
    storage: Option<Arc<dyn Storage>>,
}

impl CurriculumService {
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

    pub async fn list_plans(
        &self,
        params: CurriculumPlanListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_plans(self, params, request).await
    }

    pub async fn create_plan(
        &self,
        body: CreateCurriculumPlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_plan(self, body, request).await
    }

    pub async fn get_plan(&self, plan_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_plan(self, plan_id, request).await
    }

    pub async fn update_plan(
        &self,
        plan_id: i64,
        body: UpdateCurriculumPlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_plan(self, plan_id, body, request).await
    }

    pub async fn submit_plan(&self, plan_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        transition::submit_plan(self, plan_id, request).await
    }

    pub async fn review_plan(
        &self,
        plan_id: i64,
        body: ReviewCurriculumPlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        transition::review_plan(self, plan_id, body, request).await
    }

    pub async fn delete_plan(&self, plan_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_plan(self, plan_id, request).await
    }
}

pub(crate) fn plan_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::CurriculumPlanNotFound,
        "Curriculum plan not found",
    ))
}

pub(crate) fn invalid_state(message: &str) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::CurriculumPlanStateInvalid,
        message,
    ))
}

pub(crate) async fn load_plan(
    storage: &Arc<dyn Storage>,
    plan_id: i64,
) -> Result<CurriculumPlan, HttpResponse> {
    match storage.get_curriculum_plan_by_id(plan_id).await {
        Ok(Some(plan)) => Ok(plan),
        Ok(None) => Err(plan_not_found()),
        Err(e) => Err(internal_error("Failed to load curriculum plan", e)),
    }
}

/// 校验学年、学期与周次安排
pub fn validate_plan_fields(
    academic_year: Option<&str>,
    term: Option<i32>,
    topics: Option<&[CurriculumTopic]>,
) -> Result<(), String> {
    if let Some(year) = academic_year {
        validate_academic_year(year)?;
    }
    if let Some(term) = term
        && !(1..=4).contains(&term)
    {
        return Err("term must be between 1 and 4".to_string());
    }
    for topic in topics.unwrap_or_default() {
        if topic.week < 1 {
            return Err(format!("week must be at least 1, got {}", topic.week));
        }
        if topic.topic.trim().is_empty() {
            return Err(format!("topic of week {} cannot be empty", topic.week));
        }
    }
    Ok(())
}

pub(crate) fn invalid_fields(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(week: i32, text: &str) -> CurriculumTopic {
        CurriculumTopic {
            week,
            topic: text.to_string(),
            objectives: None,
        }
    }

    #[test]
    fn test_validate_plan_fields() {
        assert!(validate_plan_fields(Some("2024-2025"), Some(1), Some(&[topic(1, "Sets")])).is_ok());
        assert!(validate_plan_fields(None, None, None).is_ok());
        assert!(validate_plan_fields(Some("2024-2026"), Some(1), None).is_err());
        assert!(validate_plan_fields(None, Some(5), None).is_err());
        assert!(validate_plan_fields(None, Some(0), None).is_err());
        assert!(validate_plan_fields(None, None, Some(&[topic(0, "Intro")])).is_err());
        assert!(validate_plan_fields(None, None, Some(&[topic(2, "  ")])).is_err());
    }
}
