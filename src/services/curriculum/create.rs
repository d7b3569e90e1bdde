use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CurriculumService, invalid_fields, validate_plan_fields};
use crate::models::curriculum::requests::{CreateCurriculumPlanRequest, NewCurriculumPlan};
use crate::models::ApiResponse;
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

/// 新建教学计划，初始为草稿
pub async fn create_plan(
    service: &CurriculumService,
    body: CreateCurriculumPlanRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let subject = match load_subject(&storage, body.subject_id).await {
        Ok(subject) => subject,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    let title = body.title.trim().to_string();
    if title.is_empty() {
        return Ok(invalid_fields("Title cannot be empty".to_string()));
    }
    if let Err(msg) = validate_plan_fields(
        Some(&body.academic_year),
        Some(body.term),
        Some(&body.topics),
    ) {
        return Ok(invalid_fields(msg));
    }

    let new_plan = NewCurriculumPlan {
        subject_id: subject.id,
        title,
        academic_year: body.academic_year,
        term: body.term,
        topics: body.topics,
        created_by: user.id,
    };

    match storage.create_curriculum_plan(new_plan).await {
        Ok(plan) => {
            info!("Curriculum plan {} created by {}", plan.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(plan, "教学计划创建成功")))
        }
        Err(e) => Ok(internal_error("Failed to create curriculum plan", e)),
    }
}
