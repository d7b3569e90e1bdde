//! 教学计划状态流转
//!
//! draft/rejected -> submitted -> approved/rejected，其余流转返回 409。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CurriculumService, invalid_state, load_plan};
use crate::models::{
    ApiResponse,
    curriculum::{entities::PlanStatus, requests::ReviewCurriculumPlanRequest},
    notifications::entities::NotificationType,
};
use crate::services::notifications::{NotificationDraft, notify};
use crate::services::permissions::{current_user, forbidden, internal_error, require_management};

pub async fn submit_plan(
    service: &CurriculumService,
    plan_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let plan = match load_plan(&storage, plan_id).await {
        Ok(plan) => plan,
        Err(resp) => return Ok(resp),
    };
    if plan.created_by != user.id {
        return Ok(forbidden("Only the creator can submit this plan"));
    }
    if !plan.status.can_transition_to(PlanStatus::Submitted) {
        return Ok(invalid_state(&format!(
            "Cannot submit a plan in status {}",
            plan.status
        )));
    }

    match storage
        .transition_curriculum_plan(plan_id, plan.status, PlanStatus::Submitted, None)
        .await
    {
        Ok(Some(plan)) => {
            info!("Curriculum plan {} submitted by {}", plan.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(plan, "教学计划已提交审核")))
        }
        Ok(None) => Ok(invalid_state("Plan status changed, please reload")),
        Err(e) => Ok(internal_error("Failed to submit curriculum plan", e)),
    }
}

pub async fn review_plan(
    service: &CurriculumService,
    plan_id: i64,
    body: ReviewCurriculumPlanRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_management(&user) {
        return Ok(resp);
    }
    let storage = service.get_storage(request);

    let plan = match load_plan(&storage, plan_id).await {
        Ok(plan) => plan,
        Err(resp) => return Ok(resp),
    };
    let next = if body.approve {
        PlanStatus::Approved
    } else {
        PlanStatus::Rejected
    };
    if !plan.status.can_transition_to(next) {
        return Ok(invalid_state(&format!(
            "Cannot review a plan in status {}",
            plan.status
        )));
    }

    let reviewed = match storage
        .transition_curriculum_plan(plan_id, plan.status, next, Some((user.id, body.comment)))
        .await
    {
        Ok(Some(reviewed)) => reviewed,
        Ok(None) => return Ok(invalid_state("Plan status changed, please reload")),
        Err(e) => return Ok(internal_error("Failed to review curriculum plan", e)),
    };
    info!(
        "Curriculum plan {} {} by {}",
        reviewed.id, reviewed.status, user.id
    );

    let verdict = if body.approve { "已批准" } else { "已驳回" };
    notify(
        &storage,
        &[reviewed.created_by],
        NotificationDraft {
            notification_type: NotificationType::CurriculumReviewed,
            title: format!("教学计划{}：{}", verdict, reviewed.title),
            content: reviewed.review_comment.clone(),
            reference_type: "curriculum_plan",
            reference_id: reviewed.id,
        },
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(reviewed, "审核完成")))
}
