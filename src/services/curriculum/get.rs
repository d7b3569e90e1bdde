use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CurriculumService, load_plan, plan_not_found};
use crate::models::{ApiResponse, curriculum::entities::PlanStatus};
use crate::services::permissions::{
    can_manage_subject, current_user, is_subject_member, load_subject,
};

pub async fn get_plan(
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
    let subject = match load_subject(&storage, plan.subject_id).await {
        Ok(subject) => subject,
        Err(resp) => return Ok(resp),
    };

    let visible = if can_manage_subject(&user, &subject) {
        true
    } else if plan.status == PlanStatus::Approved {
        match is_subject_member(&storage, &user, &subject).await {
            Ok(member) => member,
            Err(resp) => return Ok(resp),
        }
    } else {
        false
    };
    if !visible {
        return Ok(plan_not_found());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(plan, "获取教学计划成功")))
}
