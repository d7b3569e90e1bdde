use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScheduleService;
use super::conflict::{Slot, check_conflicts, validate_slot};
use crate::models::{ApiResponse, ErrorCode, schedule::requests::CreateScheduleItemRequest};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

pub async fn create_item(
    service: &ScheduleService,
    mut body: CreateScheduleItemRequest,
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

    body.title = body.title.trim().to_string();
    if body.title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Title cannot be empty",
        )));
    }
    body.room = body
        .room
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let (start, end) = match validate_slot(body.day_of_week, &body.start_time, &body.end_time) {
        Ok(range) => range,
        Err(resp) => return Ok(resp),
    };

    let slot = Slot {
        exclude_id: None,
        day_of_week: body.day_of_week,
        start,
        end,
        room: body.room.as_deref(),
        teacher_id: subject.teacher_id,
    };
    if let Err(resp) = check_conflicts(&storage, &slot).await {
        return Ok(resp);
    }

    match storage.create_schedule_item(body).await {
        Ok(item) => {
            info!("Schedule item {} created for subject {}", item.id, item.subject_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(item, "课表条目创建成功")))
        }
        Err(e) => Ok(internal_error("Failed to create schedule item", e)),
    }
}
