use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::conflict::{Slot, check_conflicts, validate_slot};
use super::{ScheduleService, load_item};
use crate::models::{ApiResponse, ErrorCode, schedule::requests::UpdateScheduleItemRequest};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

pub async fn update_item(
    service: &ScheduleService,
    item_id: i64,
    mut body: UpdateScheduleItemRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let item = match load_item(&storage, item_id).await {
        Ok(item) => item,
        Err(resp) => return Ok(resp),
    };
    let subject = match load_subject(&storage, item.subject_id).await {
        Ok(subject) => subject,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    if let Some(title) = body.title.as_mut() {
        *title = title.trim().to_string();
        if title.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Title cannot be empty",
            )));
        }
    }
    if let Some(room) = body.room.as_mut() {
        *room = room.trim().to_string();
    }

    // 以合并后的结果做校验和冲突检测
    let day_of_week = body.day_of_week.unwrap_or(item.day_of_week);
    let start_time = body.start_time.as_deref().unwrap_or(&item.start_time);
    let end_time = body.end_time.as_deref().unwrap_or(&item.end_time);
    let room = match body.room.as_deref() {
        Some(room) => Some(room),
        None => item.room.as_deref(),
    };

    let (start, end) = match validate_slot(day_of_week, start_time, end_time) {
        Ok(range) => range,
        Err(resp) => return Ok(resp),
    };
    let slot = Slot {
        exclude_id: Some(item.id),
        day_of_week,
        start,
        end,
        room,
        teacher_id: subject.teacher_id,
    };
    if let Err(resp) = check_conflicts(&storage, &slot).await {
        return Ok(resp);
    }

    match storage.update_schedule_item(item_id, body).await {
        Ok(Some(item)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(item, "课表条目更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleItemNotFound,
            "Schedule item not found",
        ))),
        Err(e) => Ok(internal_error("Failed to update schedule item", e)),
    }
}
