use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, load_item};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

pub async fn delete_item(
    service: &ScheduleService,
    item_id: i64,
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

    match storage.delete_schedule_item(item_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课表条目已删除"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleItemNotFound,
            "Schedule item not found",
        ))),
        Err(e) => Ok(internal_error("Failed to delete schedule item", e)),
    }
}
