use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::permissions::{current_user, internal_error, require_management};

/// 删除课程，选课、课表、作业等随外键级联删除
pub async fn delete_subject(
    service: &SubjectService,
    subject_id: i64,
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

    match storage.delete_subject(subject_id).await {
        Ok(true) => {
            info!("Subject {} deleted by {}", subject_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课程已删除")))
        }
        Ok(false) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubjectNotFound, "Subject not found"))),
        Err(e) => Ok(internal_error("Failed to delete subject", e)),
    }
}
