use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradeService, grade_not_found, load_grade};
use crate::models::ApiResponse;
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager,
};

pub async fn delete_grade(
    service: &GradeService,
    grade_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let grade = match load_grade(&storage, grade_id).await {
        Ok(grade) => grade,
        Err(resp) => return Ok(resp),
    };
    let subject = match load_subject(&storage, grade.subject_id).await {
        Ok(subject) => subject,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_subject_manager(&user, &subject) {
        return Ok(resp);
    }

    match storage.delete_grade(grade_id).await {
        Ok(true) => {
            info!("Grade {} deleted by {}", grade_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("成绩已删除")))
        }
        Ok(false) => Ok(grade_not_found()),
        Err(e) => Ok(internal_error("Failed to delete grade", e)),
    }
}
