use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, load_grade};
use crate::models::ApiResponse;
use crate::services::permissions::{can_manage_subject, current_user, forbidden, load_subject};

pub async fn get_grade(
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

    if grade.student_id != user.id {
        let subject = match load_subject(&storage, grade.subject_id).await {
            Ok(subject) => subject,
            Err(resp) => return Ok(resp),
        };
        if !can_manage_subject(&user, &subject) {
            return Ok(forbidden("You do not have permission to view this grade"));
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "获取成绩成功")))
}
