use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::models::subjects::requests::{
    CreateSubjectRequest, EnrollStudentRequest, SubjectListParams, UpdateSubjectRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SubjectService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 SubjectService 实例
static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectListParams>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(query.into_inner(), &req).await
}

pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.create_subject(body.into_inner(), &req).await
}

pub async fn get_subject(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_subject(path.0, &req).await
}

pub async fn update_subject(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_subject(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(path.0, &req).await
}

// 选课学生
pub async fn list_students(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .list_students(path.0, query.into_inner(), &req)
        .await
}

pub async fn enroll_student(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .enroll_student(path.0, body.into_inner(), &req)
        .await
}

pub async fn unenroll_student(
    req: HttpRequest,
    path: SafeIDI64,
    student: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .unenroll_student(path.0, student.0, &req)
        .await
}

// 配置路由
pub fn configure_subject_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 业务层按角色过滤
                    .route(web::get().to(list_subjects))
                    .route(
                        web::post()
                            .to(create_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::management_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_subject))
                    // 任课教师或管理层，业务层检查
                    .route(
                        web::put()
                            .to(update_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::management_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/students")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::get().to(list_students))
                    .route(web::post().to(enroll_student)),
            )
            .service(
                web::resource("/{id}/students/{student_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::delete().to(unenroll_student)),
            ),
    );
}
