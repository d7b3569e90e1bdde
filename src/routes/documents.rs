use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::documents::requests::DocumentListParams;
use crate::services::DocumentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 DocumentService 实例
static DOCUMENT_SERVICE: Lazy<DocumentService> = Lazy::new(DocumentService::new_lazy);

pub async fn handle_upload(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.upload(&request, payload).await
}

pub async fn list_documents(
    request: HttpRequest,
    query: web::Query<DocumentListParams>,
) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.list(query.into_inner(), &request).await
}

pub async fn get_document(request: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.get(path.0, &request).await
}

pub async fn handle_download(request: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.download(path.0, &request).await
}

pub async fn delete_document(request: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    DOCUMENT_SERVICE.delete(path.0, &request).await
}

// 配置路由
pub fn configure_document_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/documents")
            .wrap(middlewares::RequireJWT)
            .wrap(middleware::Compress::default())
            .service(
                web::resource("/upload")
                    .wrap(RateLimit::file_upload())
                    .route(web::post().to(handle_upload)),
            )
            // 可见性在业务层检查
            .route("", web::get().to(list_documents))
            .route("/{id}", web::get().to(get_document))
            .route("/{id}", web::delete().to(delete_document))
            .route("/{id}/download", web::get().to(handle_download)),
    );
}
