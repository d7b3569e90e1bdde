use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{DocumentService, document_not_found, load_document, stored_path};
use crate::models::ApiResponse;
use crate::services::permissions::{current_user, forbidden, internal_error};

/// 上传者或管理层可删除，同时删除磁盘文件
pub async fn delete_document(
    service: &DocumentService,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let document = match load_document(&storage, document_id).await {
        Ok(document) => document,
        Err(resp) => return Ok(resp),
    };
    if document.owner_id != user.id && !user.role.is_management() {
        return Ok(forbidden("Only the owner or administrators can delete this document"));
    }

    match storage.delete_document(document_id).await {
        Ok(true) => {}
        Ok(false) => return Ok(document_not_found()),
        Err(e) => return Ok(internal_error("Failed to delete document", e)),
    }

    let path = stored_path(&document.stored_name);
    if let Err(e) = tokio::fs::remove_file(&path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to remove stored file {:?}: {}", path, e);
    }
    info!("Document {} deleted by {}", document_id, user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("文档已删除")))
}
