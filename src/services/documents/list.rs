use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DocumentService;
use crate::models::{
    ApiResponse,
    documents::requests::{DocumentListParams, DocumentListQuery},
};
use crate::services::permissions::{
    current_user, internal_error, managed_subject_ids, visible_subject_ids,
};

pub async fn list_documents(
    service: &DocumentService,
    params: DocumentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let visible = match visible_subject_ids(&storage, &user).await {
        Ok(visible) => visible,
        Err(resp) => return Ok(resp),
    };

    let managed = match managed_subject_ids(&storage, &user).await {
        Ok(managed) => managed.unwrap_or_default(),
        Err(resp) => return Ok(resp),
    };

    let query = DocumentListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        // 管理层不限制
        viewer_id: visible.is_some().then_some(user.id),
        visible_subject_ids: visible,
        managed_subject_ids: managed,
        subject_id: params.subject_id,
        category: params.category,
        search: params.search,
    };

    match storage.list_documents_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取文档列表成功"))),
        Err(e) => Ok(internal_error("Failed to list documents", e)),
    }
}
