use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use tracing::error;

use super::{DocumentService, load_visible_document, stored_path};
use crate::errors::EduPortalError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::permissions::current_user;

pub async fn get_document(
    service: &DocumentService,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match load_visible_document(&storage, &user, document_id).await {
        Ok(document) => Ok(HttpResponse::Ok().json(ApiResponse::success(document, "获取文档成功"))),
        Err(resp) => Ok(resp),
    }
}

/// 文件名中的引号和控制字符会破坏 Content-Disposition
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

pub async fn handle_download(
    service: &DocumentService,
    document_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let document = match load_visible_document(&storage, &user, document_id).await {
        Ok(document) => document,
        Err(resp) => return Ok(resp),
    };

    let buf = match tokio::fs::read(stored_path(&document.stored_name)).await {
        Ok(buf) => buf,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::FileNotFound, "文件不存在")));
        }
        Err(e) => {
            error!("{}", EduPortalError::file_operation(format!("{e}")));
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "File read failed",
            )));
        }
    };

    // 使用数据库中的原始文件名
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                sanitize_filename(&document.original_name)
            ),
        ))
        .body(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("a\"b\\c\n.txt"), "a_b_c_.txt");
        assert_eq!(sanitize_filename("课件.pptx"), "课件.pptx");
    }
}
