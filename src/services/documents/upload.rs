use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{DocumentService, stored_path};
use crate::config::AppConfig;
use crate::errors::EduPortalError;
use crate::models::{
    ApiResponse, ErrorCode,
    documents::{entities::DocumentCategory, requests::NewDocument},
};
use crate::services::permissions::{
    current_user, internal_error, load_subject, require_subject_manager, require_subject_member,
};
use crate::services::system::DynamicConfig;
use crate::utils::{file_extension, validate_magic_bytes};

/// 文本字段的长度上限
const MAX_TEXT_FIELD_BYTES: usize = 4096;

/// 写到一半的上传文件，未调用 `keep` 时在离开作用域时删除
struct PendingFile {
    path: PathBuf,
    keep: bool,
}

impl PendingFile {
    fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.keep
            && let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!("Failed to remove partial upload {:?}: {}", self.path, e);
        }
    }
}

struct UploadedFile {
    pending: PendingFile,
    stored_name: String,
    original_name: String,
    file_size: i64,
    file_type: String,
}

#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    title: Option<String>,
    category: Option<String>,
    subject_id: Option<String>,
    is_public: Option<String>,
}

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

async fn read_text_field(field: &mut Field) -> Result<String, HttpResponse> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| bad_request(ErrorCode::BadRequest, e.to_string()))?;
        if buf.len() + data.len() > MAX_TEXT_FIELD_BYTES {
            return Err(bad_request(ErrorCode::BadRequest, "Form field is too long"));
        }
        buf.extend_from_slice(&data);
    }
    String::from_utf8(buf).map_err(|_| bad_request(ErrorCode::BadRequest, "Form field is not valid UTF-8"))
}

/// 流式写盘，同时校验扩展名、文件头与大小
async fn receive_file(field: &mut Field, upload_dir: &Path) -> Result<UploadedFile, HttpResponse> {
    let max_size = DynamicConfig::upload_max_size().await;
    let allowed_types = DynamicConfig::upload_allowed_types().await;

    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let extension = file_extension(&original_name).unwrap_or_default();
    if extension.is_empty() || !allowed_types.iter().any(|t| t.to_lowercase() == extension) {
        return Err(bad_request(ErrorCode::FileTypeNotAllowed, "File type not allowed"));
    }

    // MIME 类型只做记录，不参与校验
    let file_type = field
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
    let path = upload_dir.join(&stored_name);
    let mut file = tokio::fs::File::create(&path).await.map_err(|e| {
        error!("{}", EduPortalError::file_operation(format!("{e}")));
        HttpResponse::InternalServerError()
            .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, "文件创建失败"))
    })?;
    let pending = PendingFile::new(path);

    let mut total_size: usize = 0;
    let mut first_chunk = true;
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| bad_request(ErrorCode::FileUploadFailed, e.to_string()))?;

        if first_chunk {
            first_chunk = false;
            if !validate_magic_bytes(&data, &extension) {
                return Err(bad_request(ErrorCode::FileTypeNotAllowed, "文件内容与扩展名不匹配"));
            }
        }

        total_size += data.len();
        if total_size > max_size {
            return Err(bad_request(
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit",
            ));
        }
        file.write_all(&data).await.map_err(|e| {
            error!("{}", EduPortalError::file_operation(format!("{e}")));
            HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, "文件写入失败"))
        })?;
    }

    if total_size == 0 {
        return Err(bad_request(ErrorCode::FileUploadFailed, "Uploaded file is empty"));
    }
    if let Err(e) = file.flush().await {
        error!("{}", EduPortalError::file_operation(format!("{e}")));
    }

    Ok(UploadedFile {
        pending,
        stored_name,
        original_name,
        file_size: total_size as i64,
        file_type,
    })
}

async fn read_form(payload: &mut Multipart, upload_dir: &Path) -> Result<UploadForm, HttpResponse> {
    let mut form = UploadForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| bad_request(ErrorCode::BadRequest, e.to_string()))?
    {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => {
                if form.file.is_some() {
                    return Err(bad_request(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    ));
                }
                form.file = Some(receive_file(&mut field, upload_dir).await?);
            }
            "title" => form.title = Some(read_text_field(&mut field).await?),
            "category" => form.category = Some(read_text_field(&mut field).await?),
            "subject_id" => form.subject_id = Some(read_text_field(&mut field).await?),
            "is_public" => form.is_public = Some(read_text_field(&mut field).await?),
            // 未知字段直接丢弃
            _ => {
                while field.next().await.is_some() {}
            }
        }
    }
    Ok(form)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

pub async fn handle_upload(
    service: &DocumentService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let upload_dir = PathBuf::from(&AppConfig::get().upload.dir);
    if let Err(e) = tokio::fs::create_dir_all(&upload_dir).await {
        error!("{}", EduPortalError::file_operation(format!("{e}")));
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "创建上传目录失败",
        )));
    }

    let form = match read_form(&mut payload, &upload_dir).await {
        Ok(form) => form,
        Err(resp) => return Ok(resp),
    };
    let Some(file) = form.file else {
        return Ok(bad_request(ErrorCode::FileNotFound, "No file found in upload payload"));
    };

    let category = match form.category.as_deref().map(str::trim) {
        None | Some("") => DocumentCategory::Other,
        Some(raw) => match DocumentCategory::from_str(raw) {
            Ok(category) => category,
            Err(e) => return Ok(bad_request(ErrorCode::BadRequest, e)),
        },
    };
    let subject_id = match form.subject_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) if id > 0 => Some(id),
            _ => return Ok(bad_request(ErrorCode::BadRequest, "subject_id is invalid")),
        },
    };
    let is_public = match form.is_public.as_deref().map(parse_bool) {
        None => false,
        Some(Some(value)) => value,
        Some(None) => return Ok(bad_request(ErrorCode::BadRequest, "is_public is invalid")),
    };
    let title = form
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| file.original_name.clone());

    let storage = service.get_storage(request);

    // 作业附件只需课程成员身份，其余课程文档需要课程管理权限
    if let Some(subject_id) = subject_id {
        let subject = match load_subject(&storage, subject_id).await {
            Ok(subject) => subject,
            Err(resp) => return Ok(resp),
        };
        let allowed = if category == DocumentCategory::Homework {
            require_subject_member(&storage, &user, &subject).await
        } else {
            require_subject_manager(&user, &subject)
        };
        if let Err(resp) = allowed {
            return Ok(resp);
        }
    }

    let new_document = NewDocument {
        owner_id: user.id,
        subject_id,
        title,
        category,
        original_name: file.original_name,
        stored_name: file.stored_name,
        file_size: file.file_size,
        file_type: file.file_type,
        is_public,
    };

    match storage.create_document(new_document).await {
        Ok(document) => {
            file.pending.keep();
            info!(
                "Document {} uploaded by {} ({} bytes, {:?})",
                document.id,
                user.id,
                document.file_size,
                stored_path(&document.stored_name)
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(document, "File uploaded successfully")))
        }
        Err(e) => Ok(internal_error("Failed to save document", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_pending_file_removed_unless_kept() {
        let dir = std::env::temp_dir();
        let dropped = dir.join(format!("pending-{}.bin", Uuid::new_v4()));
        std::fs::write(&dropped, b"x").unwrap();
        drop(PendingFile::new(dropped.clone()));
        assert!(!dropped.exists());

        let kept = dir.join(format!("pending-{}.bin", Uuid::new_v4()));
        std::fs::write(&kept, b"x").unwrap();
        PendingFile::new(kept.clone()).keep();
        assert!(kept.exists());
        std::fs::remove_file(kept).unwrap();
    }
}
