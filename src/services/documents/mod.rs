pub mod delete;
pub mod download;
pub mod list;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    documents::entities::{Document, DocumentCategory},
    documents::requests::DocumentListParams,
    users::entities::User,
};
use crate::services::permissions::{can_manage_subject, internal_error, is_subject_member};
use crate::storage::Storage;

pub struct DocumentService {
    storage: Option<Arc<dyn Storage>>,
}

impl DocumentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn upload(&self, request: &HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    pub async fn list(
        &self,
        params: DocumentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_documents(self, params, request).await
    }

    pub async fn get(&self, document_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        download::get_document(self, document_id, request).await
    }

    pub async fn download(
        &self,
        document_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, document_id, request).await
    }

    pub async fn delete(&self, document_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_document(self, document_id, request).await
    }
}

/// 文档在磁盘上的路径
pub(crate) fn stored_path(stored_name: &str) -> PathBuf {
    PathBuf::from(&AppConfig::get().upload.dir).join(stored_name)
}

pub(crate) fn document_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::FileNotFound,
        "Document not found",
    ))
}

pub(crate) async fn load_document(
    storage: &Arc<dyn Storage>,
    document_id: i64,
) -> Result<Document, HttpResponse> {
    match storage.get_document_by_id(document_id).await {
        Ok(Some(document)) => Ok(document),
        Ok(None) => Err(document_not_found()),
        Err(e) => Err(internal_error("Failed to load document", e)),
    }
}

/// 自己上传的、公开的，或所属课程的成员可见；作业附件只给课程管理者看
pub(crate) async fn can_view_document(
    storage: &Arc<dyn Storage>,
    user: &User,
    document: &Document,
) -> Result<bool, HttpResponse> {
    if user.role.is_management() || document.owner_id == user.id || document.is_public {
        return Ok(true);
    }
    let Some(subject_id) = document.subject_id else {
        return Ok(false);
    };
    match storage.get_subject_by_id(subject_id).await {
        Ok(Some(subject)) if document.category == DocumentCategory::Homework => {
            Ok(can_manage_subject(user, &subject))
        }
        Ok(Some(subject)) => is_subject_member(storage, user, &subject).await,
        Ok(None) => Ok(false),
        Err(e) => Err(internal_error("Failed to load subject", e)),
    }
}

/// 不可见的文档按不存在处理
pub(crate) async fn load_visible_document(
    storage: &Arc<dyn Storage>,
    user: &User,
    document_id: i64,
) -> Result<Document, HttpResponse> {
    let document = load_document(storage, document_id).await?;
    if can_view_document(storage, user, &document).await? {
        Ok(document)
    } else {
        Err(document_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::documents::requests::NewDocument;
    use crate::models::users::entities::UserRole;
    use crate::storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::{create_subject, create_user};

    fn upload(owner_id: i64, subject_id: i64, category: DocumentCategory) -> NewDocument {
        NewDocument {
            owner_id,
            subject_id: Some(subject_id),
            title: category.to_string(),
            category,
            original_name: "work.pdf".to_string(),
            stored_name: format!("{}-work.pdf", uuid::Uuid::new_v4()),
            file_size: 2048,
            file_type: "application/pdf".to_string(),
            is_public: false,
        }
    }

    #[actix_web::test]
    async fn test_homework_attachment_visible_to_owner_and_teacher_only() {
        let concrete = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&concrete, "teacher", UserRole::Teacher).await;
        let alice = create_user(&concrete, "alice", UserRole::Student).await;
        let bob = create_user(&concrete, "bob", UserRole::Student).await;
        let math = create_subject(&concrete, "MATH", Some(teacher)).await;
        concrete.enroll_student_impl(math, alice).await.unwrap();
        concrete.enroll_student_impl(math, bob).await.unwrap();

        let essay = concrete
            .create_document_impl(upload(alice, math, DocumentCategory::Homework))
            .await
            .unwrap();
        let notes = concrete
            .create_document_impl(upload(teacher, math, DocumentCategory::Material))
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(concrete);
        let user = |id| {
            let storage = storage.clone();
            async move { storage.get_user_by_id(id).await.unwrap().unwrap() }
        };
        let (teacher, alice, bob) = (user(teacher).await, user(alice).await, user(bob).await);

        assert!(can_view_document(&storage, &alice, &essay).await.unwrap());
        assert!(can_view_document(&storage, &teacher, &essay).await.unwrap());
        assert!(!can_view_document(&storage, &bob, &essay).await.unwrap());
        assert!(can_view_document(&storage, &bob, &notes).await.unwrap());

        let hidden = load_visible_document(&storage, &bob, essay.id).await.unwrap_err();
        assert_eq!(hidden.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
