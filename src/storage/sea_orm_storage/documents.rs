//! 文档存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::documents::{ActiveModel, Column, Entity as Documents};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginationInfo,
    documents::{
        entities::{Document, DocumentCategory},
        requests::{DocumentListQuery, NewDocument},
        responses::DocumentListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 保存文档元数据
    pub async fn create_document_impl(&self, doc: NewDocument) -> Result<Document> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            owner_id: Set(doc.owner_id),
            subject_id: Set(doc.subject_id),
            title: Set(doc.title),
            category: Set(doc.category.to_string()),
            original_name: Set(doc.original_name),
            stored_name: Set(doc.stored_name),
            file_size: Set(doc.file_size),
            file_type: Set(doc.file_type),
            is_public: Set(doc.is_public),
            uploaded_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("保存文档失败: {e}")))?;

        Ok(result.into_document())
    }

    /// 通过 ID 获取文档
    pub async fn get_document_by_id_impl(&self, id: i64) -> Result<Option<Document>> {
        let result = Documents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询文档失败: {e}")))?;

        Ok(result.map(|m| m.into_document()))
    }

    /// 分页列出可见文档
    pub async fn list_documents_with_pagination_impl(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Documents::find();

        // 可见范围
        if let Some(visible_subject_ids) = query.visible_subject_ids {
            let mut visibility = Condition::any().add(Column::IsPublic.eq(true));
            if let Some(viewer_id) = query.viewer_id {
                visibility = visibility.add(Column::OwnerId.eq(viewer_id));
            }
            if !visible_subject_ids.is_empty() {
                // 作业附件只对上传者和课程管理者可见
                let mut category = Condition::any()
                    .add(Column::Category.ne(DocumentCategory::Homework.to_string()));
                if !query.managed_subject_ids.is_empty() {
                    category =
                        category.add(Column::SubjectId.is_in(query.managed_subject_ids.clone()));
                }
                visibility = visibility.add(
                    Condition::all()
                        .add(Column::SubjectId.is_in(visible_subject_ids))
                        .add(category),
                );
            }
            select = select.filter(visibility);
        }

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(category) = query.category {
            select = select.filter(Column::Category.eq(category.to_string()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = like_contains(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(pattern.clone()))
                    .add(Column::OriginalName.like(pattern)),
            );
        }

        select = select
            .order_by_desc(Column::UploadedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询文档总数失败: {e}")))?;

        let documents = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询文档列表失败: {e}")))?;

        Ok(DocumentListResponse {
            items: documents.into_iter().map(|m| m.into_document()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 删除文档元数据
    pub async fn delete_document_impl(&self, id: i64) -> Result<bool> {
        let result = Documents::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("删除文档失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{create_subject, create_user};

    fn doc(owner_id: i64, subject_id: Option<i64>, title: &str, is_public: bool) -> NewDocument {
        NewDocument {
            owner_id,
            subject_id,
            title: title.to_string(),
            category: DocumentCategory::Material,
            original_name: format!("{title}.pdf"),
            stored_name: format!("{}-{title}.pdf", uuid::Uuid::new_v4()),
            file_size: 1024,
            file_type: "application/pdf".to_string(),
            is_public,
        }
    }

    #[actix_web::test]
    async fn test_visibility_rules() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let student = create_user(&storage, "student", UserRole::Student).await;
        let math = create_subject(&storage, "MATH", Some(teacher)).await;
        let art = create_subject(&storage, "ART", None).await;

        storage
            .create_document_impl(doc(teacher, Some(math), "math-notes", false))
            .await
            .unwrap();
        storage
            .create_document_impl(doc(teacher, Some(art), "art-notes", false))
            .await
            .unwrap();
        storage
            .create_document_impl(doc(teacher, None, "handbook", true))
            .await
            .unwrap();
        let own = storage
            .create_document_impl(doc(student, None, "my-cv", false))
            .await
            .unwrap();

        // 学生只选了数学
        let visible = storage
            .list_documents_with_pagination_impl(DocumentListQuery {
                viewer_id: Some(student),
                visible_subject_ids: Some(vec![math]),
                ..Default::default()
            })
            .await
            .unwrap();
        let mut titles: Vec<&str> = visible.items.iter().map(|d| d.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["handbook", "math-notes", "my-cv"]);

        let everything = storage
            .list_documents_with_pagination_impl(DocumentListQuery::default())
            .await
            .unwrap();
        assert_eq!(everything.pagination.total, 4);

        assert!(storage.delete_document_impl(own.id).await.unwrap());
        assert!(storage.get_document_by_id_impl(own.id).await.unwrap().is_none());
    }
    #[actix_web::test]
    async fn test_homework_documents_hidden_from_classmates() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let alice = create_user(&storage, "alice", UserRole::Student).await;
        let bob = create_user(&storage, "bob", UserRole::Student).await;
        let math = create_subject(&storage, "MATH", Some(teacher)).await;

        storage
            .create_document_impl(doc(teacher, Some(math), "syllabus", false))
            .await
            .unwrap();
        storage
            .create_document_impl(NewDocument {
                category: DocumentCategory::Homework,
                ..doc(alice, Some(math), "alice-essay", false)
            })
            .await
            .unwrap();

        let titles = |list: DocumentListResponse| {
            let mut titles: Vec<String> = list.items.into_iter().map(|d| d.title).collect();
            titles.sort();
            titles
        };

        let for_bob = storage
            .list_documents_with_pagination_impl(DocumentListQuery {
                viewer_id: Some(bob),
                visible_subject_ids: Some(vec![math]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(for_bob), vec!["syllabus"]);

        let for_alice = storage
            .list_documents_with_pagination_impl(DocumentListQuery {
                viewer_id: Some(alice),
                visible_subject_ids: Some(vec![math]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(for_alice), vec!["alice-essay", "syllabus"]);

        let for_teacher = storage
            .list_documents_with_pagination_impl(DocumentListQuery {
                viewer_id: Some(teacher),
                visible_subject_ids: Some(vec![math]),
                managed_subject_ids: vec![math],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(for_teacher), vec!["alice-essay", "syllabus"]);
    }
}
