//! 作业提交存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, SubmissionListQuery},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            content: Set(req.content),
            document_id: Set(req.document_id),
            status: Set(req.status.to_string()),
            submitted_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 查询学生对某作业的提交
    pub async fn get_submission_by_assignment_and_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 重新提交：替换内容与提交时间，已批改的提交保持不变
    pub async fn resubmit_submission_impl(
        &self,
        id: i64,
        content: String,
        document_id: Option<i64>,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(Column::Content, Expr::value(content))
            .col_expr(Column::DocumentId, Expr::value(document_id))
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::SubmittedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.ne(SubmissionStatus::Graded.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("重新提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_submission_by_id_impl(id).await
    }

    /// 分页列出提交
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Submissions::find();

        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询提交总数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{create_subject, create_user};

    async fn setup() -> (SeaOrmStorage, i64, i64) {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let student = create_user(&storage, "student", UserRole::Student).await;
        let subject = create_subject(&storage, "HIST", Some(teacher)).await;
        let assignment = storage
            .create_assignment_impl(
                teacher,
                CreateAssignmentRequest {
                    subject_id: subject,
                    title: "Essay".to_string(),
                    description: None,
                    due_date: None,
                    max_score: Some(20.0),
                },
            )
            .await
            .unwrap();
        (storage, assignment.id, student)
    }

    #[actix_web::test]
    async fn test_resubmit_until_graded() {
        let (storage, assignment_id, student_id) = setup().await;
        let created = storage
            .create_submission_impl(NewSubmission {
                assignment_id,
                student_id,
                content: "draft".to_string(),
                document_id: None,
                status: SubmissionStatus::Submitted,
            })
            .await
            .unwrap();

        // 同一学生同一作业只能有一条提交
        assert!(
            storage
                .create_submission_impl(NewSubmission {
                    assignment_id,
                    student_id,
                    content: "again".to_string(),
                    document_id: None,
                    status: SubmissionStatus::Submitted,
                })
                .await
                .is_err()
        );

        let resubmitted = storage
            .resubmit_submission_impl(created.id, "final".to_string(), None, SubmissionStatus::Late)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resubmitted.content, "final");
        assert_eq!(resubmitted.status, SubmissionStatus::Late);

        Submissions::update_many()
            .col_expr(Column::Status, Expr::value(SubmissionStatus::Graded.to_string()))
            .filter(Column::Id.eq(created.id))
            .exec(&storage.db)
            .await
            .unwrap();

        assert!(
            storage
                .resubmit_submission_impl(created.id, "late edit".to_string(), None, SubmissionStatus::Late)
                .await
                .unwrap()
                .is_none()
        );

        let listed = storage
            .list_submissions_with_pagination_impl(SubmissionListQuery {
                assignment_id: Some(assignment_id),
                status: Some(SubmissionStatus::Graded),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].content, "final");
    }
}
