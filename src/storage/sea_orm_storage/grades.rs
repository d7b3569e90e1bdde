//! 成绩存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::assignments::Entity as Assignments;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginationInfo,
    grades::{
        entities::Grade,
        requests::{GradeListQuery, NewGrade, UpdateGradeRequest},
        responses::GradeListResponse,
    },
    submissions::entities::{Submission, SubmissionStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

fn to_active_model(grade: NewGrade, now: i64) -> ActiveModel {
    ActiveModel {
        student_id: Set(grade.student_id),
        subject_id: Set(grade.subject_id),
        assignment_id: Set(grade.assignment_id),
        submission_id: Set(grade.submission_id),
        graded_by: Set(Some(grade.graded_by)),
        grade_type: Set(grade.grade_type.to_string()),
        title: Set(grade.title),
        score: Set(grade.score),
        max_score: Set(grade.max_score),
        comment: Set(grade.comment),
        graded_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 录入成绩
    pub async fn create_grade_impl(&self, grade: NewGrade) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let result = to_active_model(grade, now)
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("录入成绩失败: {e}")))?;

        Ok(result.into_grade())
    }

    /// 批改提交：写入成绩并将提交标记为 graded
    ///
    /// 提交已被批改（或不存在）时返回 None，事务回滚。
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grade: NewGrade,
    ) -> Result<Option<(Submission, Grade)>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("开启事务失败: {e}")))?;

        let marked = Submissions::update_many()
            .col_expr(
                SubmissionColumn::Status,
                Expr::value(SubmissionStatus::Graded.to_string()),
            )
            .col_expr(SubmissionColumn::UpdatedAt, Expr::value(now))
            .filter(SubmissionColumn::Id.eq(submission_id))
            .filter(SubmissionColumn::Status.ne(SubmissionStatus::Graded.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新提交状态失败: {e}")))?;

        if marked.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| EduPortalError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        let grade = to_active_model(grade, now)
            .insert(&txn)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("录入成绩失败: {e}")))?;

        let submission = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(submission.map(|s| (s.into_submission(), grade.into_grade())))
    }

    /// 通过 ID 获取成绩
    pub async fn get_grade_by_id_impl(&self, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 通过提交 ID 获取成绩
    pub async fn get_grade_by_submission_id_impl(&self, submission_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 分页列出成绩
    pub async fn list_grades_with_pagination_impl(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Grades::find();

        if let Some(subject_ids) = query.subject_ids {
            select = select.filter(Column::SubjectId.is_in(subject_ids));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(grade_type) = query.grade_type {
            select = select.filter(Column::GradeType.eq(grade_type.to_string()));
        }

        select = select
            .order_by_desc(Column::GradedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询成绩总数失败: {e}")))?;

        let grades = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(GradeListResponse {
            items: grades.into_iter().map(|m| m.into_grade()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 报表用成绩，None 表示全部课程
    pub async fn list_grades_for_report_impl(
        &self,
        subject_ids: Option<Vec<i64>>,
    ) -> Result<Vec<Grade>> {
        let mut select = Grades::find();
        if let Some(subject_ids) = subject_ids {
            if subject_ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::SubjectId.is_in(subject_ids));
        }

        let result = select
            .order_by_asc(Column::SubjectId)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询成绩统计失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 更新成绩
    pub async fn update_grade_impl(
        &self,
        id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<Grade>> {
        if self.get_grade_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(score) = update.score {
            model.score = Set(score);
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }
        if let Some(comment) = update.comment {
            model.comment = Set(Some(comment));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新成绩失败: {e}")))?;

        self.get_grade_by_id_impl(id).await
    }

    /// 删除成绩
    ///
    /// 批改产生的成绩被删除时，对应提交退回 submitted/late，可再次批改或重新提交。
    pub async fn delete_grade_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(grade) = Grades::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询成绩失败: {e}")))?
        else {
            txn.rollback()
                .await
                .map_err(|e| EduPortalError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(false);
        };

        if let Some(submission_id) = grade.submission_id
            && let Some(submission) = Submissions::find_by_id(submission_id)
                .one(&txn)
                .await
                .map_err(|e| EduPortalError::database_operation(format!("查询提交失败: {e}")))?
        {
            let due_date = Assignments::find_by_id(submission.assignment_id)
                .one(&txn)
                .await
                .map_err(|e| EduPortalError::database_operation(format!("查询作业失败: {e}")))?
                .and_then(|a| a.due_date);
            let status = if due_date.is_some_and(|due| submission.submitted_at > due) {
                SubmissionStatus::Late
            } else {
                SubmissionStatus::Submitted
            };

            Submissions::update_many()
                .col_expr(SubmissionColumn::Status, Expr::value(status.to_string()))
                .col_expr(
                    SubmissionColumn::UpdatedAt,
                    Expr::value(chrono::Utc::now().timestamp()),
                )
                .filter(SubmissionColumn::Id.eq(submission_id))
                .exec(&txn)
                .await
                .map_err(|e| EduPortalError::database_operation(format!("更新提交状态失败: {e}")))?;
        }

        let result = Grades::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("删除成绩失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::grades::entities::GradeType;
    use crate::models::submissions::requests::NewSubmission;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{create_subject, create_user};

    #[actix_web::test]
    async fn test_grade_submission_is_one_shot() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let student = create_user(&storage, "student", UserRole::Student).await;
        let subject = create_subject(&storage, "GEO", Some(teacher)).await;
        let assignment = storage
            .create_assignment_impl(
                teacher,
                CreateAssignmentRequest {
                    subject_id: subject,
                    title: "Map".to_string(),
                    description: None,
                    due_date: None,
                    max_score: Some(50.0),
                },
            )
            .await
            .unwrap();
        let submission = storage
            .create_submission_impl(NewSubmission {
                assignment_id: assignment.id,
                student_id: student,
                content: "done".to_string(),
                document_id: None,
                status: SubmissionStatus::Submitted,
            })
            .await
            .unwrap();

        let grade = NewGrade {
            student_id: student,
            subject_id: subject,
            assignment_id: Some(assignment.id),
            submission_id: Some(submission.id),
            graded_by: teacher,
            grade_type: GradeType::Assignment,
            title: assignment.title.clone(),
            score: 45.0,
            max_score: assignment.max_score,
            comment: Some("good".to_string()),
        };

        let (graded, created) = storage
            .grade_submission_impl(submission.id, grade.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(created.percentage(), 90.0);

        // 第二次批改被拒绝，且不会多出成绩
        assert!(
            storage
                .grade_submission_impl(submission.id, grade)
                .await
                .unwrap()
                .is_none()
        );
        let all = storage.list_grades_for_report_impl(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(
            storage
                .get_grade_by_submission_id_impl(submission.id)
                .await
                .unwrap()
                .map(|g| g.id),
            Some(created.id)
        );
    }

    #[actix_web::test]
    async fn test_deleting_submission_grade_reopens_submission() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let student = create_user(&storage, "student", UserRole::Student).await;
        let subject = create_subject(&storage, "ART", Some(teacher)).await;
        let assignment = storage
            .create_assignment_impl(
                teacher,
                CreateAssignmentRequest {
                    subject_id: subject,
                    title: "Sketch".to_string(),
                    description: None,
                    due_date: None,
                    max_score: None,
                },
            )
            .await
            .unwrap();
        let submission = storage
            .create_submission_impl(NewSubmission {
                assignment_id: assignment.id,
                student_id: student,
                content: "still life".to_string(),
                document_id: None,
                status: SubmissionStatus::Submitted,
            })
            .await
            .unwrap();
        let grade = NewGrade {
            student_id: student,
            subject_id: subject,
            assignment_id: Some(assignment.id),
            submission_id: Some(submission.id),
            graded_by: teacher,
            grade_type: GradeType::Assignment,
            title: assignment.title.clone(),
            score: 70.0,
            max_score: assignment.max_score,
            comment: None,
        };

        let (_, created) = storage
            .grade_submission_impl(submission.id, grade.clone())
            .await
            .unwrap()
            .unwrap();
        assert!(storage.delete_grade_impl(created.id).await.unwrap());
        assert!(!storage.delete_grade_impl(created.id).await.unwrap());

        let reopened = storage
            .get_submission_by_id_impl(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reopened.status, SubmissionStatus::Submitted);
        assert!(
            storage
                .get_grade_by_submission_id_impl(submission.id)
                .await
                .unwrap()
                .is_none()
        );

        // 可以重新提交，也可以再次批改
        assert!(
            storage
                .resubmit_submission_impl(
                    submission.id,
                    "still life, revised".to_string(),
                    None,
                    SubmissionStatus::Submitted,
                )
                .await
                .unwrap()
                .is_some()
        );
        let (regraded, _) = storage
            .grade_submission_impl(submission.id, grade)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(regraded.status, SubmissionStatus::Graded);
    }

    #[actix_web::test]
    async fn test_list_grades_filters() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let alice = create_user(&storage, "alice", UserRole::Student).await;
        let bob = create_user(&storage, "bob", UserRole::Student).await;
        let subject = create_subject(&storage, "LIT", Some(teacher)).await;

        for (student, grade_type) in [
            (alice, GradeType::Exam),
            (alice, GradeType::Quiz),
            (bob, GradeType::Exam),
        ] {
            storage
                .create_grade_impl(NewGrade {
                    student_id: student,
                    subject_id: subject,
                    assignment_id: None,
                    submission_id: None,
                    graded_by: teacher,
                    grade_type,
                    title: "Test".to_string(),
                    score: 7.0,
                    max_score: 10.0,
                    comment: None,
                })
                .await
                .unwrap();
        }

        let alice_grades = storage
            .list_grades_with_pagination_impl(GradeListQuery {
                student_id: Some(alice),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(alice_grades.pagination.total, 2);

        let exams = storage
            .list_grades_with_pagination_impl(GradeListQuery {
                grade_type: Some(GradeType::Exam),
                subject_ids: Some(vec![subject]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(exams.pagination.total, 2);

        let updated = storage
            .update_grade_impl(
                alice_grades.items[0].id,
                UpdateGradeRequest {
                    score: Some(9.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.score, 9.5);
    }
}
