//! 课程与选课存储操作

use super::{SeaOrmStorage, page_params};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{EduPortalError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    subjects::{
        entities::{Enrollment, Subject},
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            description: Set(req.description),
            teacher_id: Set(req.teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_subject())
    }

    /// 通过 ID 获取课程
    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 通过课程代码获取课程
    pub async fn get_subject_by_code_impl(&self, code: &str) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 批量获取课程
    pub async fn get_subjects_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Subject>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Subjects::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("批量查询课程失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_subject()).collect())
    }

    /// 分页列出课程
    pub async fn list_subjects_with_pagination_impl(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Subjects::find();

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        // 学生只看已选课程
        if let Some(student_id) = query.student_id {
            let subject_ids = self.list_subject_ids_by_student_impl(student_id).await?;
            select = select.filter(Column::Id.is_in(subject_ids));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = like_contains(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.like(pattern.clone()))
                    .add(Column::Name.like(pattern)),
            );
        }

        select = select.order_by_asc(Column::Code);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询课程总数失败: {e}")))?;

        let subjects = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(SubjectListResponse {
            items: subjects.into_iter().map(|m| m.into_subject()).collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 教师任课的课程 ID
    pub async fn list_subject_ids_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<i64>> {
        Subjects::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询任课课程失败: {e}")))
    }

    /// 更新课程
    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        if self.get_subject_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_subject_by_id_impl(id).await
    }

    /// 删除课程（选课、课表、作业等级联删除）
    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 选课
    pub async fn enroll_student_impl(&self, subject_id: i64, student_id: i64) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = EnrollmentActiveModel {
            subject_id: Set(subject_id),
            student_id: Set(student_id),
            enrolled_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("选课失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    /// 退课
    pub async fn unenroll_student_impl(&self, subject_id: i64, student_id: i64) -> Result<bool> {
        let result = Enrollments::delete_many()
            .filter(EnrollmentColumn::SubjectId.eq(subject_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("退课失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 查询选课记录
    pub async fn get_enrollment_impl(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(EnrollmentColumn::SubjectId.eq(subject_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 分页列出课程的选课记录
    pub async fn list_enrollments_with_pagination_impl(
        &self,
        subject_id: i64,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<PaginatedResponse<Enrollment>> {
        let (page, size) = page_params(page, size);

        let paginator = Enrollments::find()
            .filter(EnrollmentColumn::SubjectId.eq(subject_id))
            .order_by_asc(EnrollmentColumn::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询选课总数失败: {e}")))?;

        let enrollments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询选课列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: enrollments
                .into_iter()
                .map(|m| m.into_enrollment())
                .collect(),
            pagination: PaginationInfo::new(page as i64, size as i64, total as i64),
        })
    }

    /// 课程的全部学生 ID
    pub async fn list_enrolled_student_ids_impl(&self, subject_id: i64) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .filter(EnrollmentColumn::SubjectId.eq(subject_id))
            .order_by_asc(EnrollmentColumn::StudentId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询选课学生失败: {e}")))
    }

    /// 学生已选课程 ID
    pub async fn list_subject_ids_by_student_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::SubjectId)
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .order_by_asc(EnrollmentColumn::SubjectId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("查询已选课程失败: {e}")))
    }

    /// 课程选课人数
    pub async fn count_enrollments_impl(&self, subject_id: i64) -> Result<i64> {
        let count = Enrollments::find()
            .filter(EnrollmentColumn::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("统计选课人数失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::create_user;

    fn subject(code: &str, teacher_id: Option<i64>) -> CreateSubjectRequest {
        CreateSubjectRequest {
            code: code.to_string(),
            name: format!("{code} name"),
            description: None,
            teacher_id,
        }
    }

    #[actix_web::test]
    async fn test_subject_code_unique() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .create_subject_impl(subject("MATH101", None))
            .await
            .unwrap();
        assert!(
            storage
                .create_subject_impl(subject("MATH101", None))
                .await
                .is_err()
        );
        assert!(
            storage
                .get_subject_by_code_impl("MATH101")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[actix_web::test]
    async fn test_enrollment_lifecycle() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let teacher = create_user(&storage, "teacher1", UserRole::Teacher).await;
        let student = create_user(&storage, "student1", UserRole::Student).await;
        let math = storage
            .create_subject_impl(subject("MATH", Some(teacher)))
            .await
            .unwrap();
        let art = storage
            .create_subject_impl(subject("ART", None))
            .await
            .unwrap();

        storage.enroll_student_impl(math.id, student).await.unwrap();
        // 重复选课违反唯一约束
        assert!(storage.enroll_student_impl(math.id, student).await.is_err());

        assert_eq!(
            storage.list_subject_ids_by_teacher_impl(teacher).await.unwrap(),
            vec![math.id]
        );
        assert_eq!(
            storage.list_subject_ids_by_student_impl(student).await.unwrap(),
            vec![math.id]
        );
        assert_eq!(storage.count_enrollments_impl(math.id).await.unwrap(), 1);

        let visible = storage
            .list_subjects_with_pagination_impl(SubjectListQuery {
                student_id: Some(student),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(visible.items.len(), 1);
        assert_eq!(visible.items[0].id, math.id);

        let all = storage
            .list_subjects_with_pagination_impl(SubjectListQuery::default())
            .await
            .unwrap();
        // 按代码排序
        assert_eq!(all.items[0].id, art.id);

        assert!(storage.unenroll_student_impl(math.id, student).await.unwrap());
        assert!(!storage.unenroll_student_impl(math.id, student).await.unwrap());
        assert!(
            storage
                .get_enrollment_impl(math.id, student)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_delete_subject_cascades_enrollments() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = create_user(&storage, "student2", UserRole::Student).await;
        let bio = storage
            .create_subject_impl(subject("BIO", None))
            .await
            .unwrap();
        storage.enroll_student_impl(bio.id, student).await.unwrap();

        assert!(storage.delete_subject_impl(bio.id).await.unwrap());
        assert!(
            storage
                .list_subject_ids_by_student_impl(student)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
