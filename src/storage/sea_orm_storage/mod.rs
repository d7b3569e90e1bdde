//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod admin_requests;
mod assignments;
mod curriculum;
mod documents;
mod grades;
mod messages;
mod notifications;
mod schedule;
mod subjects;
mod submissions;
mod system_settings;
mod tasks;
mod users;

use crate::config::AppConfig;
use crate::errors::{EduPortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EduPortalError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        // 内存库只存在于单个连接上
        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EduPortalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(pool_size.max(1))
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(timeout))
            .connect_with(opt)
            .await
            .map_err(|e| EduPortalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EduPortalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EduPortalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 单连接内存库，测试使用
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1, 5).await
    }
}

/// 通用分页参数，page 从 1 开始
pub(crate) fn page_params(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let (page, size) = crate::models::common::pagination::normalize_page(page, size);
    (page as u64, size as u64)
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    admin_requests::{
        entities::{AdminRequest, RequestStatus},
        requests::{AdminRequestListQuery, CreateAdminRequest},
    },
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    curriculum::{
        entities::{CurriculumPlan, PlanStatus},
        requests::{CurriculumPlanListQuery, NewCurriculumPlan, UpdateCurriculumPlanRequest},
        responses::CurriculumPlanListResponse,
    },
    documents::{
        entities::Document,
        requests::{DocumentListQuery, NewDocument},
        responses::DocumentListResponse,
    },
    grades::{
        entities::Grade,
        requests::{GradeListQuery, NewGrade, UpdateGradeRequest},
        responses::GradeListResponse,
    },
    messages::{entities::Message, responses::ConversationStat},
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    schedule::{
        entities::ScheduleItem,
        requests::{CreateScheduleItemRequest, ScheduleQuery, UpdateScheduleItemRequest},
    },
    subjects::{
        entities::{Enrollment, Subject},
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{NewSubmission, SubmissionListQuery},
    },
    system::{
        entities::SystemSetting, requests::SettingAuditQuery, responses::SettingAuditListResponse,
    },
    tasks::{
        entities::Task,
        requests::{NewTask, TaskListQuery, UpdateTaskRequest},
        responses::TaskListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(code).await
    }

    async fn get_subjects_by_ids(&self, ids: &[i64]) -> Result<Vec<Subject>> {
        self.get_subjects_by_ids_impl(ids).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn list_subject_ids_by_teacher(&self, teacher_id: i64) -> Result<Vec<i64>> {
        self.list_subject_ids_by_teacher_impl(teacher_id).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 选课模块
    async fn enroll_student(&self, subject_id: i64, student_id: i64) -> Result<Enrollment> {
        self.enroll_student_impl(subject_id, student_id).await
    }

    async fn unenroll_student(&self, subject_id: i64, student_id: i64) -> Result<bool> {
        self.unenroll_student_impl(subject_id, student_id).await
    }

    async fn get_enrollment(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(subject_id, student_id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        subject_id: i64,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<PaginatedResponse<Enrollment>> {
        self.list_enrollments_with_pagination_impl(subject_id, page, size)
            .await
    }

    async fn list_enrolled_student_ids(&self, subject_id: i64) -> Result<Vec<i64>> {
        self.list_enrolled_student_ids_impl(subject_id).await
    }

    async fn list_subject_ids_by_student(&self, student_id: i64) -> Result<Vec<i64>> {
        self.list_subject_ids_by_student_impl(student_id).await
    }

    async fn count_enrollments(&self, subject_id: i64) -> Result<i64> {
        self.count_enrollments_impl(subject_id).await
    }

    // 课表模块
    async fn create_schedule_item(&self, item: CreateScheduleItemRequest) -> Result<ScheduleItem> {
        self.create_schedule_item_impl(item).await
    }

    async fn get_schedule_item_by_id(&self, id: i64) -> Result<Option<ScheduleItem>> {
        self.get_schedule_item_by_id_impl(id).await
    }

    async fn list_schedule_items(&self, query: ScheduleQuery) -> Result<Vec<ScheduleItem>> {
        self.list_schedule_items_impl(query).await
    }

    async fn update_schedule_item(
        &self,
        id: i64,
        update: UpdateScheduleItemRequest,
    ) -> Result<Option<ScheduleItem>> {
        self.update_schedule_item_impl(id, update).await
    }

    async fn delete_schedule_item(&self, id: i64) -> Result<bool> {
        self.delete_schedule_item_impl(id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_assignment_and_student_impl(assignment_id, student_id)
            .await
    }

    async fn resubmit_submission(
        &self,
        id: i64,
        content: String,
        document_id: Option<i64>,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>> {
        self.resubmit_submission_impl(id, content, document_id, status)
            .await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>> {
        self.list_submissions_with_pagination_impl(query).await
    }

    // 成绩模块
    async fn create_grade(&self, grade: NewGrade) -> Result<Grade> {
        self.create_grade_impl(grade).await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: NewGrade,
    ) -> Result<Option<(Submission, Grade)>> {
        self.grade_submission_impl(submission_id, grade).await
    }

    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_submission_id_impl(submission_id).await
    }

    async fn list_grades_with_pagination(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        self.list_grades_with_pagination_impl(query).await
    }

    async fn list_grades_for_report(&self, subject_ids: Option<Vec<i64>>) -> Result<Vec<Grade>> {
        self.list_grades_for_report_impl(subject_ids).await
    }

    async fn update_grade(&self, id: i64, update: UpdateGradeRequest) -> Result<Option<Grade>> {
        self.update_grade_impl(id, update).await
    }

    async fn delete_grade(&self, id: i64) -> Result<bool> {
        self.delete_grade_impl(id).await
    }

    // 事务申请模块
    async fn create_admin_request(
        &self,
        requester_id: i64,
        request: CreateAdminRequest,
    ) -> Result<AdminRequest> {
        self.create_admin_request_impl(requester_id, request).await
    }

    async fn get_admin_request_by_id(&self, id: i64) -> Result<Option<AdminRequest>> {
        self.get_admin_request_by_id_impl(id).await
    }

    async fn list_admin_requests_with_pagination(
        &self,
        query: AdminRequestListQuery,
    ) -> Result<PaginatedResponse<AdminRequest>> {
        self.list_admin_requests_with_pagination_impl(query).await
    }

    async fn review_admin_request(
        &self,
        id: i64,
        reviewer_id: i64,
        status: RequestStatus,
        comment: Option<String>,
    ) -> Result<Option<AdminRequest>> {
        self.review_admin_request_impl(id, reviewer_id, status, comment)
            .await
    }

    async fn delete_pending_admin_request(&self, id: i64) -> Result<bool> {
        self.delete_pending_admin_request_impl(id).await
    }

    // 文档模块
    async fn create_document(&self, document: NewDocument) -> Result<Document> {
        self.create_document_impl(document).await
    }

    async fn get_document_by_id(&self, id: i64) -> Result<Option<Document>> {
        self.get_document_by_id_impl(id).await
    }

    async fn list_documents_with_pagination(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse> {
        self.list_documents_with_pagination_impl(query).await
    }

    async fn delete_document(&self, id: i64) -> Result<bool> {
        self.delete_document_impl(id).await
    }

    // 私信模块
    async fn create_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: String,
    ) -> Result<Message> {
        self.create_message_impl(sender_id, recipient_id, content)
            .await
    }

    async fn get_messages_by_ids(&self, ids: &[i64]) -> Result<Vec<Message>> {
        self.get_messages_by_ids_impl(ids).await
    }

    async fn list_undelivered_messages(&self, recipient_id: i64) -> Result<Vec<Message>> {
        self.list_undelivered_messages_impl(recipient_id).await
    }

    async fn mark_messages_delivered(&self, ids: &[i64]) -> Result<u64> {
        self.mark_messages_delivered_impl(ids).await
    }

    async fn list_conversation_messages(
        &self,
        user_id: i64,
        partner_id: i64,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<Message>> {
        self.list_conversation_messages_impl(user_id, partner_id, before_id, limit)
            .await
    }

    async fn list_conversation_stats(&self, user_id: i64) -> Result<Vec<ConversationStat>> {
        self.list_conversation_stats_impl(user_id).await
    }

    async fn mark_conversation_read(&self, reader_id: i64, partner_id: i64) -> Result<u64> {
        self.mark_conversation_read_impl(reader_id, partner_id)
            .await
    }

    async fn count_unread_messages(&self, user_id: i64) -> Result<i64> {
        self.count_unread_messages_impl(user_id).await
    }

    // 通知模块
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification> {
        self.create_notification_impl(req).await
    }

    async fn create_notifications_batch(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<Vec<Notification>> {
        self.create_notifications_batch_impl(reqs).await
    }

    async fn get_notification_by_id(&self, id: i64) -> Result<Option<Notification>> {
        self.get_notification_by_id_impl(id).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query)
            .await
    }

    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64> {
        self.get_unread_notification_count_impl(user_id).await
    }

    async fn mark_notification_as_read(&self, id: i64) -> Result<bool> {
        self.mark_notification_as_read_impl(id).await
    }

    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_as_read_impl(user_id).await
    }

    async fn delete_notification(&self, id: i64) -> Result<bool> {
        self.delete_notification_impl(id).await
    }

    // 待办任务模块
    async fn create_task(&self, task: NewTask) -> Result<Task> {
        self.create_task_impl(task).await
    }

    async fn get_task_by_id(&self, id: i64) -> Result<Option<Task>> {
        self.get_task_by_id_impl(id).await
    }

    async fn list_tasks_with_pagination(&self, query: TaskListQuery) -> Result<TaskListResponse> {
        self.list_tasks_with_pagination_impl(query).await
    }

    async fn update_task(&self, id: i64, update: UpdateTaskRequest) -> Result<Option<Task>> {
        self.update_task_impl(id, update).await
    }

    async fn delete_task(&self, id: i64) -> Result<bool> {
        self.delete_task_impl(id).await
    }

    // 教学计划模块
    async fn create_curriculum_plan(&self, plan: NewCurriculumPlan) -> Result<CurriculumPlan> {
        self.create_curriculum_plan_impl(plan).await
    }

    async fn get_curriculum_plan_by_id(&self, id: i64) -> Result<Option<CurriculumPlan>> {
        self.get_curriculum_plan_by_id_impl(id).await
    }

    async fn list_curriculum_plans_with_pagination(
        &self,
        query: CurriculumPlanListQuery,
    ) -> Result<CurriculumPlanListResponse> {
        self.list_curriculum_plans_with_pagination_impl(query).await
    }

    async fn update_curriculum_plan(
        &self,
        id: i64,
        update: UpdateCurriculumPlanRequest,
    ) -> Result<Option<CurriculumPlan>> {
        self.update_curriculum_plan_impl(id, update).await
    }

    async fn transition_curriculum_plan(
        &self,
        id: i64,
        from: PlanStatus,
        to: PlanStatus,
        review: Option<(i64, Option<String>)>,
    ) -> Result<Option<CurriculumPlan>> {
        self.transition_curriculum_plan_impl(id, from, to, review)
            .await
    }

    async fn delete_curriculum_plan(&self, id: i64) -> Result<bool> {
        self.delete_curriculum_plan_impl(id).await
    }

    // 系统设置模块
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_all_settings_impl().await
    }

    async fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>> {
        self.get_setting_by_key_impl(key).await
    }

    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>> {
        self.update_setting_impl(key, value, user_id, ip_address)
            .await
    }

    async fn list_setting_audits(
        &self,
        query: SettingAuditQuery,
    ) -> Result<SettingAuditListResponse> {
        self.list_setting_audits_impl(query).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    /// 创建测试用户，返回 ID
    pub async fn create_user(storage: &SeaOrmStorage, name: &str, role: UserRole) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                username: name.to_string(),
                email: format!("{name}@school.test"),
                password: "hashed".to_string(),
                role,
                display_name: None,
                avatar_url: None,
            })
            .await
            .unwrap()
            .id
    }

    /// 创建测试课程，返回 ID
    pub async fn create_subject(
        storage: &SeaOrmStorage,
        code: &str,
        teacher_id: Option<i64>,
    ) -> i64 {
        storage
            .create_subject_impl(crate::models::subjects::requests::CreateSubjectRequest {
                code: code.to_string(),
                name: format!("{code} name"),
                description: None,
                teacher_id,
            })
            .await
            .unwrap()
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("eduportal.db").unwrap(),
            "sqlite://eduportal.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").unwrap(),
            "postgres://u:p@localhost/db"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }

    #[test]
    fn test_page_params() {
        assert_eq!(page_params(None, None), (1, 10));
        assert_eq!(page_params(Some(3), Some(500)), (3, 100));
    }
}
