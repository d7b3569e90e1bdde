use std::sync::Arc;

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
        entities::SystemSetting,
        requests::SettingAuditQuery,
        responses::SettingAuditListResponse,
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

use crate::errors::Result;

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的值）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>>;
    async fn get_subjects_by_ids(&self, ids: &[i64]) -> Result<Vec<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;
    // 教师任课的课程 ID
    async fn list_subject_ids_by_teacher(&self, teacher_id: i64) -> Result<Vec<i64>>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 选课方法
    async fn enroll_student(&self, subject_id: i64, student_id: i64) -> Result<Enrollment>;
    async fn unenroll_student(&self, subject_id: i64, student_id: i64) -> Result<bool>;
    async fn get_enrollment(&self, subject_id: i64, student_id: i64)
    -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        subject_id: i64,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<PaginatedResponse<Enrollment>>;
    async fn list_enrolled_student_ids(&self, subject_id: i64) -> Result<Vec<i64>>;
    // 学生已选课程 ID
    async fn list_subject_ids_by_student(&self, student_id: i64) -> Result<Vec<i64>>;
    async fn count_enrollments(&self, subject_id: i64) -> Result<i64>;

    /// 课表方法
    async fn create_schedule_item(&self, item: CreateScheduleItemRequest) -> Result<ScheduleItem>;
    async fn get_schedule_item_by_id(&self, id: i64) -> Result<Option<ScheduleItem>>;
    // 按 day_of_week、start_time 排序
    async fn list_schedule_items(&self, query: ScheduleQuery) -> Result<Vec<ScheduleItem>>;
    async fn update_schedule_item(
        &self,
        id: i64,
        update: UpdateScheduleItemRequest,
    ) -> Result<Option<ScheduleItem>>;
    async fn delete_schedule_item(&self, id: i64) -> Result<bool>;

    /// 作业方法
    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 提交方法
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 重新提交，已批改的提交不会被覆盖
    async fn resubmit_submission(
        &self,
        id: i64,
        content: String,
        document_id: Option<i64>,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>>;
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<Submission>>;

    /// 成绩方法
    async fn create_grade(&self, grade: NewGrade) -> Result<Grade>;
    // 在同一事务里写成绩并将提交标记为已批改
    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: NewGrade,
    ) -> Result<Option<(Submission, Grade)>>;
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>>;
    async fn list_grades_with_pagination(&self, query: GradeListQuery)
    -> Result<GradeListResponse>;
    // 统计报表用，不分页
    async fn list_grades_for_report(&self, subject_ids: Option<Vec<i64>>) -> Result<Vec<Grade>>;
    async fn update_grade(&self, id: i64, update: UpdateGradeRequest) -> Result<Option<Grade>>;
    async fn delete_grade(&self, id: i64) -> Result<bool>;

    /// 事务申请方法
    async fn create_admin_request(
        &self,
        requester_id: i64,
        request: CreateAdminRequest,
    ) -> Result<AdminRequest>;
    async fn get_admin_request_by_id(&self, id: i64) -> Result<Option<AdminRequest>>;
    async fn list_admin_requests_with_pagination(
        &self,
        query: AdminRequestListQuery,
    ) -> Result<PaginatedResponse<AdminRequest>>;
    // 仅当申请仍处于 pending 时生效
    async fn review_admin_request(
        &self,
        id: i64,
        reviewer_id: i64,
        status: RequestStatus,
        comment: Option<String>,
    ) -> Result<Option<AdminRequest>>;
    // 仅删除 pending 状态的申请
    async fn delete_pending_admin_request(&self, id: i64) -> Result<bool>;

    /// 文档方法
    async fn create_document(&self, document: NewDocument) -> Result<Document>;
    async fn get_document_by_id(&self, id: i64) -> Result<Option<Document>>;
    async fn list_documents_with_pagination(
        &self,
        query: DocumentListQuery,
    ) -> Result<DocumentListResponse>;
    async fn delete_document(&self, id: i64) -> Result<bool>;

    /// 私信方法
    async fn create_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: String,
    ) -> Result<Message>;
    async fn get_messages_by_ids(&self, ids: &[i64]) -> Result<Vec<Message>>;
    // 按写入顺序返回待投递消息
    async fn list_undelivered_messages(&self, recipient_id: i64) -> Result<Vec<Message>>;
    async fn mark_messages_delivered(&self, ids: &[i64]) -> Result<u64>;
    // 按 id 倒序返回最多 limit 条
    async fn list_conversation_messages(
        &self,
        user_id: i64,
        partner_id: i64,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<Message>>;
    async fn list_conversation_stats(&self, user_id: i64) -> Result<Vec<ConversationStat>>;
    async fn mark_conversation_read(&self, reader_id: i64, partner_id: i64) -> Result<u64>;
    async fn count_unread_messages(&self, user_id: i64) -> Result<i64>;

    /// 通知方法
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification>;
    async fn create_notifications_batch(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<Vec<Notification>>;
    async fn get_notification_by_id(&self, id: i64) -> Result<Option<Notification>>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_as_read(&self, id: i64) -> Result<bool>;
    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64>;
    async fn delete_notification(&self, id: i64) -> Result<bool>;

    /// 待办任务方法
    async fn create_task(&self, task: NewTask) -> Result<Task>;
    async fn get_task_by_id(&self, id: i64) -> Result<Option<Task>>;
    async fn list_tasks_with_pagination(&self, query: TaskListQuery) -> Result<TaskListResponse>;
    async fn update_task(&self, id: i64, update: UpdateTaskRequest) -> Result<Option<Task>>;
    async fn delete_task(&self, id: i64) -> Result<bool>;

    /// 教学计划方法
    async fn create_curriculum_plan(&self, plan: NewCurriculumPlan) -> Result<CurriculumPlan>;
    async fn get_curriculum_plan_by_id(&self, id: i64) -> Result<Option<CurriculumPlan>>;
    async fn list_curriculum_plans_with_pagination(
        &self,
        query: CurriculumPlanListQuery,
    ) -> Result<CurriculumPlanListResponse>;
    async fn update_curriculum_plan(
        &self,
        id: i64,
        update: UpdateCurriculumPlanRequest,
    ) -> Result<Option<CurriculumPlan>>;
    // 条件更新：仅当当前状态为 from 时流转到 to，返回 None 表示状态已变化
    async fn transition_curriculum_plan(
        &self,
        id: i64,
        from: PlanStatus,
        to: PlanStatus,
        review: Option<(i64, Option<String>)>,
    ) -> Result<Option<CurriculumPlan>>;
    async fn delete_curriculum_plan(&self, id: i64) -> Result<bool>;

    /// 系统设置方法
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>>;
    async fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>>;
    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>>;
    async fn list_setting_audits(&self, query: SettingAuditQuery)
    -> Result<SettingAuditListResponse>;
}

/// 根据配置创建存储实例
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
