//! 数据模型
//!
//! 每个业务域按 `entities` / `requests` / `responses` 划分，
//! 并通过 ts-rs 导出前端类型定义。

pub mod admin_requests;
pub mod assignments;
pub mod auth;
pub mod common;
pub mod curriculum;
pub mod documents;
pub mod grades;
pub mod messages;
pub mod notifications;
pub mod schedule;
pub mod subjects;
pub mod submissions;
pub mod system;
pub mod tasks;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 `ApiResponse.code` 返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    Conflict = 1004,
    RateLimitExceeded = 1005,
    InternalServerError = 1006,
    PayloadTooLarge = 1007,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,

    // 用户
    UserNotFound = 2100,
    UserNameInvalid = 2101,
    UserEmailInvalid = 2102,
    UserPasswordInvalid = 2103,
    UserNameAlreadyExists = 2104,
    UserEmailAlreadyExists = 2105,
    UserCannotDeleteSelf = 2106,

    // 课程与选课
    SubjectNotFound = 3000,
    SubjectCodeInvalid = 3001,
    SubjectCodeAlreadyExists = 3002,
    SubjectPermissionDenied = 3003,
    EnrollmentAlreadyExists = 3004,
    EnrollmentNotFound = 3005,
    NotEnrolled = 3006,

    // 课表
    ScheduleItemNotFound = 3100,
    ScheduleTimeInvalid = 3101,
    ScheduleConflict = 3102,

    // 作业、提交、成绩
    AssignmentNotFound = 4000,
    SubmissionNotFound = 4100,
    SubmissionAlreadyGraded = 4101,
    GradeNotFound = 4200,
    GradeScoreInvalid = 4201,

    // 事务申请
    RequestNotFound = 5000,
    RequestAlreadyReviewed = 5001,

    // 文档
    FileNotFound = 5100,
    FileUploadFailed = 5101,
    FileTypeNotAllowed = 5102,
    FileSizeExceeded = 5103,
    MultifileUploadNotAllowed = 5104,

    // 私信与通知
    MessageRecipientInvalid = 6000,
    MessageContentInvalid = 6001,
    NotificationNotFound = 6100,

    // 待办与教学计划
    TaskNotFound = 7000,
    CurriculumPlanNotFound = 7100,
    CurriculumPlanStateInvalid = 7101,

    // 系统
    SettingNotFound = 8000,
    SettingValueInvalid = 8001,
}
