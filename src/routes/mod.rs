pub mod auth;

pub mod users;

pub mod subjects;

pub mod schedule;

pub mod assignments;

pub mod submissions;

pub mod grades;

pub mod requests;

pub mod documents;

pub mod messages;

pub mod notifications;

pub mod tasks;

pub mod curriculum;

pub mod system;

pub mod websocket;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use curriculum::configure_curriculum_routes;
pub use documents::configure_document_routes;
pub use grades::configure_grade_routes;
pub use messages::configure_message_routes;
pub use notifications::configure_notification_routes;
pub use requests::configure_request_routes;
pub use schedule::configure_schedule_routes;
pub use subjects::configure_subject_routes;
pub use submissions::configure_submission_routes;
pub use system::configure_system_routes;
pub use tasks::configure_task_routes;
pub use users::configure_user_routes;
pub use websocket::configure_websocket_routes;

use actix_web::web;

/// 注册全部 API 路由，服务器与集成测试共用
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_subject_routes(cfg);
    configure_schedule_routes(cfg);
    configure_assignment_routes(cfg);
    configure_submission_routes(cfg);
    configure_grade_routes(cfg);
    configure_request_routes(cfg);
    configure_document_routes(cfg);
    configure_message_routes(cfg);
    configure_notification_routes(cfg);
    configure_task_routes(cfg);
    configure_curriculum_routes(cfg);
    configure_system_routes(cfg);
    configure_websocket_routes(cfg);
}
