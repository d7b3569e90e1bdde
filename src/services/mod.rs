pub mod assignments;
pub mod auth;
pub mod curriculum;
pub mod documents;
pub mod grades;
pub mod messages;
pub mod notifications;
pub mod permissions;
pub mod requests;
pub mod schedule;
pub mod subjects;
pub mod submissions;
pub mod system;
pub mod tasks;
pub mod users;
pub mod websocket;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use curriculum::CurriculumService;
pub use documents::DocumentService;
pub use grades::GradeService;
pub use messages::MessageService;
pub use notifications::NotificationService;
pub use requests::AdminRequestService;
pub use schedule::ScheduleService;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use tasks::TaskService;
pub use users::UserService;
pub use websocket::{ConnectionManager, WebSocketService};
