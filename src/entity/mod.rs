//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间统一以 unix 秒存储。

pub mod prelude;

pub mod assignments;
pub mod curriculum_plans;
pub mod documents;
pub mod enrollments;
pub mod grades;
pub mod messages;
pub mod notifications;
pub mod requests;
pub mod schedule_items;
pub mod subjects;
pub mod submissions;
pub mod system_settings;
pub mod system_settings_audit;
pub mod tasks;
pub mod users;

use chrono::{DateTime, Utc};

/// unix 秒转 UTC 时间，非法值落到纪元零点
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
