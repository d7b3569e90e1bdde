//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_eduportal_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EduPortalError {
            $($variant(String),)*
        }

        impl EduPortalError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EduPortalError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EduPortalError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EduPortalError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EduPortalError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EduPortalError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_eduportal_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    StoragePluginNotFound("E010", "Storage Plugin Not Found"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Resource Conflict"),
    Configuration("E015", "Configuration Error"),
}

impl EduPortalError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 数据库唯一约束冲突（SQLite / PostgreSQL / MySQL 的报错文本）
    pub fn is_unique_violation(&self) -> bool {
        match self {
            EduPortalError::Conflict(_) => true,
            EduPortalError::DatabaseOperation(msg) => {
                msg.contains("UNIQUE constraint failed")
                    || msg.contains("duplicate key value")
                    || msg.contains("Duplicate entry")
            }
            _ => false,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EduPortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EduPortalError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EduPortalError {
    fn from(err: sea_orm::DbErr) -> Self {
        EduPortalError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EduPortalError {
    fn from(err: std::io::Error) -> Self {
        EduPortalError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EduPortalError {
    fn from(err: serde_json::Error) -> Self {
        EduPortalError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EduPortalError {
    fn from(err: chrono::ParseError) -> Self {
        EduPortalError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EduPortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EduPortalError::cache_connection("test").code(), "E001");
        assert_eq!(EduPortalError::database_config("test").code(), "E003");
        assert_eq!(EduPortalError::validation("test").code(), "E007");
        assert_eq!(EduPortalError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EduPortalError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            EduPortalError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EduPortalError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_from_db_err() {
        let err: EduPortalError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_conflict_error() {
        let err = EduPortalError::conflict("duplicate enrollment");
        assert_eq!(err.code(), "E014");
        assert_eq!(err.error_type(), "Resource Conflict");
    }

    #[test]
    fn test_unique_violation_detection() {
        let err = EduPortalError::database_operation(
            "创建用户失败: UNIQUE constraint failed: users.username",
        );
        assert!(err.is_unique_violation());
        assert!(EduPortalError::conflict("x").is_unique_violation());
        assert!(!EduPortalError::database_operation("timeout").is_unique_violation());
    }

    #[test]
    fn test_format_simple() {
        let err = EduPortalError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
