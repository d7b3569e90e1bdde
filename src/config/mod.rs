mod r#impl;
mod structs;

pub use structs::*;

/// 开发环境默认 JWT 密钥，生产环境禁止使用
pub const DEFAULT_JWT_SECRET: &str = "eduportal-development-secret-change-me";
