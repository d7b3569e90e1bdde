//! 路径参数提取器
//!
//! 解析失败时直接返回统一格式的 400 响应，处理函数无需再校验。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ApiResponse, ErrorCode};

static SETTING_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_]+(\.[a-z_]+)+$").expect("Invalid setting key regex"));

fn bad_path_param(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
            ErrorCode::BadRequest,
            message,
        )),
    )
    .into()
}

fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path_param(format!("缺少路径参数: {name}")))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path_param(format!("无效的路径参数 {name}: {raw}"))),
    }
}

macro_rules! define_safe_id {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_i64(req, $param).map($name))
            }
        }
    };
}

define_safe_id!(
    /// `{id}`
    SafeIDI64,
    "id"
);
define_safe_id!(
    /// `{student_id}`
    SafeStudentIdI64,
    "student_id"
);

/// `{key}`，形如 `upload.max_size`
#[derive(Debug, Clone)]
pub struct SafeSettingKey(pub String);

impl FromRequest for SafeSettingKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("key") {
            Some(key) if key.len() <= 64 && SETTING_KEY_RE.is_match(key) => {
                Ok(SafeSettingKey(key.to_string()))
            }
            Some(key) => Err(bad_path_param(format!("无效的配置键: {key}"))),
            None => Err(bad_path_param("缺少路径参数: key".to_string())),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        assert_eq!(SafeIDI64::extract(&req).await.unwrap().0, 42);

        for bad in ["0", "-3", "abc", "1.5"] {
            let req = TestRequest::default().param("id", bad).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err());
        }

        let req = TestRequest::default().param("id", "7").to_http_request();
        assert!(SafeStudentIdI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_setting_key() {
        let req = TestRequest::default()
            .param("key", "upload.max_size")
            .to_http_request();
        assert_eq!(
            SafeSettingKey::extract(&req).await.unwrap().0,
            "upload.max_size"
        );

        let req = TestRequest::default()
            .param("key", "../etc/passwd")
            .to_http_request();
        assert!(SafeSettingKey::extract(&req).await.is_err());
    }
}
