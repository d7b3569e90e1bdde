//! JSON 请求体与查询参数的解析错误处理
//!
//! 注册到 `JsonConfig` / `QueryConfig`，把 actix 默认的纯文本错误换成统一响应。

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON payload error on {}: {}", req.path(), err);

    let response = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            HttpResponse::PayloadTooLarge().json(ApiResponse::<()>::error_empty(
                ErrorCode::PayloadTooLarge,
                "请求体过大",
            ))
        }
        JsonPayloadError::ContentType => HttpResponse::BadRequest().json(
            ApiResponse::<()>::error_empty(ErrorCode::BadRequest, "Content-Type 必须为 application/json"),
        ),
        _ => HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
            ErrorCode::BadRequest,
            format!("请求体格式错误: {err}"),
        )),
    };

    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Query error on {}: {}", req.path(), err);

    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::BadRequest,
        format!("查询参数错误: {err}"),
    ));

    InternalError::from_response(err, response).into()
}
