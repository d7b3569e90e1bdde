//! 集成测试共用工具
//!
//! 每个测试使用独立的内存 SQLite 与 moka 缓存，互不影响。

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header::AUTHORIZATION};
use actix_web::test::{self, TestRequest};
use serde_json::Value;
use std::sync::Arc;

use eduportal::cache::ObjectCache;
use eduportal::cache::object_cache::moka::MokaCacheWrapper;
use eduportal::models::users::entities::{User, UserRole};
use eduportal::models::users::requests::CreateUserRequest;
use eduportal::storage::{SeaOrmStorage, Storage};
use eduportal::utils::password::hash_password;

/// 测试用户统一使用的密码
pub const TEST_PASSWORD: &str = "Classr00m!";

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

pub async fn setup() -> TestContext {
    let storage = SeaOrmStorage::in_memory()
        .await
        .expect("in-memory storage");
    let cache = MokaCacheWrapper::new().expect("moka cache");
    TestContext {
        storage: Arc::new(storage),
        cache: Arc::new(cache),
    }
}

/// 用完整路由表构建测试服务
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                .app_data(actix_web::web::Data::new($ctx.cache.clone()))
                .app_data(actix_web::web::Data::new(eduportal::models::AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(eduportal::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(eduportal::utils::query_error_handler),
                )
                .configure(eduportal::routes::configure_api_routes),
        )
        .await
    };
}

/// 直接写库创建用户并签发 access token
pub async fn create_user(ctx: &TestContext, username: &str, role: UserRole) -> (User, String) {
    let user = ctx
        .storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.edu"),
            password: hash_password(TEST_PASSWORD).expect("hash password"),
            role,
            display_name: Some(username.to_string()),
            avatar_url: None,
        })
        .await
        .expect("create user");
    let token = user
        .generate_token_pair(chrono::Duration::minutes(30), chrono::Duration::days(1))
        .expect("token pair")
        .access_token;
    (user, token)
}

pub fn authed(request: TestRequest, token: &str) -> TestRequest {
    request.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}

pub fn get(uri: &str, token: &str) -> TestRequest {
    authed(TestRequest::get().uri(uri), token)
}

pub fn post(uri: &str, token: &str, body: Value) -> TestRequest {
    authed(TestRequest::post().uri(uri), token).set_json(body)
}

pub fn put(uri: &str, token: &str, body: Value) -> TestRequest {
    authed(TestRequest::put().uri(uri), token).set_json(body)
}

pub fn delete(uri: &str, token: &str) -> TestRequest {
    authed(TestRequest::delete().uri(uri), token)
}

/// 发送请求，得到 `(StatusCode, serde_json::Value)`
macro_rules! send {
    ($app:expr, $req:expr) => {
        $crate::common::read_json(
            actix_web::test::call_service(&$app, $req.to_request()).await,
        )
        .await
    };
}

/// 空响应体返回 Null
pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
