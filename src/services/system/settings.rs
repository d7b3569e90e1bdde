use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::str::FromStr;
use tracing::info;

use super::{DynamicConfig, SystemService};
use crate::models::{
    ApiResponse, ErrorCode,
    system::{
        entities::{KnownSettingKey, SettingValueType},
        requests::{SettingAuditQuery, UpdateSettingRequest},
        responses::{AdminSettingsListResponse, SettingResponse, SystemSettingsResponse},
    },
};
use crate::services::permissions::{current_user, internal_error};

/// 获取公开系统设置（只读）
pub async fn get_settings(
    service: &SystemService,
    _req: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let response = SystemSettingsResponse {
        system_name: DynamicConfig::system_name().await,
        max_file_size: DynamicConfig::upload_max_size().await as u64,
        allowed_file_types: DynamicConfig::upload_allowed_types().await,
        environment: config.app.environment.clone(),
        log_level: config.app.log_level.clone(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Settings retrieved successfully",
    )))
}

/// 获取所有管理员配置
pub async fn list_admin_settings(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_all_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdminSettingsListResponse { settings },
            "Admin settings retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("获取配置列表失败", e)),
    }
}

/// 按键的类型校验取值，整数配置必须为正
pub fn validate_setting_value(key: &KnownSettingKey, value: &str) -> Result<(), String> {
    let value_type = key.value_type();
    value_type.validate(value)?;
    match value_type {
        SettingValueType::Integer if value.parse::<i64>().is_ok_and(|v| v <= 0) => {
            Err(format!("{} must be a positive integer", key.as_str()))
        }
        SettingValueType::String if value.trim().is_empty() => {
            Err(format!("{} cannot be empty", key.as_str()))
        }
        SettingValueType::JsonArray
            if serde_json::from_str::<Vec<String>>(value).is_err() =>
        {
            Err(format!("{} must be a JSON array of strings", key.as_str()))
        }
        _ => Ok(()),
    }
}

/// 更新单个配置，写审计记录并刷新运行期配置
pub async fn update_setting(
    service: &SystemService,
    key: String,
    body: UpdateSettingRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let known = match KnownSettingKey::from_str(&key) {
        Ok(known) => known,
        Err(msg) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::SettingNotFound, msg)));
        }
    };
    if let Err(msg) = validate_setting_value(&known, &body.value) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SettingValueInvalid, msg)));
    }

    // 获取客户端 IP
    let ip_address = request
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    let storage = service.get_storage(request);
    let setting = match storage
        .update_setting(&key, &body.value, user.id, ip_address)
        .await
    {
        Ok(Some(setting)) => setting,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SettingNotFound,
                format!("Setting {key} not found"),
            )));
        }
        Err(e) => return Ok(internal_error("更新配置失败", e)),
    };

    DynamicConfig::update(&key, &body.value).await;
    info!("Setting {} updated by {}", key, user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SettingResponse { setting },
        "Setting updated successfully",
    )))
}

/// 获取审计日志
pub async fn list_setting_audits(
    service: &SystemService,
    query: SettingAuditQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_setting_audits(query).await {
        Ok(audits) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            audits,
            "Setting audits retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("获取审计日志失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_setting_value() {
        assert!(validate_setting_value(&KnownSettingKey::UploadMaxSize, "1048576").is_ok());
        assert!(validate_setting_value(&KnownSettingKey::UploadMaxSize, "0").is_err());
        assert!(validate_setting_value(&KnownSettingKey::UploadMaxSize, "big").is_err());
        assert!(validate_setting_value(&KnownSettingKey::SystemName, "  ").is_err());
        assert!(validate_setting_value(&KnownSettingKey::CorsAllowedOrigins, r#"["*"]"#).is_ok());
        assert!(validate_setting_value(&KnownSettingKey::UploadAllowedTypes, "[1, 2]").is_err());
    }
}
