use crate::config::AppConfig;
use crate::errors::EduPortalError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// Argon2id 哈希，参数取自配置
pub fn hash_password(password: &str) -> Result<String, EduPortalError> {
    let config = &AppConfig::get().argon2;
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| EduPortalError::configuration(format!("Argon2 参数错误: {e}")))?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| EduPortalError::validation(format!("密码哈希失败: {e}")))
}

/// 校验密码，参数从哈希串本身读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Correct7Horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Correct7Horse", &hash));
        assert!(!verify_password("correct7horse", &hash));
        assert!(!verify_password("Correct7Horse", "not-a-hash"));
    }
}
