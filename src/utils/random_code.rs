use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成随机初始密码，保证含大小写字母与数字
pub fn generate_initial_password(len: usize) -> String {
    let len = len.max(8);
    let mut rng = rand::rng();

    loop {
        let candidate: String = (0..len)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect();
        if candidate.chars().any(|c| c.is_ascii_uppercase())
            && candidate.chars().any(|c| c.is_ascii_lowercase())
            && candidate.chars().any(|c| c.is_ascii_digit())
        {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_initial_password_passes_policy() {
        for _ in 0..20 {
            let password = generate_initial_password(16);
            assert_eq!(password.len(), 16);
            assert!(validate_password(&password).is_valid);
        }
        assert_eq!(generate_initial_password(3).len(), 8);
    }
}
