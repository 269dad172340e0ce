use crate::error::{AppError, AppResult};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;

/// 校验用户名（去除首尾空白后 3-32 个字符），返回规范化后的用户名
pub fn validate_username(username: &str) -> AppResult<String> {
    let trimmed = username.trim();
    let len = trimmed.chars().count();

    if len < USERNAME_MIN_LEN || len > USERNAME_MAX_LEN {
        return Err(AppError::ValidationError(format!(
            "Username length must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        )));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(AppError::ValidationError(
            "Username must not contain control characters".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}
