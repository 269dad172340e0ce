use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No spins left")]
    NoSpinsLeft,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerdeJsonError(err.to_string())
    }
}

impl AppError {
    /// 错误码（与 HTTP 响应中的 `error.code` 一致）
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::NoSpinsLeft => "NO_SPINS_LEFT",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Text shown to the player when an operation is rejected.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::NoSpinsLeft => "You have no spins left".to_string(),
            AppError::ValidationError(msg) => msg.clone(),
            AppError::AuthError(msg) => msg.clone(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AppError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            AppError::NoSpinsLeft => actix_web::http::StatusCode::CONFLICT,
            AppError::ValidationError(_) => actix_web::http::StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                msg.clone()
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                msg.clone()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::NoSpinsLeft => {
                log::warn!("Spin rejected: no spins left");
                self.user_message()
            }
            _ => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("User not found".into()).status_code(),
            actix_web::http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NoSpinsLeft.status_code(),
            actix_web::http::StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InternalError("boom".into()).status_code(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_user_message_hides_internal_details() {
        let msg = AppError::InternalError("lock poisoned".into()).user_message();
        assert!(!msg.contains("lock"));
        assert_eq!(AppError::NoSpinsLeft.user_message(), "You have no spins left");
    }

    #[test]
    fn test_malformed_json_maps_to_internal_error() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::SerdeJsonError(_)));
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
