//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E2xxx | 权限错误 | E2001 无权限 |
//! | E3xxx | 认证令牌错误 | E3002 无效令牌 |
//! | E9xxx | 系统错误 | E9003 数据库不可用 |
//! | E0xxx | 业务逻辑错误 | E0004 资源冲突 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Item not found"))
//!
//! // 返回成功响应
//! Ok(ok(data))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
///
/// # 错误分类
///
/// | 分类 | 说明 |
/// |------|------|
/// | 认证错误 | 未登录、无效令牌 |
/// | 业务逻辑错误 | 资源不存在、验证失败、状态非法 |
/// | 系统错误 | 数据库错误、数据库不可用、内部错误 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication Errors ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        /// Field-level detail list, e.g. `["name: must not be empty"]`
        fields: Vec<String>,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    /// Datastore unreachable or the operation timed out. Retryable by the
    /// caller with backoff; never retried by the engine itself.
    #[error("Datastore unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            // Authentication errors (401)
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Please login first".to_string(),
                Vec::new(),
            ),
            AppError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "E3002", msg, Vec::new()),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg, Vec::new()),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg, Vec::new()),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg, Vec::new()),

            // Validation (400)
            AppError::Validation { message, fields } => {
                (StatusCode::BAD_REQUEST, "E0002", message, fields)
            }

            // Illegal lifecycle transition (422)
            AppError::InvalidState(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg, Vec::new())
            }

            // Quantity would go negative (422)
            AppError::InsufficientStock(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0007", msg, Vec::new())
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                    Vec::new(),
                )
            }

            // Datastore unavailable (503, retryable)
            AppError::Unavailable(msg) => {
                error!(target: "database", error = %msg, "Datastore unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "E9003",
                    "Datastore unavailable, please retry".to_string(),
                    Vec::new(),
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = Json(AppResponse::<serde_json::Value> {
            code: code.to_string(),
            message,
            data: if details.is_empty() {
                None
            } else {
                Some(serde_json::json!({ "fields": details }))
            },
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict(resource.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Validation error with a field-level detail list
    pub fn validation_fields(message: impl Into<String>, fields: Vec<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields,
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation { message, fields } => AppError::Validation { message, fields },
            RepoError::InvalidState(msg) => AppError::InvalidState(msg),
            RepoError::InsufficientStock(msg) => AppError::InsufficientStock(msg),
            RepoError::Unavailable(msg) => AppError::Unavailable(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_errors_map_to_app_errors() {
        let err: AppError = RepoError::Duplicate("item Rice".into()).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = RepoError::InsufficientStock("quantity".into()).into();
        assert!(matches!(err, AppError::InsufficientStock(_)));

        let err: AppError = RepoError::Unavailable("timed out".into()).into();
        assert!(matches!(err, AppError::Unavailable(_)));
    }

    #[test]
    fn validation_keeps_field_details() {
        let err = AppError::validation_fields(
            "Invalid input data",
            vec!["name: must not be empty".into()],
        );
        match err {
            AppError::Validation { fields, .. } => assert_eq!(fields.len(), 1),
            _ => panic!("expected validation error"),
        }
    }
}
