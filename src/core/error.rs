//! 核心错误处理模块
//!
//! 处理器返回 [`AppError`]，由这里统一生成 `{error: {message, status}}` 响应体，
//! 并在服务端记录诊断信息。

use axum::{
    extract::rejection::{BytesRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::app::products::service::StoreError;

/// 错误种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidRequest,
    NotFound,
    MalformedBody,
    PayloadTooLarge,
    Internal,
}

impl ErrorKind {
    /// 错误种类到 HTTP 状态码的映射表
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation | ErrorKind::InvalidRequest | ErrorKind::MalformedBody => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    /// 查询参数或路径参数无法解析
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    MalformedBody(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::MalformedBody(_) => ErrorKind::MalformedBody,
            AppError::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }

    /// 返回给客户端的消息，内部错误不暴露细节
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn product_not_found(id: &str) -> Self {
        AppError::NotFound(format!("Product with ID {} not found", id))
    }

    /// 按提取器拒绝时声明的状态码归类
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else if status.is_server_error() {
            AppError::Internal(message)
        } else {
            AppError::InvalidRequest(message)
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// 错误响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("请求处理失败: {:?}", self);
        } else {
            warn!("请求被拒绝 ({}): {}", status.as_u16(), self);
        }

        let body = ErrorResponse {
            error: ErrorBody {
                message: self.public_message(),
                status: status.as_u16(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_status_table() {
        assert_eq!(ErrorKind::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::MalformedBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::InvalidRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ErrorKind::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rejection_keeps_declared_status() {
        let err = AppError::from_rejection(StatusCode::PAYLOAD_TOO_LARGE, "too big".to_string());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.public_message(), "too big");

        let err = AppError::from_rejection(StatusCode::BAD_REQUEST, "duplicate field".to_string());
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let err = AppError::from_rejection(StatusCode::INTERNAL_SERVER_ERROR, "no params".to_string());
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn test_internal_message_hidden() {
        let err = AppError::Internal("lock poisoned".to_string());
        assert_eq!(err.public_message(), "Internal Server Error");

        let err = AppError::product_not_found("42");
        assert_eq!(err.public_message(), "Product with ID 42 not found");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::Validation("Missing required fields".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "Missing required fields");
        assert_eq!(body["error"]["status"], 400);
    }
}
