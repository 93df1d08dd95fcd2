//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义，与 HTTP 状态码一致
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const BAD_GATEWAY: i32 = 502;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
    pub const GATEWAY_TIMEOUT: i32 = 504;
}

/// API 错误
///
/// 消息会直接返回给前端，构造时只能放面向用户的文本
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    BadGateway(String),
    ServiceUnavailable(String),
    GatewayTimeout(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, i32, &str) {
        let (status, code, msg) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, errno::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, errno::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, errno::BAD_GATEWAY, msg),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                errno::SERVICE_UNAVAILABLE,
                msg,
            ),
            ApiError::GatewayTimeout(msg) => {
                (StatusCode::GATEWAY_TIMEOUT, errno::GATEWAY_TIMEOUT, msg)
            }
        };
        (status, code, msg.as_str())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, msg) = self.parts();

        if status.is_server_error() {
            tracing::error!(errno = code, error = %msg, "Request failed");
        } else {
            tracing::warn!(errno = code, error = %msg, "Request rejected");
        }

        (status, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        // 详细原因只进日志
        tracing::debug!(error = %e, "Mapping application error");

        let message = e.public_message();
        match e {
            ApplicationError::NotFound { .. } => ApiError::NotFound(message),
            ApplicationError::ValidationError(_) => ApiError::BadRequest(message),
            ApplicationError::NarrativeGeneration(_) => ApiError::BadGateway(message),
            ApplicationError::DeadlineExceeded(_) => ApiError::GatewayTimeout(message),
            ApplicationError::QueueUnavailable(_) => ApiError::ServiceUnavailable(message),
        }
    }
}
