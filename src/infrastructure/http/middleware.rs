//! HTTP Middleware
//!
//! HTTP 状态码错误日志中间件

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// HTTP 状态码错误日志中间件
///
/// 4xx 记 warn，5xx 记 error，并附带处理耗时。
/// 同步生成接口可能耗时数分钟，耗时字段便于排查上游慢请求
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "Request failed with server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "Request rejected"
        );
    } else {
        tracing::debug!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "Request completed"
        );
    }

    response
}
