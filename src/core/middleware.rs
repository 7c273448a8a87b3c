//! 核心中间件模块

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info};

/// 请求日志中间件
///
/// 在任何处理之前记录时间戳、方法和路径，所有请求（包括未匹配的路由）都会记录。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    info!(
        "[{}] {} {}",
        chrono::Utc::now().to_rfc3339(),
        method,
        uri
    );

    let response = next.run(req).await;

    debug!(
        "{} {} - {} - {}ms",
        method,
        uri.path(),
        response.status(),
        start.elapsed().as_millis()
    );

    response
}
