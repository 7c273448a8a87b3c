//! 核心模块：错误处理、响应、中间件与拦截器

pub mod auth;
pub mod error;
pub mod interceptor;
pub mod middleware;
pub mod rate_limit;
pub mod response;

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};

/// 客户端地址；服务未记录连接信息时统一归为 `unknown`
pub fn client_addr(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
