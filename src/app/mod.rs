//! 应用路由装配
//!
//! 中间件顺序（由外到内）：CORS → 追踪 → JSON 请求体解析 → 请求日志
//! → `/api` 拦截器管道（API Key → 限流）→ 路由处理器。处理器的错误由 [`AppError`] 统一转换为响应。

pub mod products;

use std::time::Duration;

use axum::{
    extract::OriginalUri,
    http::Method,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::core::{
    auth::ApiKeyInterceptor,
    error::AppError,
    interceptor::{pipeline_middleware, Pipeline},
    middleware::request_logging_middleware,
    rate_limit::RateLimiter,
    response::json_body_middleware,
};
use products::{handler::AppState, model::seed_products, service::MemoryStore};

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Product API! Go to /api/products to see all products.";

/// 使用预置数据的内存存储构建应用状态
pub fn seeded_state() -> AppState {
    AppState::new(MemoryStore::with_products(seed_products()))
}

/// `/api` 下的拦截器管道
pub fn api_pipeline(config: &Config) -> Pipeline {
    Pipeline::new()
        .with(ApiKeyInterceptor::new(config.auth.api_key.clone()))
        .with(RateLimiter::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        ))
}

/// 构建完整路由
pub fn build_router(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .merge(products::routes())
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            api_pipeline(config),
            pipeline_middleware,
        ));

    Router::new()
        .route("/", get(root).fallback(route_not_found))
        .nest("/api", api)
        .fallback(route_not_found)
        // 后添加的层在外侧
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(json_body_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// GET /
async fn root() -> &'static str {
    WELCOME_MESSAGE
}

/// 未匹配的路径或方法
pub(crate) async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("Route {} {} not found", method, uri.path()))
}
