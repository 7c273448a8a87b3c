//! 请求拦截器
//!
//! 每个拦截器检查请求后返回“放行”或“直接响应”，[`Pipeline`] 按注册顺序依次执行，
//! 第一个给出响应的拦截器终止后续处理。

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// 拦截结果
#[derive(Debug)]
pub enum Interception {
    Continue,
    Respond(Response),
}

/// 请求拦截器
pub trait Interceptor: Send + Sync {
    /// 拦截器名称，用于日志
    fn name(&self) -> &'static str;

    fn intercept(&self, req: &Request) -> Interception;

    /// 请求放行并得到响应后调用，可附加响应头
    fn after(&self, _req_key: &InterceptKey, _response: &mut Response) {}
}

/// 在 `intercept` 与 `after` 之间传递的请求标识
#[derive(Debug, Clone, Default)]
pub struct InterceptKey {
    pub client: String,
}

impl InterceptKey {
    pub fn from_request(req: &Request) -> Self {
        Self {
            client: super::client_addr(req),
        }
    }
}

/// 拦截器管道
#[derive(Clone, Default)]
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// 依次执行拦截器，返回第一个短路响应
    pub fn run(&self, req: &Request) -> Option<Response> {
        for interceptor in &self.interceptors {
            if let Interception::Respond(response) = interceptor.intercept(req) {
                tracing::debug!(
                    "拦截器 {} 终止请求 {} {}",
                    interceptor.name(),
                    req.method(),
                    req.uri().path()
                );
                return Some(response);
            }
        }
        None
    }

    fn finish(&self, key: &InterceptKey, response: &mut Response) {
        for interceptor in &self.interceptors {
            interceptor.after(key, response);
        }
    }
}

/// 把管道挂到路由上的中间件
pub async fn pipeline_middleware(
    State(pipeline): State<Pipeline>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(response) = pipeline.run(&req) {
        return response;
    }

    let key = InterceptKey::from_request(&req);
    let mut response = next.run(req).await;
    pipeline.finish(&key, &mut response);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(Arc<AtomicUsize>);

    impl Interceptor for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn intercept(&self, _req: &Request) -> Interception {
            self.0.fetch_add(1, Ordering::SeqCst);
            Interception::Continue
        }
    }

    struct Deny;

    impl Interceptor for Deny {
        fn name(&self) -> &'static str {
            "deny"
        }

        fn intercept(&self, _req: &Request) -> Interception {
            Interception::Respond(StatusCode::FORBIDDEN.into_response())
        }
    }

    fn request() -> Request {
        axum::http::Request::builder().uri("/api/x").body(Body::empty()).unwrap()
    }

    #[test]
    fn test_short_circuit_stops_later_interceptors() {
        let hits = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new().with(Deny).with(Counter(hits.clone()));

        let response = pipeline.run(&request()).unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_continue() {
        let hits = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .with(Counter(hits.clone()))
            .with(Counter(hits.clone()));

        assert!(pipeline.run(&request()).is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
