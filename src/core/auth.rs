//! API Key 认证拦截器

use axum::{extract::Request, response::IntoResponse};
use tracing::warn;

use super::interceptor::{Interception, Interceptor};
use super::response::Reject;

/// 请求头名称
pub const API_KEY_HEADER: &str = "x-api-key";

/// 校验共享密钥
#[derive(Debug, Clone)]
pub struct ApiKeyInterceptor {
    api_key: String,
}

impl ApiKeyInterceptor {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Interceptor for ApiKeyInterceptor {
    fn name(&self) -> &'static str {
        "api_key"
    }

    fn intercept(&self, req: &Request) -> Interception {
        let provided = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        match provided {
            Some(key) if key == self.api_key => Interception::Continue,
            _ => {
                warn!("API Key 校验失败: {} {}", req.method(), req.uri().path());
                Interception::Respond(
                    Reject::unauthorized("Unauthorized: Invalid or missing API key")
                        .into_response(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};

    fn request(key: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/products");
        if let Some(key) = key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn status(interception: Interception) -> Option<StatusCode> {
        match interception {
            Interception::Continue => None,
            Interception::Respond(response) => Some(response.status()),
        }
    }

    #[test]
    fn test_matching_key_passes() {
        let auth = ApiKeyInterceptor::new("secret");
        assert_eq!(status(auth.intercept(&request(Some("secret")))), None);
    }

    #[test]
    fn test_missing_or_wrong_key() {
        let auth = ApiKeyInterceptor::new("secret");
        assert_eq!(
            status(auth.intercept(&request(None))),
            Some(StatusCode::UNAUTHORIZED)
        );
        assert_eq!(
            status(auth.intercept(&request(Some("Secret")))),
            Some(StatusCode::UNAUTHORIZED)
        );
    }
}
