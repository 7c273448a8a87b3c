//! 核心响应处理模块
//!
//! 除了直接响应 [`Reject`]，这里还放置把框架拒绝统一交给 [`AppError`] 的提取器。

use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;

use super::error::AppError;

/// 直接返回的简单错误响应：`{"error": "..."}`
///
/// 用于认证失败和查询参数错误，这些情况不经过 [`AppError`]。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reject {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
}

impl Reject {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            error: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl IntoResponse for Reject {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(self)).into_response()
    }
}

/// 已解析的 JSON 请求体
///
/// 由 [`json_body_middleware`] 写入请求扩展；非 JSON 的 Content-Type 或空请求体按空对象处理。
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl JsonBody {
    fn empty() -> Self {
        JsonBody(Value::Object(Default::default()))
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn parse_json(bytes: &[u8]) -> Result<JsonBody, AppError> {
    if bytes.is_empty() {
        return Ok(JsonBody::empty());
    }

    serde_json::from_slice(bytes)
        .map(JsonBody)
        .map_err(|err| AppError::MalformedBody(format!("Invalid JSON body: {}", err)))
}

/// JSON 请求体解析中间件
///
/// 在鉴权和限流之前读取并解析 JSON 请求体。超过默认长度上限返回 413，格式错误返回 400，
/// 两者都经由 [`AppError`] 响应。
pub async fn json_body_middleware(req: Request, next: Next) -> Result<Response, AppError> {
    if !is_json_content_type(req.headers()) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let bytes = Bytes::from_request(Request::new(body), &()).await?;

    parts.extensions.insert(parse_json(&bytes)?);
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .remove::<JsonBody>()
            .unwrap_or_else(JsonBody::empty))
    }
}

/// 查询参数，解析失败时返回 [`AppError`]
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// 路径参数，解析失败时返回 [`AppError`]
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}
