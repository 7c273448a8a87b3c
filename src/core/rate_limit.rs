//! 限流拦截器
//!
//! 按客户端地址计数：窗口从该客户端第一次被计数的请求开始，窗口结束后重新计数。

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::interceptor::{InterceptKey, Interception, Interceptor};

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

#[derive(Debug, Clone, Copy)]
struct Bucket {
    started: Instant,
    count: u32,
}

/// 限流判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32, reset_after: Duration },
    Limited { retry_after: Duration },
}

/// 固定上限、按窗口重置的限流器
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    // 计数表只有简单的整数更新，锁中毒时直接沿用内部数据
    fn buckets(&self) -> MutexGuard<'_, HashMap<String, Bucket>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn check(&self, client: &str) -> Decision {
        self.check_at(client, Instant::now())
    }

    /// 在给定时刻为客户端计数一次
    pub fn check_at(&self, client: &str, now: Instant) -> Decision {
        let window = self.window;
        let mut buckets = self.buckets();

        // 清理过期的记录
        buckets.retain(|_, bucket| now.saturating_duration_since(bucket.started) < window);

        let bucket = buckets.entry(client.to_string()).or_insert(Bucket {
            started: now,
            count: 0,
        });
        let reset_after = window.saturating_sub(now.saturating_duration_since(bucket.started));

        if bucket.count >= self.max_requests {
            return Decision::Limited {
                retry_after: reset_after,
            };
        }

        bucket.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - bucket.count,
            reset_after,
        }
    }

    /// 当前窗口内的剩余次数和重置时间，不计数
    pub fn peek_at(&self, client: &str, now: Instant) -> (u32, Duration) {
        let buckets = self.buckets();
        match buckets.get(client) {
            Some(bucket) if now.saturating_duration_since(bucket.started) < self.window => (
                self.max_requests.saturating_sub(bucket.count),
                self.window
                    .saturating_sub(now.saturating_duration_since(bucket.started)),
            ),
            _ => (self.max_requests, self.window),
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

fn set_header(response: &mut Response, name: &'static str, value: u64) {
    response.headers_mut().insert(
        HeaderName::from_static(name),
        HeaderValue::from(value),
    );
}

fn set_rate_headers(response: &mut Response, limit: u32, remaining: u32, reset: Duration) {
    set_header(response, LIMIT_HEADER, u64::from(limit));
    set_header(response, REMAINING_HEADER, u64::from(remaining));
    set_header(response, RESET_HEADER, ceil_secs(reset));
}

impl Interceptor for RateLimiter {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    fn intercept(&self, req: &Request) -> Interception {
        let client = super::client_addr(req);

        match self.check(&client) {
            Decision::Allowed { .. } => Interception::Continue,
            Decision::Limited { retry_after } => {
                warn!("客户端 {} 请求过于频繁", client);

                let mut response =
                    (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE).into_response();
                response.headers_mut().insert(
                    header::RETRY_AFTER,
                    HeaderValue::from(ceil_secs(retry_after)),
                );
                set_rate_headers(&mut response, self.max_requests, 0, retry_after);
                Interception::Respond(response)
            }
        }
    }

    fn after(&self, key: &InterceptKey, response: &mut Response) {
        let (remaining, reset) = self.peek_at(&key.client, Instant::now());
        set_rate_headers(response, self.max_requests, remaining, reset);
    }
}
