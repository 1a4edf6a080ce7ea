//! 滑动窗口限流
//!
//! 以 `{来源地址}:{接口}` 为键，记录窗口内每次放行的时间；达到上限后拒绝，
//! 被拒绝的请求不计入窗口。计数只保存在进程内。

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tracing::warn;

/// 限流策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// 窗口内最大请求数
    pub max_requests: usize,
    /// 时间窗口（秒）
    pub window_seconds: i64,
}

impl RateLimitPolicy {
    /// 注册接口：60 秒内最多 3 次
    pub const REGISTER: RateLimitPolicy = RateLimitPolicy {
        max_requests: 3,
        window_seconds: 60,
    };
}

/// 单次检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: usize,
    /// 本次之后窗口内剩余可用次数
    pub remaining: usize,
    /// 被拒绝时建议的重试等待（秒）
    pub retry_after_seconds: Option<i64>,
}

pub fn rate_limit_key(client_addr: &str, endpoint: &str) -> String {
    format!("{client_addr}:{endpoint}")
}

pub struct RateLimiter {
    policy: RateLimitPolicy,
    hits: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// 检查并在放行时记录一次请求
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Utc::now())
    }

    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let window = Duration::seconds(self.policy.window_seconds);
        let limit = self.policy.max_requests;
        let mut hits = match self.hits.lock() {
            Ok(hits) => hits,
            Err(poisoned) => poisoned.into_inner(),
        };
        // 顺带清掉其它键的过期记录，避免表无限增长
        hits.retain(|_, times| times.back().is_some_and(|last| now - *last < window));
        let times = hits.entry(key.to_string()).or_default();
        while times.front().is_some_and(|first| now - *first >= window) {
            times.pop_front();
        }
        if times.len() >= limit {
            let retry_after = times
                .front()
                .map(|first| {
                    let wait_ms = (*first + window - now).num_milliseconds();
                    ((wait_ms + 999) / 1000).max(1)
                })
                .unwrap_or(self.policy.window_seconds);
            warn!(target: "ems.auth", key = %key, retry_after, "rate_limit_exceeded");
            return RateLimitDecision {
                allowed: false,
                limit,
                remaining: 0,
                retry_after_seconds: Some(retry_after),
            };
        }
        times.push_back(now);
        RateLimitDecision {
            allowed: true,
            limit,
            remaining: limit - times.len(),
            retry_after_seconds: None,
        }
    }
}
