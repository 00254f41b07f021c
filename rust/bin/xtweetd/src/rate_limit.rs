//! Fixed-window request limiting per client address.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, header::RETRY_AFTER};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;
use xtweet_core::{ClientIp, RateLimitConfig, ServiceError};

pub const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Most client windows held at once. A new client arriving at the cap
/// first triggers a sweep of closed windows, then evicts the oldest one.
pub const MAX_TRACKED_CLIENTS: usize = 10_000;

struct Window {
    started_at: Instant,
    hits: u32,
}

/// Result of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window closes.
    pub reset: Duration,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    max_clients: usize,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_capacity(config, MAX_TRACKED_CLIENTS)
    }

    pub fn with_capacity(config: RateLimitConfig, max_clients: usize) -> Self {
        Self {
            config,
            max_clients: max_clients.max(1),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Number of client windows currently held.
    pub fn tracked(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Count a request from `client` at `now`.
    pub fn check(&self, client: &str, now: Instant) -> Decision {
        let limit = self.config.max_requests;
        let span = self.config.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if !windows.contains_key(client) && windows.len() >= self.max_clients {
            windows.retain(|_, w| now.duration_since(w.started_at) < span);
            if windows.len() >= self.max_clients {
                let oldest = windows
                    .iter()
                    .min_by_key(|(_, w)| w.started_at)
                    .map(|(k, _)| k.clone());
                if let Some(key) = oldest {
                    debug!(client = %key, "evicting oldest rate limit window");
                    windows.remove(&key);
                }
            }
        }

        let window = windows.entry(client.to_string()).or_insert(Window {
            started_at: now,
            hits: 0,
        });
        if now.duration_since(window.started_at) >= span {
            window.started_at = now;
            window.hits = 0;
        }

        let allowed = window.hits < limit;
        if allowed {
            window.hits += 1;
        }
        Decision {
            allowed,
            limit,
            remaining: limit.saturating_sub(window.hits),
            reset: span.saturating_sub(now.duration_since(window.started_at)),
        }
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

fn set_headers(headers: &mut HeaderMap, decision: &Decision) {
    let reset = ceil_secs(decision.reset);
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(RATE_LIMIT_RESET, HeaderValue::from(reset));
    if !decision.allowed {
        headers.insert(RETRY_AFTER, HeaderValue::from(reset));
    }
}

/// Middleware counting every request against its client's window.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    ClientIp(client): ClientIp,
    request: Request,
    next: Next,
) -> Response {
    let decision = limiter.check(&client, Instant::now());

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        debug!(client = %client, "rate limit exceeded");
        ServiceError::RateLimited("Too many requests, please try again later.".into())
            .into_response()
    };
    set_headers(response.headers_mut(), &decision);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests: max,
            window: Duration::from_secs(secs),
        })
    }

    #[test]
    fn allows_up_to_the_limit() {
        let rl = limiter(3, 60);
        let t0 = Instant::now();
        let remaining: Vec<_> = (0..3).map(|_| rl.check("a", t0).remaining).collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        let blocked = rl.check("a", t0 + Duration::from_secs(10));
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining, 0);
        assert_eq!(blocked.reset, Duration::from_secs(50));
    }

    #[test]
    fn clients_have_separate_windows() {
        let rl = limiter(1, 60);
        let t0 = Instant::now();
        assert!(rl.check("a", t0).allowed);
        assert!(!rl.check("a", t0).allowed);
        assert!(rl.check("b", t0).allowed);
    }

    #[test]
    fn window_resets() {
        let rl = limiter(1, 60);
        let t0 = Instant::now();
        assert!(rl.check("a", t0).allowed);
        assert!(!rl.check("a", t0 + Duration::from_secs(59)).allowed);

        let fresh = rl.check("a", t0 + Duration::from_secs(60));
        assert!(fresh.allowed);
        assert_eq!(fresh.reset, Duration::from_secs(60));
    }

    #[test]
    fn tracked_clients_stay_bounded() {
        let rl = RateLimiter::with_capacity(
            RateLimitConfig {
                max_requests: 1,
                window: Duration::from_secs(900),
            },
            100,
        );
        let t0 = Instant::now();
        for i in 0..1000u64 {
            let client = format!("10.0.{}.{}", i / 256, i % 256);
            assert!(rl.check(&client, t0 + Duration::from_millis(i)).allowed);
            assert!(rl.tracked() <= 100);
        }
        assert_eq!(rl.tracked(), 100);

        // The most recent clients keep their windows.
        assert!(!rl.check("10.0.3.231", t0 + Duration::from_secs(1)).allowed);
        assert!(rl.check("fresh", t0 + Duration::from_secs(1)).allowed);
        assert_eq!(rl.tracked(), 100);
    }

    #[test]
    fn closed_windows_are_swept_before_evicting() {
        let rl = RateLimiter::with_capacity(
            RateLimitConfig {
                max_requests: 1,
                window: Duration::from_secs(60),
            },
            2,
        );
        let t0 = Instant::now();
        assert!(rl.check("a", t0).allowed);
        assert!(rl.check("b", t0 + Duration::from_secs(30)).allowed);

        // "a" has expired, so it makes room and "b" keeps its count.
        assert!(rl.check("c", t0 + Duration::from_secs(61)).allowed);
        assert_eq!(rl.tracked(), 2);
        assert!(!rl.check("b", t0 + Duration::from_secs(62)).allowed);
    }

    #[test]
    fn headers_round_reset_up() {
        let mut headers = HeaderMap::new();
        set_headers(
            &mut headers,
            &Decision {
                allowed: false,
                limit: 20,
                remaining: 0,
                reset: Duration::from_millis(1500),
            },
        );
        assert_eq!(headers[RATE_LIMIT_LIMIT], "20");
        assert_eq!(headers[RATE_LIMIT_RESET], "2");
        assert_eq!(headers[RETRY_AFTER], "2");
    }
}
