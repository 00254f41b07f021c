use std::time::Duration;

use axum::http::HeaderValue;

use thiserror::Error;
use tracing::info;

/// Origins the browser front ends are served from.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "https://revision-amber.vercel.app",
];

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_STORE_URI: &str = "xtweet.redb";
const DEFAULT_RATE_LIMIT_MAX: u32 = 20;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Per-client request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        }
    }
}

/// Process configuration for the API server.
///
/// Resolved once at startup from the environment:
///
/// | Variable                 | Field             |
/// |--------------------------|-------------------|
/// | `PORT`                   | `listen` port     |
/// | `URI`                    | `store_uri`       |
/// | `ALLOWED_ORIGINS`        | `allowed_origins` |
/// | `RATE_LIMIT_MAX`         | `rate_limit`      |
/// | `RATE_LIMIT_WINDOW_SECS` | `rate_limit`      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Listen address for the HTTP server.
    pub listen: String,

    /// Store connection string: a redb file path, or `memory:`.
    pub store_uri: String,

    /// Exact-match origin allow-list (no trailing slash).
    pub allowed_origins: Vec<String>,

    pub rate_limit: RateLimitConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: listen_on(DEFAULT_PORT),
            store_uri: DEFAULT_STORE_URI.to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    /// Unset or blank variables fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ServiceConfig::default();

        if let Some(port) = get("PORT") {
            config.listen = listen_on(parse("PORT", &port)?);
        }
        if let Some(uri) = get("URI") {
            config.store_uri = uri.trim().to_string();
        }
        if let Some(origins) = get("ALLOWED_ORIGINS") {
            config.allowed_origins = parse_origins(&origins);
            for origin in &config.allowed_origins {
                check_origin(origin).map_err(|reason| ConfigError::Invalid {
                    key: "ALLOWED_ORIGINS",
                    value: origin.clone(),
                    reason,
                })?;
            }
        }
        if let Some(max) = get("RATE_LIMIT_MAX") {
            config.rate_limit.max_requests = parse("RATE_LIMIT_MAX", &max)?;
            if config.rate_limit.max_requests == 0 {
                return Err(ConfigError::Invalid {
                    key: "RATE_LIMIT_MAX",
                    value: max,
                    reason: "must be at least 1".into(),
                });
            }
        }
        if let Some(secs) = get("RATE_LIMIT_WINDOW_SECS") {
            let n: u64 = parse("RATE_LIMIT_WINDOW_SECS", &secs)?;
            if n == 0 {
                return Err(ConfigError::Invalid {
                    key: "RATE_LIMIT_WINDOW_SECS",
                    value: secs,
                    reason: "must be at least 1".into(),
                });
            }
            config.rate_limit.window = Duration::from_secs(n);
        }

        info!(
            listen = %config.listen,
            store = %config.store_uri,
            origins = config.allowed_origins.len(),
            "configuration resolved"
        );
        Ok(config)
    }

    /// Whether `origin` is on the allow-list.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        let origin = normalize_origin(origin);
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

fn listen_on(port: u16) -> String {
    format!("0.0.0.0:{port}")
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let mut origins: Vec<String> = raw
        .split(',')
        .map(normalize_origin)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    origins.dedup();
    origins
}

/// An allow-list entry must be one concrete origin usable as a header value.
pub fn check_origin(origin: &str) -> Result<(), String> {
    if origin == "*" {
        return Err("wildcard is not allowed with credentials, list origins explicitly".into());
    }
    HeaderValue::from_str(origin)
        .map(|_| ())
        .map_err(|e| format!("not a valid header value: {e}"))
}

fn normalize_origin(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}
