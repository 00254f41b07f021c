//! X-Tweet HTTP client.
//!
//! One async method per API endpoint. Errors carry the server's
//! `{code, message}` body unchanged so callers can match on `code`.
//!
//! # Usage
//!
//! ```ignore
//! use xtweet_client::TweetClient;
//!
//! let client = TweetClient::new("http://localhost:5000");
//! let created = client.create("hello", "ann").await?;
//! client.like(&created.id).await?;
//! ```

pub mod feed;

pub use feed::{SortOrder, sort_tweets, validate_draft};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `code` is absent when the body was not the
    /// server's JSON error shape, in which case `message` is the raw body.
    #[error("HTTP {status}: {message}")]
    Server {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server's error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

// ── Wire types ──────────────────────────────────────────────────────

/// A tweet as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    pub tweet: String,
    pub author: String,
    pub like: u64,
    pub dislike: u64,
    pub score: i64,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
struct NewTweet<'a> {
    tweet: &'a str,
    author: &'a str,
}

/// Reply to a like or dislike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub message: String,
    pub like: u64,
    pub dislike: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersion {
    pub name: String,
    pub version: String,
}

// ── TweetClient ─────────────────────────────────────────────────────

pub struct TweetClient {
    http: reqwest::Client,
    base_url: String,
}

impl TweetClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Parse an API response, mapping HTTP errors to `ApiError`.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(e) => (e.code, e.message),
                Err(_) => (None, body),
            };
            return Err(ApiError::Server {
                status: status.as_u16(),
                code,
                message,
            });
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    /// The feed, newest first.
    pub async fn list(&self) -> Result<Vec<Tweet>, ApiError> {
        let resp = self.http.get(self.url("/api/tweets")).send().await?;
        Self::parse(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<Tweet, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/tweets/{id}")))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn create(&self, tweet: &str, author: &str) -> Result<Tweet, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/tweets"))
            .json(&NewTweet { tweet, author })
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn like(&self, id: &str) -> Result<Reaction, ApiError> {
        let resp = self
            .http
            .post(self.url(&format!("/api/tweets/like/{id}")))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn dislike(&self, id: &str) -> Result<Reaction, ApiError> {
        let resp = self
            .http
            .post(self.url(&format!("/api/tweets/dislike/{id}")))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn health(&self) -> Result<Health, ApiError> {
        let resp = self.http.get(self.url("/health")).send().await?;
        Self::parse(resp).await
    }

    pub async fn version(&self) -> Result<ServerVersion, ApiError> {
        let resp = self.http.get(self.url("/version")).send().await?;
        Self::parse(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tweet::TweetModule;
    use xtweet_core::Module;
    use xtweet_kv::{KVStore, RedbStore};

    struct TestServer {
        base_url: String,
        _dir: tempfile::TempDir,
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });
        format!("http://{addr}")
    }

    async fn start_test_server() -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        let kv: Arc<dyn KVStore> =
            Arc::new(RedbStore::open(&dir.path().join("client-test.redb")).unwrap());
        let app = TweetModule::new(kv).routes();
        TestServer {
            base_url: serve(app).await,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn round_trip() {
        let server = start_test_server().await;
        let client = TweetClient::new(format!("{}/", server.base_url));

        assert!(client.list().await.unwrap().is_empty());

        let created = client.create("  first post ", "ann").await.unwrap();
        assert_eq!(created.tweet, "first post");
        assert_eq!((created.like, created.dislike, created.score), (0, 0, 0));

        let fetched = client.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);

        let liked = client.like(&created.id).await.unwrap();
        assert_eq!(liked.message, "Tweet liked successfully");
        assert_eq!((liked.like, liked.dislike), (1, 0));

        let disliked = client.dislike(&created.id).await.unwrap();
        assert_eq!(disliked.message, "Tweet disliked successfully");
        assert_eq!((disliked.like, disliked.dislike), (1, 1));

        let feed = client.list().await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].score, 0);
    }

    #[tokio::test]
    async fn server_errors_keep_code_and_message() {
        let server = start_test_server().await;
        let client = TweetClient::new(&server.base_url);
        let created = client.create("hello", "bo").await.unwrap();

        client.dislike(&created.id).await.unwrap();
        let err = client.dislike(&created.id).await.unwrap_err();
        match &err {
            ApiError::Server { status, code, message } => {
                assert_eq!(*status, 400);
                assert_eq!(code.as_deref(), Some("ALREADY_REACTED"));
                assert_eq!(message, "You already disliked this tweet");
            }
            other => panic!("expected server error, got {other:?}"),
        }

        let err = client.get("not-an-id").await.unwrap_err();
        assert_eq!(err.code(), Some("INVALID_ID"));

        let err = client.create("", "").await.unwrap_err();
        assert_eq!(err.code(), Some("VALIDATION_FAILED"));
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_raw() {
        let app = Router::new().route(
            "/api/tweets",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let client = TweetClient::new(serve(app).await);

        match client.list().await.unwrap_err() {
            ApiError::Server { status, code, message } => {
                assert_eq!(status, 502);
                assert_eq!(code, None);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_success_body() {
        let app = Router::new().route("/api/tweets", get(|| async { "not a list" }));
        let client = TweetClient::new(serve(app).await);
        assert!(matches!(client.list().await, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = TweetClient::new(format!("http://{addr}"));
        assert!(matches!(client.list().await, Err(ApiError::Network(_))));
    }
}
