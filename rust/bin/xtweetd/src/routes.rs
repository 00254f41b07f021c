//! Route registration: module routes, system endpoints and the
//! request guards wrapped around them.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::info;
use xtweet_core::{ServiceConfig, ServiceError};

use crate::origin_guard::{cors_layer, origin_guard};
use crate::rate_limit::{RateLimiter, rate_limit};

/// Build the complete router.
///
/// Layers, outermost first: rate limit, origin guard, CORS.
pub fn build_router(config: Arc<ServiceConfig>, module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/version", get(version))
        .fallback(not_found);

    // Module routes are absolute and already carry their state.
    for (name, router) in module_routes {
        info!(module = name, "mounting module routes");
        app = app.merge(router);
    }

    let limiter = Arc::new(RateLimiter::new(config.rate_limit));
    app.layer(cors_layer(&config))
        .layer(middleware::from_fn_with_state(config, origin_guard))
        .layer(middleware::from_fn_with_state(limiter, rate_limit))
}

async fn index() -> &'static str {
    "X-Tweet API is running"
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "xtweetd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> ServiceError {
    ServiceError::NotFound("Route not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use tower::ServiceExt;
    use tweet::TweetModule;
    use xtweet_core::{Module, RateLimitConfig};
    use xtweet_kv::MemoryStore;

    fn app(max_requests: u32) -> Router {
        let config = ServiceConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(900),
            },
            ..Default::default()
        };
        let module = TweetModule::new(Arc::new(MemoryStore::new()));
        build_router(Arc::new(config), vec![(module.name(), module.routes())])
    }

    fn request(method: Method, uri: &str) -> axum::http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn system_endpoints() {
        let router = app(100);

        let resp = router
            .clone()
            .oneshot(request(Method::GET, "/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"X-Tweet API is running");

        let resp = router
            .clone()
            .oneshot(request(Method::GET, "/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, serde_json::json!({ "status": "ok" }));

        let resp = router
            .clone()
            .oneshot(request(Method::GET, "/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["name"], "xtweetd");

        let resp = router
            .oneshot(request(Method::GET, "/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn module_routes_are_mounted() {
        let resp = app(100)
            .oneshot(request(Method::GET, "/api/tweets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn unknown_origin_is_forbidden() {
        let resp = app(100)
            .oneshot(
                request(Method::GET, "/api/tweets")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({ "code": "FORBIDDEN_ORIGIN", "message": "Not allowed by CORS" })
        );
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let router = app(100);
        let resp = router
            .clone()
            .oneshot(
                request(Method::GET, "/health")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let preflight = router
            .oneshot(
                request(Method::OPTIONS, "/api/tweets")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(preflight.status().is_success());
        let methods = preflight.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("POST"));
    }

    #[tokio::test]
    async fn rate_limit_is_per_client_and_outermost() {
        let router = app(2);
        let from = |addr: &str, origin: Option<&str>| {
            let mut b = request(Method::GET, "/health").header("x-forwarded-for", addr);
            if let Some(o) = origin {
                b = b.header(header::ORIGIN, o);
            }
            b.body(Body::empty()).unwrap()
        };

        let first = router.clone().oneshot(from("1.1.1.1", None)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()["ratelimit-limit"], "2");
        assert_eq!(first.headers()["ratelimit-remaining"], "1");
        assert!(first.headers().contains_key("ratelimit-reset"));

        // Rejected origins still spend budget.
        let forbidden = router
            .clone()
            .oneshot(from("1.1.1.1", Some("https://evil.example")))
            .await
            .unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.headers()["ratelimit-remaining"], "0");

        let limited = router.clone().oneshot(from("1.1.1.1", None)).await.unwrap();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(limited.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(
            body_json(limited).await,
            serde_json::json!({
                "code": "RATE_LIMITED",
                "message": "Too many requests, please try again later."
            })
        );

        let other = router.oneshot(from("2.2.2.2", None)).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }
}
