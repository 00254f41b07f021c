//! Cross-origin checks applied ahead of routing.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;
use xtweet_core::config::check_origin;
use xtweet_core::{ServiceConfig, ServiceError};

/// Reject requests whose `Origin` header is not on the allow-list.
/// Requests without an `Origin` header (curl, server-to-server) pass.
pub async fn origin_guard(
    State(config): State<Arc<ServiceConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| config.is_origin_allowed(o))
            .unwrap_or(false);
        if !allowed {
            warn!(origin = ?origin, path = %request.uri().path(), "origin not allowed");
            return ServiceError::ForbiddenOrigin("Not allowed by CORS".into()).into_response();
        }
    }
    next.run(request).await
}

/// CORS response headers for allowed origins.
pub fn cors_layer(config: &ServiceConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match check_origin(o).and_then(|()| {
            HeaderValue::from_str(o).map_err(|e| e.to_string())
        }) {
            Ok(v) => Some(v),
            Err(reason) => {
                warn!(origin = %o, %reason, "skipping unusable origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
