//! CORS for bridge endpoints.
//!
//! Each endpoint gets its own `CorsLayer` built from its origin allow-list.
//! Origins outside the list receive no `access-control-allow-origin` header,
//! so browsers block the response.
//!
//! ```ignore
//! let endpoint = Router::new()
//!     .route("/cat", post(bridge_message))
//!     .layer(cors_layer(&origins))
//!     .layer(middleware::from_fn(preflight_no_content));
//! ```

use axum::{extract::Request, middleware::Next, response::Response};
use http::{HeaderValue, Method, StatusCode};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Methods advertised on preflight.
pub const CORS_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// Builds a credentialed CORS layer for an explicit origin list.
///
/// Wildcards and unparseable origins are skipped with a warning; a
/// credentialed layer can't allow every origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(_) if origin == "*" => {
                tracing::warn!("ignoring wildcard CORS origin");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(CORS_METHODS.to_vec())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Answers successful preflights with 204 instead of 200.
///
/// Must sit outside the CORS layer, which short-circuits `OPTIONS`.
pub async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}
