//! Axum router configuration for bridge endpoints.

use std::path::Path;
use std::sync::Arc;

use axum::{middleware, routing::post, Router};
use tower_http::services::ServeDir;

use crate::adapters::http::middleware::{cors_layer, preflight_no_content};
use crate::application::handlers::bridge::BridgeHandler;
use crate::domain::bridge::EndpointCatalog;

use super::handlers::{bridge_message, EndpointState};

/// Create the bridge router.
///
/// # Routes
///
/// One `POST` route per catalog entry, each with its own CORS layer. An
/// endpoint with no origins of its own uses `fallback_origins`.
///
/// # Example
///
/// ```ignore
/// let app = bridge_router(&EndpointCatalog::builtin(), handler, &[])
///     .layer(TraceLayer::new_for_http());
/// ```
pub fn bridge_router(
    catalog: &EndpointCatalog,
    handler: BridgeHandler,
    fallback_origins: &[String],
) -> Router {
    catalog.iter().fold(Router::new(), |router, profile| {
        let origins = if profile.cors_origins.is_empty() {
            fallback_origins
        } else {
            profile.cors_origins.as_slice()
        };
        tracing::debug!(route = %profile.route, strategy = ?profile.strategy, "mounting endpoint");

        let endpoint = Router::new()
            .route(&profile.route, post(bridge_message))
            .layer(cors_layer(origins))
            .layer(middleware::from_fn(preflight_no_content))
            .with_state(EndpointState {
                handler: handler.clone(),
                profile: Arc::new(profile.clone()),
            });

        router.merge(endpoint)
    })
}

/// Serves files from `dir` for any path no endpoint claims.
pub fn with_static_files(router: Router, dir: &Path) -> Router {
    router.fallback_service(ServeDir::new(dir))
}
