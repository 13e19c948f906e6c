//! HTTP middleware for axum.
//!
//! - `cors` - Per-endpoint CORS layer and preflight status rewrite

pub mod cors;

pub use cors::{cors_layer, preflight_no_content, CORS_METHODS};
