//! HTTP handler for bridge endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::application::handlers::bridge::{BridgeError, BridgeHandler};
use crate::domain::bridge::{ConversationRequest, EndpointProfile};

use super::dto::{BridgeRequest, BridgeResponse, ErrorResponse};

/// State for one endpoint: the shared handler plus that endpoint's profile.
#[derive(Clone)]
pub struct EndpointState {
    pub handler: BridgeHandler,
    pub profile: Arc<EndpointProfile>,
}

/// Forward the caller's text to the endpoint's assistant.
///
/// POST /{route}
pub async fn bridge_message(
    State(state): State<EndpointState>,
    payload: Result<Json<BridgeRequest>, JsonRejection>,
) -> Result<Json<BridgeResponse>, BridgeApiError> {
    let Json(body) = payload.map_err(|rejection| BridgeApiError::BadRequest(rejection.body_text()))?;

    let field = state.profile.input_field;
    let request = ConversationRequest::new(field, body.into_field(field))
        .map_err(|e| BridgeApiError::BadRequest(e.to_string()))?;

    let outcome = state.handler.handle(&state.profile, request).await?;

    Ok(Json(BridgeResponse {
        response: outcome.into_text(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts bridge errors to HTTP responses.
#[derive(Debug)]
pub enum BridgeApiError {
    BadRequest(String),
    DeadlineExceeded(String),
    Internal(String),
}

impl From<BridgeError> for BridgeApiError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::DeadlineExceeded { .. } => BridgeApiError::DeadlineExceeded(err.to_string()),
            other => BridgeApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for BridgeApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            BridgeApiError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            BridgeApiError::DeadlineExceeded(msg) => {
                tracing::error!("Run deadline exceeded: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, ErrorResponse::deadline_exceeded(msg))
            }
            BridgeApiError::Internal(msg) => {
                tracing::error!("Bridge error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };

        (status, Json(error)).into_response()
    }
}
