//! Token exchange endpoint.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use serde_json::{Value, json};

use super::context::AppState;
use crate::errors::TokenError;
use crate::oauth::types::{TokenRequest, TokenResponse};

/// Handle token exchange requests
///
/// The body is accepted as JSON or form encoding, selected by content type.
/// A body that does not parse as a token request is treated the same as a
/// request without a valid grant.
pub async fn handle_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TokenResponse>, (StatusCode, Json<Value>)> {
    let request = parse_token_request(&headers, &body).ok_or_else(invalid_grant)?;

    match state.token_exchange.exchange(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(TokenError::InvalidGrant(reason)) => {
            tracing::debug!(reason = %reason, "Rejected token request");
            Err(invalid_grant())
        }
        Err(e) => {
            tracing::error!(error = %e, "Token exchange failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "server_error",
                    "error_description": e.to_string(),
                })),
            ))
        }
    }
}

fn parse_token_request(headers: &HeaderMap, body: &Bytes) -> Option<TokenRequest> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if content_type.starts_with("application/json") {
        serde_json::from_slice(body).ok()
    } else {
        serde_urlencoded::from_bytes(body).ok()
    }
}

fn invalid_grant() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "invalid_grant"})),
    )
}
