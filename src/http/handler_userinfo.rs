//! Userinfo endpoint backed by bearer token verification.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use serde_json::{Value, json};

use super::context::AppState;
use crate::oauth::types::UserProfile;

/// Handle userinfo requests
///
/// Requires a `Bearer` authorization header carrying an access token this
/// server signed. The profile is looked up by the token's subject.
pub async fn get_userinfo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, (StatusCode, Json<Value>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Missing or invalid authorization header"})),
            )
        })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid access token"})),
        )
    })?;

    let user = state
        .user_store
        .get_user_by_subject(&claims.sub)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "User lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "server_error",
                    "error_description": e.to_string(),
                })),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "User not found"})),
            )
        })?;

    Ok(Json(user))
}
