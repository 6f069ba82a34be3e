//! OIDC discovery and JWKS endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::context::AppState;
use crate::config::SigningMode;

/// Handle OpenID Connect discovery metadata requests
///
/// Endpoint URLs are built by concatenation onto the issuer, which carries a
/// trailing slash. The advertised signing algorithm reflects the active mode.
pub async fn openid_configuration_handler(State(state): State<AppState>) -> Json<Value> {
    let issuer = &state.config.issuer;
    let signing_alg = match state.config.signing_mode {
        SigningMode::Rs256 => "RS256",
        SigningMode::Hs256 => "HS256",
    };

    Json(json!({
        "issuer": issuer,
        "authorization_endpoint": format!("{issuer}authorize"),
        "token_endpoint": format!("{issuer}oauth/token"),
        "userinfo_endpoint": format!("{issuer}userinfo"),
        "jwks_uri": format!("{issuer}.well-known/jwks.json"),
        "end_session_endpoint": format!("{issuer}v2/logout"),
        "response_types_supported": ["code", "id_token", "token"],
        "subject_types_supported": ["public"],
        "id_token_signing_alg_values_supported": [signing_alg],
        "scopes_supported": ["openid", "profile", "email", "offline_access"],
        "code_challenge_methods_supported": ["S256"],
    }))
}

/// Handle JWKS requests for token verification
///
/// In HMAC mode there is no public key to publish and the endpoint fails
/// closed rather than serving an empty key set.
pub async fn jwks_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.key_material.to_jwks().map(Json).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "server_error",
                "error_description": e.to_string(),
            })),
        )
    })
}
