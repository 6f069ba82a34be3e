//! Authorization endpoint and login form submission.

use axum::{
    Json,
    extract::{Form, Query, State},
    http::{StatusCode, header},
    response::Html,
};
use minijinja::context;
use serde_json::{Value, json};

use super::context::AppState;
use crate::oauth::types::{AuthorizeParams, DEFAULT_EMAIL, LoginSubmission};

/// Handle authorization requests by rendering the login form
///
/// Every authorize parameter round-trips through a hidden form field so the
/// login submission carries the client's original request. PKCE parameters
/// are carried but never validated.
pub async fn handle_authorize(
    State(state): State<AppState>,
    Query(params): Query<AuthorizeParams>,
) -> Result<Html<String>, (StatusCode, Json<Value>)> {
    let rendered = state
        .template_env
        .get_template("login.html")
        .and_then(|template| {
            template.render(context! {
                client_id => params.client_id.unwrap_or_default(),
                redirect_uri => params.redirect_uri.unwrap_or_default(),
                state => params.state.unwrap_or_default(),
                response_type => params.response_type.unwrap_or_default(),
                scope => params.scope.unwrap_or_default(),
                code_challenge => params.code_challenge.unwrap_or_default(),
                code_challenge_method => params.code_challenge_method.unwrap_or_default(),
                nonce => params.nonce.unwrap_or_default(),
                email => DEFAULT_EMAIL,
            })
        })
        .map_err(|e| {
            tracing::error!(error = %e, "Login form rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "server_error",
                    "error_description": e.to_string(),
                })),
            )
        })?;
    Ok(Html(rendered))
}

/// Handle login form submissions
///
/// Any password is accepted. Redirects back to the client with a fresh
/// authorization code and the round-tripped state.
pub async fn handle_login(
    State(state): State<AppState>,
    Form(submission): Form<LoginSubmission>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1]), (StatusCode, Json<Value>)> {
    let redirect = state
        .authorize_flow
        .process_login(&submission)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Login processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "server_error",
                    "error_description": e.to_string(),
                })),
            )
        })?;
    Ok((StatusCode::FOUND, [(header::LOCATION, redirect)]))
}
