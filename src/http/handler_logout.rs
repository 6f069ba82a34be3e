//! Logout endpoint.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::context::AppState;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LogoutParams {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

/// Handle logout requests
///
/// Redirects to `returnTo` when the client supplied one, otherwise renders
/// the logout confirmation page. Nothing is invalidated; issued tokens stay
/// valid until they expire.
pub async fn handle_logout(
    State(state): State<AppState>,
    Query(params): Query<LogoutParams>,
) -> Response {
    if let Some(return_to) = params.return_to.filter(|r| !r.is_empty()) {
        return (StatusCode::FOUND, [(header::LOCATION, return_to)]).into_response();
    }

    match state
        .template_env
        .get_template("logout.html")
        .and_then(|template| template.render(()))
    {
        Ok(rendered) => Html(rendered).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Logout page rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "server_error",
                    "error_description": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
