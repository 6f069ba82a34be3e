//! Shared OAuth data types and fixed test identities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client identifier echoed into `aud` and `azp` claims
pub const DEFAULT_CLIENT_ID: &str = "test-client-id";

/// Subject of the canonical bootstrap user
pub const CANONICAL_SUBJECT: &str = "test-user-123";

/// Email of the canonical bootstrap user, prefilled in the login form
pub const DEFAULT_EMAIL: &str = "test@example.com";

/// Scope granted to every issued token
pub const DEFAULT_SCOPE: &str = "openid profile email offline_access";

/// Lifetime of issued access and identity tokens
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Fixed refresh token returned by every exchange
pub const REFRESH_TOKEN: &str = "test-refresh-token";

/// User profile as served by `/userinfo` and embedded in token claims
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct UserProfile {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub given_name: String,
    pub family_name: String,
    pub picture: String,
    pub aud: String,
    pub iss: String,
    pub azp: String,
    pub scope: String,
}

/// Claim set signed into both the access token and the id token
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub given_name: String,
    pub family_name: String,
    pub picture: String,
    pub aud: String,
    pub iss: String,
    pub azp: String,
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Pending authorization code and what the login that minted it captured
#[derive(Clone)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct IssuedCode {
    pub code: String,
    pub subject: String,
    pub nonce: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query parameters accepted by `GET /authorize`
///
/// Everything is optional; whatever the client sends round-trips through the
/// login form unchanged.
#[derive(Clone, Deserialize, Default)]
#[serde(default)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct AuthorizeParams {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub response_type: Option<String>,
    pub scope: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub nonce: Option<String>,
}

/// Form body posted by the login page
#[derive(Clone, Deserialize, Default)]
#[serde(default)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct LoginSubmission {
    pub email: Option<String>,
    pub password: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub client_id: Option<String>,
    pub response_type: Option<String>,
    pub scope: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

/// Body of `POST /oauth/token`, accepted as JSON or form encoding
#[derive(Clone, Deserialize, Default)]
#[serde(default)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
    pub code_verifier: Option<String>,
}

/// Successful token exchange response
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct TokenResponse {
    pub access_token: String,
    pub id_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
}

/// Derive a deterministic subject for an email address
///
/// The default email maps to the canonical subject; any other email is
/// lowercased with non-alphanumeric runs collapsed to `-` and prefixed
/// `user-`, so repeated logins with the same email share one identity.
pub fn subject_from_email(email: &str) -> String {
    if email == DEFAULT_EMAIL {
        return CANONICAL_SUBJECT.to_string();
    }
    let slug: String = email
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("user-{slug}")
}

/// The canonical bootstrap profile for a given issuer
pub fn canonical_user(issuer: &str) -> UserProfile {
    UserProfile {
        sub: CANONICAL_SUBJECT.to_string(),
        email: DEFAULT_EMAIL.to_string(),
        name: "Test User".to_string(),
        given_name: "Test".to_string(),
        family_name: "User".to_string(),
        picture: "https://via.placeholder.com/150".to_string(),
        aud: DEFAULT_CLIENT_ID.to_string(),
        iss: issuer.to_string(),
        azp: DEFAULT_CLIENT_ID.to_string(),
        scope: DEFAULT_SCOPE.to_string(),
    }
}

/// Synthesize a profile for a login with a non-default email
pub fn profile_for_email(email: &str, issuer: &str) -> UserProfile {
    if email == DEFAULT_EMAIL {
        return canonical_user(issuer);
    }
    let given_name = email.split('@').next().unwrap_or(email).to_string();
    UserProfile {
        sub: subject_from_email(email),
        email: email.to_string(),
        name: email.to_string(),
        given_name,
        family_name: "User".to_string(),
        picture: "https://via.placeholder.com/150".to_string(),
        aud: DEFAULT_CLIENT_ID.to_string(),
        iss: issuer.to_string(),
        azp: DEFAULT_CLIENT_ID.to_string(),
        scope: DEFAULT_SCOPE.to_string(),
    }
}
