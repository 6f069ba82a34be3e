//! Mock OAuth2 / OpenID Connect authorization server for automated tests and
//! local development.
//!
//! Serves the authorization-code-with-PKCE endpoints an unmodified OIDC client
//! library needs for a full login round-trip: discovery, JWKS, authorize,
//! login, token exchange, userinfo, and logout.

pub mod config;
pub mod errors;
pub mod http;
pub mod oauth;
pub mod storage;
pub mod templates;
