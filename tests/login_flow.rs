//! End-to-end login flow tests
//!
//! These tests drive the full authorization-code round-trip the way an OIDC
//! client library would: discovery, authorize, login, token exchange, JWKS
//! verification, and userinfo.

use auth_simulator::config::{Config, SigningMode, issuer};
use auth_simulator::http::context::AppState;
use auth_simulator::http::server::build_router;
use axum::http::StatusCode;
use axum_test::TestServer;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;
use std::sync::Arc;

const ISSUER_PORT: u16 = 4400;

fn test_state(signing_mode: SigningMode) -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let config = Arc::new(Config {
        version: "test".to_string(),
        http_port: ("PORT", ISSUER_PORT.to_string()).try_into().unwrap(),
        external_port: ("EXTERNAL_PORT", ISSUER_PORT.to_string())
            .try_into()
            .unwrap(),
        issuer: issuer(ISSUER_PORT),
        rsa_key_path: dir.path().join("rsa-key.pem"),
        tls_key_path: dir.path().join("key.pem"),
        tls_cert_path: dir.path().join("cert.pem"),
        signing_mode,
    });
    let state = AppState::new(config).unwrap();
    (dir, state)
}

fn test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

fn decode_with_jwks(token: &str, jwks: &Value) -> Value {
    let key = &jwks["keys"][0];
    let decoding_key = DecodingKey::from_rsa_components(
        key["n"].as_str().unwrap(),
        key["e"].as_str().unwrap(),
    )
    .unwrap();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_aud = false;
    jsonwebtoken::decode::<Value>(token, &decoding_key, &validation)
        .unwrap()
        .claims
}

fn location(response: &axum_test::TestResponse) -> String {
    response.header("location").to_str().unwrap().to_string()
}

fn code_from_redirect(redirect: &str) -> String {
    let url = url::Url::parse(redirect).unwrap();
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .expect("authorization code not found in redirect")
}

#[tokio::test]
async fn test_discovery_document() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    let response = server.get("/.well-known/openid_configuration").await;
    response.assert_status_ok();
    let doc: Value = response.json();

    assert_eq!(doc["issuer"], "https://localhost:4400/");
    assert_eq!(
        doc["authorization_endpoint"],
        "https://localhost:4400/authorize"
    );
    assert_eq!(doc["token_endpoint"], "https://localhost:4400/oauth/token");
    assert_eq!(
        doc["jwks_uri"],
        "https://localhost:4400/.well-known/jwks.json"
    );
    assert_eq!(doc["id_token_signing_alg_values_supported"][0], "RS256");
    assert_eq!(doc["subject_types_supported"][0], "public");
    assert_eq!(doc["code_challenge_methods_supported"][0], "S256");
    let scopes: Vec<&str> = doc["scopes_supported"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert_eq!(scopes, ["openid", "profile", "email", "offline_access"]);
}

#[tokio::test]
async fn test_jwks_document_shape() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    let response = server.get("/.well-known/jwks.json").await;
    response.assert_status_ok();
    let jwks: Value = response.json();

    let key = &jwks["keys"][0];
    assert_eq!(key["kty"], "RSA");
    assert_eq!(key["kid"], "test-key-id");
    assert_eq!(key["use"], "sig");
    assert_eq!(key["alg"], "RS256");
    assert_eq!(key["e"], "AQAB");
    assert!(!key["n"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_jwks_unavailable_in_hmac_mode() {
    let (_dir, state) = test_state(SigningMode::Hs256);
    let server = test_server(state);

    let response = server.get("/.well-known/jwks.json").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_authorize_form_round_trips_parameters() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    let response = server
        .get("/authorize")
        .add_query_param("client_id", "test-client-id")
        .add_query_param("redirect_uri", "https://app.example.com/callback")
        .add_query_param("state", "s1")
        .add_query_param("nonce", "n1")
        .add_query_param("response_type", "code")
        .add_query_param("scope", "openid profile")
        .await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains(r#"name="state" value="s1""#));
    assert!(body.contains(r#"name="nonce" value="n1""#));
    assert!(body.contains(r#"value="test@example.com""#));
    assert!(body.contains(r#"data-testid="simulator-login-button""#));
}

#[tokio::test]
async fn test_full_login_round_trip() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    // Login with the form fields the authorize page round-trips
    let response = server
        .post("/login")
        .form(&[
            ("email", "test@example.com"),
            ("password", "anything"),
            ("redirect_uri", "https://app.example.com/callback"),
            ("state", "s1"),
            ("nonce", "n1"),
            ("client_id", "test-client-id"),
        ])
        .await;
    response.assert_status(StatusCode::FOUND);

    let redirect = location(&response);
    assert!(redirect.starts_with("https://app.example.com/callback?"));
    assert!(redirect.contains("state=s1"));
    let code = code_from_redirect(&redirect);
    assert!(code.starts_with("code-"));

    // Exchange the code
    let response = server
        .post("/oauth/token")
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", "https://app.example.com/callback"),
            ("client_id", "test-client-id"),
        ])
        .await;
    response.assert_status_ok();
    let tokens: Value = response.json();
    assert_eq!(tokens["token_type"], "Bearer");
    assert_eq!(tokens["expires_in"], 3600);
    assert_eq!(tokens["refresh_token"], "test-refresh-token");

    // Verify the id token against the published JWKS
    let jwks: Value = server.get("/.well-known/jwks.json").await.json();
    let claims = decode_with_jwks(tokens["id_token"].as_str().unwrap(), &jwks);
    assert_eq!(claims["sub"], "test-user-123");
    assert_eq!(claims["email"], "test@example.com");
    assert_eq!(claims["nonce"], "n1");
    assert_eq!(claims["iss"], "https://localhost:4400/");

    // Use the access token against userinfo
    let response = server
        .get("/userinfo")
        .authorization_bearer(tokens["access_token"].as_str().unwrap())
        .await;
    response.assert_status_ok();
    let profile: Value = response.json();
    assert_eq!(profile["sub"], "test-user-123");
    assert_eq!(profile["email"], "test@example.com");
    assert_eq!(profile["name"], "Test User");
    assert_eq!(profile["aud"], "test-client-id");
}

#[tokio::test]
async fn test_custom_email_gets_derived_subject() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    let response = server
        .post("/login")
        .form(&[
            ("email", "Custom@Example.com"),
            ("password", "x"),
            ("redirect_uri", "https://app.example.com/callback"),
        ])
        .await;
    let code = code_from_redirect(&location(&response));

    let response = server
        .post("/oauth/token")
        .form(&[("grant_type", "authorization_code"), ("code", code.as_str())])
        .await;
    let tokens: Value = response.json();

    let response = server
        .get("/userinfo")
        .authorization_bearer(tokens["access_token"].as_str().unwrap())
        .await;
    response.assert_status_ok();
    let profile: Value = response.json();
    assert_eq!(profile["sub"], "user-custom-example-com");
    assert_eq!(profile["email"], "Custom@Example.com");
}

#[tokio::test]
async fn test_token_endpoint_accepts_json_body() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    let response = server
        .post("/login")
        .form(&[
            ("email", "test@example.com"),
            ("redirect_uri", "https://app.example.com/callback"),
        ])
        .await;
    let code = code_from_redirect(&location(&response));

    let response = server
        .post("/oauth/token")
        .json(&serde_json::json!({
            "grant_type": "authorization_code",
            "code": code,
        }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_token_endpoint_rejects_bad_grants() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    // Wrong grant type
    let response = server
        .post("/oauth/token")
        .form(&[("grant_type", "client_credentials"), ("code", "code-x")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid_grant");

    // Missing code
    let response = server
        .post("/oauth/token")
        .form(&[("grant_type", "authorization_code")])
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "invalid_grant");
}

#[tokio::test]
async fn test_consumed_code_falls_back_to_canonical_claims() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    let response = server
        .post("/login")
        .form(&[
            ("email", "alice@example.com"),
            ("redirect_uri", "https://app.example.com/callback"),
            ("nonce", "n1"),
        ])
        .await;
    let code = code_from_redirect(&location(&response));
    let jwks: Value = server.get("/.well-known/jwks.json").await.json();

    let first: Value = server
        .post("/oauth/token")
        .form(&[("grant_type", "authorization_code"), ("code", code.as_str())])
        .await
        .json();
    let first_claims = decode_with_jwks(first["id_token"].as_str().unwrap(), &jwks);
    assert_eq!(first_claims["sub"], "user-alice-example-com");
    assert_eq!(first_claims["nonce"], "n1");

    // The second exchange no longer carries the login's identity or nonce
    let second: Value = server
        .post("/oauth/token")
        .form(&[("grant_type", "authorization_code"), ("code", code.as_str())])
        .await
        .json();
    let second_claims = decode_with_jwks(second["id_token"].as_str().unwrap(), &jwks);
    assert_eq!(second_claims["sub"], "test-user-123");
    assert!(second_claims.get("nonce").is_none());
}

#[tokio::test]
async fn test_userinfo_error_paths() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state.clone());

    // No authorization header
    let response = server.get("/userinfo").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["error"],
        "Missing or invalid authorization header"
    );

    // Garbage token
    let response = server.get("/userinfo").authorization_bearer("not-a-jwt").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "Invalid access token");

    // Valid signature but a subject the store has never seen
    let orphan_claims = auth_simulator::oauth::types::TokenClaims::from_profile(
        &auth_simulator::oauth::types::profile_for_email(
            "ghost@example.com",
            "https://localhost:4400/",
        ),
        None,
        chrono::Utc::now(),
    );
    let orphan_token = state.tokens.sign(&orphan_claims).unwrap();
    let response = server
        .get("/userinfo")
        .authorization_bearer(&orphan_token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "User not found");
}

#[tokio::test]
async fn test_logout_redirects_to_return_to() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    let response = server
        .get("/v2/logout")
        .add_query_param("returnTo", "https://app.example.com/")
        .await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(location(&response), "https://app.example.com/");

    let response = server.get("/v2/logout").await;
    response.assert_status_ok();
    assert!(response.text().contains("logged out"));
}

#[tokio::test]
async fn test_healthz() {
    let (_dir, state) = test_state(SigningMode::Rs256);
    let server = test_server(state);

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
}
