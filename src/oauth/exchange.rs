//! Authorization code to token exchange.

use chrono::Utc;
use std::sync::Arc;

use crate::errors::TokenError;
use crate::oauth::tokens::TokenService;
use crate::oauth::types::{
    REFRESH_TOKEN, TOKEN_TTL_SECONDS, TokenClaims, TokenRequest, TokenResponse, canonical_user,
};
use crate::storage::traits::{AuthorizationCodeStore, UserStore};

/// Exchanges single-use authorization codes for signed tokens
pub struct TokenExchange {
    code_store: Arc<dyn AuthorizationCodeStore>,
    user_store: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    issuer: String,
}

impl TokenExchange {
    pub fn new(
        code_store: Arc<dyn AuthorizationCodeStore>,
        user_store: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        issuer: String,
    ) -> Self {
        Self {
            code_store,
            user_store,
            tokens,
            issuer,
        }
    }

    /// Run the exchange for a token request
    ///
    /// The grant type must be `authorization_code` and a code must be
    /// present. The code is consumed on first use; an unknown or already
    /// consumed code still succeeds but issues tokens for the canonical user
    /// with no nonce. The PKCE `code_verifier` is accepted and never checked.
    /// Access and id tokens are signed from one claim set.
    pub async fn exchange(&self, request: &TokenRequest) -> Result<TokenResponse, TokenError> {
        if request.grant_type.as_deref() != Some("authorization_code") {
            return Err(TokenError::InvalidGrant(
                "grant_type must be authorization_code".to_string(),
            ));
        }
        let code = match request.code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => code,
            None => {
                return Err(TokenError::InvalidGrant(
                    "authorization code is required".to_string(),
                ));
            }
        };

        let (profile, nonce) = match self.code_store.consume_code(code).await? {
            Some(issued) => {
                let profile = self
                    .user_store
                    .get_user_by_subject(&issued.subject)
                    .await?
                    .unwrap_or_else(|| canonical_user(&self.issuer));
                (profile, issued.nonce)
            }
            None => (canonical_user(&self.issuer), None),
        };

        let claims = TokenClaims::from_profile(&profile, nonce, Utc::now());
        let access_token = self.tokens.sign(&claims)?;
        let id_token = self.tokens.sign(&claims)?;

        Ok(TokenResponse {
            access_token,
            id_token,
            token_type: "Bearer".to_string(),
            expires_in: TOKEN_TTL_SECONDS,
            refresh_token: REFRESH_TOKEN.to_string(),
        })
    }
}
