//! Authorization flow: login processing and redirect construction.

use chrono::Utc;
use std::sync::Arc;
use ulid::Ulid;
use url::Url;

use crate::errors::AuthFlowError;
use crate::oauth::types::{DEFAULT_EMAIL, IssuedCode, LoginSubmission, profile_for_email};
use crate::storage::traits::{AuthorizationCodeStore, UserStore};

/// Handles login submissions: derives the user identity, mints a single-use
/// authorization code, and builds the client redirect
pub struct AuthorizeFlow {
    user_store: Arc<dyn UserStore>,
    code_store: Arc<dyn AuthorizationCodeStore>,
    issuer: String,
}

impl AuthorizeFlow {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        code_store: Arc<dyn AuthorizationCodeStore>,
        issuer: String,
    ) -> Self {
        Self {
            user_store,
            code_store,
            issuer,
        }
    }

    /// Process a login form submission and return the redirect URL
    ///
    /// Any password is accepted. The submitted email determines the subject;
    /// the minted code records that subject together with the nonce so the
    /// exchange can reconstruct both. The redirect preserves query parameters
    /// already present on the redirect URI and appends `state` only when the
    /// client sent one.
    pub async fn process_login(&self, submission: &LoginSubmission) -> Result<String, AuthFlowError> {
        let email = submission
            .email
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_EMAIL.to_string());
        let profile = profile_for_email(&email, &self.issuer);
        let subject = profile.sub.clone();
        self.user_store.add_user(profile).await?;

        let code = format!("code-{}", Ulid::new());
        self.code_store
            .store_code(IssuedCode {
                code: code.clone(),
                subject,
                nonce: submission.nonce.clone().filter(|n| !n.is_empty()),
                created_at: Utc::now(),
            })
            .await?;

        let raw_redirect = submission.redirect_uri.clone().unwrap_or_default();
        let mut redirect = Url::parse(&raw_redirect)
            .map_err(|e| AuthFlowError::InvalidRedirectUri(raw_redirect.clone(), e))?;
        {
            let mut pairs = redirect.query_pairs_mut();
            pairs.append_pair("code", &code);
            if let Some(state) = submission.state.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("state", state);
            }
        }
        Ok(redirect.to_string())
    }
}
