//! JWT issuance and verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Header, Validation, decode, encode};
use std::sync::Arc;

use crate::errors::TokenError;
use crate::oauth::types::{TOKEN_TTL_SECONDS, TokenClaims, UserProfile};
use crate::storage::key_provider::KeyMaterial;

impl TokenClaims {
    /// Build the claim set for a profile at issuance time
    ///
    /// `nonce` is included only when the login that produced this token
    /// carried one.
    pub fn from_profile(profile: &UserProfile, nonce: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            sub: profile.sub.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            given_name: profile.given_name.clone(),
            family_name: profile.family_name.clone(),
            picture: profile.picture.clone(),
            aud: profile.aud.clone(),
            iss: profile.iss.clone(),
            azp: profile.azp.clone(),
            scope: profile.scope.clone(),
            nonce,
            iat: now.timestamp(),
            exp: now.timestamp() + TOKEN_TTL_SECONDS,
        }
    }
}

/// Signs and verifies tokens with the provisioned key material
pub struct TokenService {
    key_material: Arc<KeyMaterial>,
}

impl TokenService {
    pub fn new(key_material: Arc<KeyMaterial>) -> Self {
        Self { key_material }
    }

    /// Sign a claim set. RS256 tokens carry the published `kid` so JWKS
    /// consumers can select the verification key.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let mut header = Header::new(self.key_material.algorithm());
        header.kid = self.key_material.kid().map(|kid| kid.to_string());
        encode(&header, claims, self.key_material.encoding_key())
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.key_material.algorithm());
        validation.validate_aud = false;
        decode::<TokenClaims>(token, self.key_material.decoding_key(), &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::VerificationFailed(e.to_string()))
    }
}
