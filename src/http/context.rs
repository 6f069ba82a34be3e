//! Application state shared across request handlers.

use anyhow::Result;
use minijinja::Environment;
use std::sync::Arc;

use crate::config::Config;
use crate::oauth::authorize::AuthorizeFlow;
use crate::oauth::exchange::TokenExchange;
use crate::oauth::tokens::TokenService;
use crate::storage::inmemory::{MemoryAuthorizationCodeStore, MemoryUserStore};
use crate::storage::key_provider::KeyMaterial;
use crate::storage::traits::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Template engine for rendering HTML responses
    pub template_env: Environment<'static>,
    /// Signing key material, provisioned once at startup
    pub key_material: Arc<KeyMaterial>,
    /// Token signing and verification service
    pub tokens: Arc<TokenService>,
    /// Login processing and redirect construction
    pub authorize_flow: Arc<AuthorizeFlow>,
    /// Code-for-token exchange service
    pub token_exchange: Arc<TokenExchange>,
    /// User profile storage, shared with the flow services
    pub user_store: Arc<dyn UserStore>,
}

impl AppState {
    /// Wire up the full application state for a configuration
    ///
    /// Provisions the signing key, which fails loudly when the environment
    /// is misconfigured. TLS provisioning is separate and happens in the
    /// binary, just before serving.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let key_material = Arc::new(KeyMaterial::provision(
            config.signing_mode,
            &config.rsa_key_path,
        )?);
        let tokens = Arc::new(TokenService::new(key_material.clone()));

        let user_store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new(&config.issuer));
        let code_store = Arc::new(MemoryAuthorizationCodeStore::new());

        let authorize_flow = Arc::new(AuthorizeFlow::new(
            user_store.clone(),
            code_store.clone(),
            config.issuer.clone(),
        ));
        let token_exchange = Arc::new(TokenExchange::new(
            code_store,
            user_store.clone(),
            tokens.clone(),
            config.issuer.clone(),
        ));

        let template_env = crate::templates::build_env(config.version.clone())?;

        Ok(Self {
            config,
            template_env,
            key_material,
            tokens,
            authorize_flow,
            token_exchange,
            user_store,
        })
    }
}
