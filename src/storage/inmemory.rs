//! In-memory storage backend for single-process test runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::StorageError;
use crate::oauth::types::{IssuedCode, UserProfile, canonical_user};
use crate::storage::traits::{AuthorizationCodeStore, UserStore};

/// In-memory user store, seeded with the canonical test user
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryUserStore {
    pub fn new(issuer: &str) -> Self {
        let bootstrap = canonical_user(issuer);
        let mut users = HashMap::new();
        users.insert(bootstrap.sub.clone(), bootstrap);
        Self {
            users: Mutex::new(users),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn add_user(&self, profile: UserProfile) -> Result<(), StorageError> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| StorageError::LockFailed(format!("{}", e)))?;
        users.entry(profile.sub.clone()).or_insert(profile);
        Ok(())
    }

    async fn get_user_by_subject(
        &self,
        subject: &str,
    ) -> Result<Option<UserProfile>, StorageError> {
        let users = self
            .users
            .lock()
            .map_err(|e| StorageError::LockFailed(format!("{}", e)))?;
        Ok(users.get(subject).cloned())
    }
}

/// In-memory authorization code store with delete-on-read semantics
pub struct MemoryAuthorizationCodeStore {
    codes: Mutex<HashMap<String, IssuedCode>>,
}

impl MemoryAuthorizationCodeStore {
    pub fn new() -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryAuthorizationCodeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorizationCodeStore for MemoryAuthorizationCodeStore {
    async fn store_code(&self, code: IssuedCode) -> Result<(), StorageError> {
        let mut codes = self
            .codes
            .lock()
            .map_err(|e| StorageError::LockFailed(format!("{}", e)))?;
        codes.insert(code.code.clone(), code);
        Ok(())
    }

    async fn consume_code(&self, code: &str) -> Result<Option<IssuedCode>, StorageError> {
        let mut codes = self
            .codes
            .lock()
            .map_err(|e| StorageError::LockFailed(format!("{}", e)))?;
        Ok(codes.remove(code))
    }
}
