//! Storage trait definitions for users and pending authorization codes.

use crate::errors::StorageError;
use crate::oauth::types::{IssuedCode, UserProfile};
use async_trait::async_trait;

/// Storage for user profiles keyed by subject
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a profile. Existing profiles are never overwritten, so the
    /// first login with a given email fixes its identity for the process.
    async fn add_user(&self, profile: UserProfile) -> Result<(), StorageError>;

    /// Look up a profile by subject
    async fn get_user_by_subject(&self, subject: &str)
    -> Result<Option<UserProfile>, StorageError>;
}

/// Storage for pending authorization codes
#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    /// Record a freshly minted code
    async fn store_code(&self, code: IssuedCode) -> Result<(), StorageError>;

    /// Take a code out of the store. Codes are single use: a second consume
    /// of the same value returns `None`.
    async fn consume_code(&self, code: &str) -> Result<Option<IssuedCode>, StorageError>;
}
