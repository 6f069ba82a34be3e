//! Standardized error types following the `error-authsim-<domain>-<number>` format.

use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when a port cannot be parsed
    #[error("error-authsim-config-1 Parsing {0} into u16 failed: {1:?}")]
    PortParsingFailed(String, std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-authsim-config-2 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when SIGNING_MODE is not a supported value
    #[error("error-authsim-config-3 Unknown signing mode '{0}': expected rs256 or hs256")]
    UnknownSigningMode(String),
}

/// Key and certificate provisioning errors
///
/// These indicate environment misconfiguration rather than caller error and
/// must abort startup instead of degrading into unverifiable key material.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// Error when the RSA key file cannot be read
    #[error("error-authsim-provision-1 Failed to read RSA key '{0}': {1}")]
    KeyReadFailed(String, std::io::Error),

    /// Error when the RSA key file is not a usable private key
    #[error("error-authsim-provision-2 Failed to parse RSA key '{0}': {1}")]
    KeyParseFailed(String, String),

    /// Error when in-process RSA key generation fails
    #[error("error-authsim-provision-3 RSA key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Error when key or certificate material cannot be persisted
    #[error("error-authsim-provision-4 Failed to write '{0}': {1}")]
    PersistFailed(String, std::io::Error),

    /// Error when self-signed certificate generation fails
    #[error("error-authsim-provision-5 TLS certificate generation failed: {0}")]
    CertificateGenerationFailed(String),

    /// Error when JWKS publication is requested without RSA key material
    #[error("error-authsim-provision-6 No RSA key material available for JWKS publication")]
    NoPublishableKey,
}

/// Authorization flow errors
#[derive(Debug, Error)]
pub enum AuthFlowError {
    /// Error when the client supplied a redirect URI that is not an absolute URL
    #[error("error-authsim-flow-1 Invalid redirect URI '{0}': {1}")]
    InvalidRedirectUri(String, url::ParseError),

    /// Error from the underlying code or user store
    #[error("error-authsim-flow-2 Storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Token issuance and verification errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Error when the token request is not a valid authorization_code grant
    #[error("error-authsim-token-1 Invalid grant: {0}")]
    InvalidGrant(String),

    /// Error when JWT signing fails
    #[error("error-authsim-token-2 Token signing failed: {0}")]
    SigningFailed(String),

    /// Error when JWT verification fails
    #[error("error-authsim-token-3 Token verification failed: {0}")]
    VerificationFailed(String),

    /// Error from the underlying code or user store
    #[error("error-authsim-token-4 Storage failure during exchange: {0}")]
    Storage(#[from] StorageError),
}

/// In-memory storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when a shared map lock is poisoned
    #[error("error-authsim-storage-1 Lock error: {0}")]
    LockFailed(String),
}
