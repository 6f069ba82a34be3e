//! Environment-based configuration types for the simulator runtime.

use anyhow::Result;
use std::path::PathBuf;

use crate::errors::ConfigError;

/// HTTP server port configuration
#[derive(Clone, Copy)]
pub struct HttpPort(u16);

/// JWT signing mode selection
///
/// `Rs256` is the default: tokens are RSA-signed and verifiable against the
/// published JWKS. `Hs256` signs with the fixed shared secret instead; a
/// resource server that only trusts JWKS-published RSA keys cannot verify
/// tokens minted in that mode.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub enum SigningMode {
    Rs256,
    Hs256,
}

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    pub version: String,
    /// Port the HTTPS listener binds to
    pub http_port: HttpPort,
    /// Externally visible port, used for issuer URL construction
    pub external_port: HttpPort,
    /// Issuer URL derived from the external port, with trailing slash
    pub issuer: String,
    /// Fixed cache path for the RSA signing key PEM
    pub rsa_key_path: PathBuf,
    /// Fixed cache paths for the TLS key and certificate PEMs
    pub tls_key_path: PathBuf,
    pub tls_cert_path: PathBuf,
    pub signing_mode: SigningMode,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let http_port: HttpPort = ("PORT", default_env("PORT", "4400")).try_into()?;
        let external_port: HttpPort = match optional_env("EXTERNAL_PORT") {
            Some(value) => ("EXTERNAL_PORT", value).try_into()?,
            None => http_port,
        };
        let rsa_key_path = default_env("RSA_KEY_PATH", "/tmp/test-rsa-key.pem").into();
        let tls_key_path = default_env("TLS_KEY_PATH", "/tmp/key.pem").into();
        let tls_cert_path = default_env("TLS_CERT_PATH", "/tmp/cert.pem").into();
        let signing_mode: SigningMode = default_env("SIGNING_MODE", "rs256").try_into()?;

        Ok(Self {
            version: version()?,
            http_port,
            external_port,
            issuer: issuer(*external_port.as_ref()),
            rsa_key_path,
            tls_key_path,
            tls_cert_path,
            signing_mode,
        })
    }
}

/// Build the issuer URL for an externally visible port
///
/// The trailing slash matters: discovery endpoint URLs are produced by direct
/// concatenation onto the issuer.
pub fn issuer(external_port: u16) -> String {
    format!("https://localhost:{external_port}/")
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

impl TryFrom<(&str, String)> for HttpPort {
    type Error = anyhow::Error;

    fn try_from((name, value): (&str, String)) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(4400))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(name.to_string(), err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<String> for SigningMode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "" | "rs256" => Ok(Self::Rs256),
            "hs256" => Ok(Self::Hs256),
            other => Err(ConfigError::UnknownSigningMode(other.to_string()).into()),
        }
    }
}
