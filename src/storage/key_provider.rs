//! Signing key and TLS certificate provisioning.
//!
//! Key material is produced once at startup. The RSA signing key is cached at
//! a fixed path so tokens stay verifiable across simulator restarts; the TLS
//! pair is likewise reused when both files already exist. Any provisioning
//! failure aborts startup rather than serving unverifiable material.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Value, json};
use std::path::Path;

use crate::config::SigningMode;
use crate::errors::ProvisioningError;

/// Key id published in the JWKS and stamped into every RS256 token header
pub const KEY_ID: &str = "test-key-id";

/// Shared secret for the HS256 fallback mode. Tokens signed with it cannot be
/// verified through the JWKS endpoint.
pub const HMAC_SECRET: &str = "test-secret-key";

const RSA_KEY_BITS: usize = 2048;

/// Signing material held by the application state
pub enum KeyMaterial {
    Rsa {
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        /// Unpadded base64url big-endian modulus, as published in the JWKS
        modulus: String,
        /// Unpadded base64url public exponent
        exponent: String,
    },
    Hmac {
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
    },
}

impl KeyMaterial {
    /// Provision signing material for the configured mode
    pub fn provision(mode: SigningMode, rsa_key_path: &Path) -> Result<Self, ProvisioningError> {
        match mode {
            SigningMode::Rs256 => {
                let private_key = load_or_generate_signing_key(rsa_key_path)?;
                Self::from_rsa_key(&private_key)
            }
            SigningMode::Hs256 => Ok(Self::Hmac {
                encoding_key: EncodingKey::from_secret(HMAC_SECRET.as_bytes()),
                decoding_key: DecodingKey::from_secret(HMAC_SECRET.as_bytes()),
            }),
        }
    }

    fn from_rsa_key(private_key: &RsaPrivateKey) -> Result<Self, ProvisioningError> {
        let pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| ProvisioningError::KeyGenerationFailed(e.to_string()))?;
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| ProvisioningError::KeyParseFailed("<in-memory>".to_string(), e.to_string()))?;

        let public_key = RsaPublicKey::from(private_key);
        let modulus = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let exponent = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());
        let decoding_key = DecodingKey::from_rsa_components(&modulus, &exponent)
            .map_err(|e| ProvisioningError::KeyParseFailed("<in-memory>".to_string(), e.to_string()))?;

        Ok(Self::Rsa {
            encoding_key,
            decoding_key,
            modulus,
            exponent,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Rsa { .. } => Algorithm::RS256,
            Self::Hmac { .. } => Algorithm::HS256,
        }
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        match self {
            Self::Rsa { encoding_key, .. } => encoding_key,
            Self::Hmac { encoding_key, .. } => encoding_key,
        }
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        match self {
            Self::Rsa { decoding_key, .. } => decoding_key,
            Self::Hmac { decoding_key, .. } => decoding_key,
        }
    }

    /// Key id for the token header. HMAC tokens carry none.
    pub fn kid(&self) -> Option<&str> {
        match self {
            Self::Rsa { .. } => Some(KEY_ID),
            Self::Hmac { .. } => None,
        }
    }

    /// Render the JWKS document for the published key
    ///
    /// HMAC material has no public half to publish and fails closed.
    pub fn to_jwks(&self) -> Result<Value, ProvisioningError> {
        match self {
            Self::Rsa {
                modulus, exponent, ..
            } => Ok(json!({
                "keys": [{
                    "kty": "RSA",
                    "kid": KEY_ID,
                    "use": "sig",
                    "alg": "RS256",
                    "n": modulus,
                    "e": exponent,
                }]
            })),
            Self::Hmac { .. } => Err(ProvisioningError::NoPublishableKey),
        }
    }
}

/// Load the RSA signing key from its cache path, generating and persisting a
/// new 2048-bit key when the file is absent
pub fn load_or_generate_signing_key(path: &Path) -> Result<RsaPrivateKey, ProvisioningError> {
    if path.exists() {
        let pem = std::fs::read_to_string(path)
            .map_err(|e| ProvisioningError::KeyReadFailed(path.display().to_string(), e))?;
        return parse_private_key_pem(&pem)
            .map_err(|e| ProvisioningError::KeyParseFailed(path.display().to_string(), e));
    }

    tracing::info!(path = %path.display(), "Generating new RSA signing key");
    let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, RSA_KEY_BITS)
        .map_err(|e| ProvisioningError::KeyGenerationFailed(e.to_string()))?;
    let pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| ProvisioningError::KeyGenerationFailed(e.to_string()))?;
    std::fs::write(path, pem.as_bytes())
        .map_err(|e| ProvisioningError::PersistFailed(path.display().to_string(), e))?;
    Ok(private_key)
}

/// Accept PKCS#8 or PKCS#1 encodings of the cached key
fn parse_private_key_pem(pem: &str) -> Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| e.to_string())
}

/// Ensure a TLS key and certificate exist at the given cache paths
///
/// Reuses the cached pair when both files are present; otherwise generates a
/// self-signed certificate for `localhost` and writes both PEMs.
pub fn ensure_tls_certificate(key_path: &Path, cert_path: &Path) -> Result<(), ProvisioningError> {
    if key_path.exists() && cert_path.exists() {
        return Ok(());
    }

    tracing::info!(
        cert = %cert_path.display(),
        "Generating self-signed TLS certificate for localhost"
    );
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .map_err(|e| ProvisioningError::CertificateGenerationFailed(e.to_string()))?;
    std::fs::write(cert_path, certified.cert.pem())
        .map_err(|e| ProvisioningError::PersistFailed(cert_path.display().to_string(), e))?;
    std::fs::write(key_path, certified.key_pair.serialize_pem())
        .map_err(|e| ProvisioningError::PersistFailed(key_path.display().to_string(), e))?;
    Ok(())
}
