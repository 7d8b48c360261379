//! secp256k1 key management and header signing.
//!
//! # Security
//! - Private keys are loaded from hex or environment variables
//! - Keys are never logged or serialized

use alloy::primitives::B256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use sha2::{Digest, Sha256};

use crate::ledger::types::{LedgerError, LedgerResult};

/// Default environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "HYLESAGA_PRIVATE_KEY";

/// Signs transaction and batch headers.
///
/// The ledger verifies a compact `r || s` ECDSA signature over the SHA-256
/// of the header bytes, against the compressed public key in the header.
#[derive(Clone)]
pub struct Signer {
    inner: PrivateKeySigner,
    public_key: String,
}

impl Signer {
    /// Create a signer from a hex-encoded private key (with or without 0x prefix).
    pub fn from_private_key(private_key_hex: &str) -> LedgerResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let inner: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| LedgerError::Signing(format!("Invalid private key format: {}", e)))?;

        Ok(Self::from_inner(inner))
    }

    /// Load the signer from the named environment variable.
    pub fn from_env_var(var: &str) -> LedgerResult<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            LedgerError::Signing(format!("Environment variable {} not set", var))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Load the signer from `HYLESAGA_PRIVATE_KEY`.
    pub fn from_env() -> LedgerResult<Self> {
        Self::from_env_var(PRIVATE_KEY_ENV_VAR)
    }

    /// Generate a fresh random key.
    pub fn random() -> Self {
        Self::from_inner(PrivateKeySigner::random())
    }

    fn from_inner(inner: PrivateKeySigner) -> Self {
        let public_key = hex::encode(
            inner
                .credential()
                .verifying_key()
                .to_encoded_point(true)
                .as_bytes(),
        );

        tracing::debug!(public_key = %public_key, "Signer initialized");

        Self { inner, public_key }
    }

    /// Compressed SEC1 public key, hex-encoded.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Hex-encoded private key. Only meant for key generation output.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.inner.to_bytes())
    }

    /// Sign `message`, returning the 64-byte compact signature as hex.
    pub fn sign(&self, message: &[u8]) -> LedgerResult<String> {
        let digest: [u8; 32] = Sha256::digest(message).into();
        let signature = self
            .inner
            .sign_hash_sync(&B256::from(digest))
            .map_err(|e| LedgerError::Signing(format!("Signing failed: {}", e)))?;

        Ok(hex::encode(&signature.as_bytes()[..64]))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("public_key", &self.public_key)
            .finish()
    }
}
