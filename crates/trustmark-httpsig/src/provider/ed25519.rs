//! EdDSA (Ed25519) provider.
//!
//! Key files hold hex-encoded raw key bytes: a 32-byte seed or a 64-byte
//! `seed || public` pair for private keys, and a 32-byte point for public
//! keys. Content is signed directly, without pre-hashing.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use tracing::debug;
use trustmark_core::{KeyAlgorithm, KeyInfo};

use super::{SignatureProvider, decode_signature, ensure_algorithm, invalid_key, read_hex_key};
use crate::error::SignatureResult;

/// Signs and verifies with Ed25519 keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Provider;

impl Ed25519Provider {
    /// Create a new provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn signing_key(key: &KeyInfo) -> SignatureResult<SigningKey> {
        let bytes = read_hex_key(&key.path)?;
        match bytes.len() {
            32 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&bytes);
                Ok(SigningKey::from_bytes(&seed))
            }
            64 => {
                let mut pair = [0u8; 64];
                pair.copy_from_slice(&bytes);
                SigningKey::from_keypair_bytes(&pair)
                    .map_err(|e| invalid_key(&key.path, &format!("invalid keypair: {e}")))
            }
            n => Err(invalid_key(
                &key.path,
                &format!("expected 32 or 64 key bytes, got {n}"),
            )),
        }
    }

    fn verifying_key(key: &KeyInfo) -> SignatureResult<VerifyingKey> {
        let bytes = read_hex_key(&key.path)?;
        let point: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            invalid_key(
                &key.path,
                &format!("expected 32 public key bytes, got {}", bytes.len()),
            )
        })?;
        VerifyingKey::from_bytes(&point)
            .map_err(|e| invalid_key(&key.path, &format!("invalid public key: {e}")))
    }
}

impl SignatureProvider for Ed25519Provider {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Ed25519
    }

    fn sign(&self, key: &KeyInfo, content: &[u8]) -> SignatureResult<String> {
        ensure_algorithm(self.algorithm(), key)?;
        let signing_key = Self::signing_key(key)?;
        let signature = signing_key.sign(content);
        Ok(hex::encode(signature.to_bytes()))
    }

    fn verify(&self, key: &KeyInfo, content: &[u8], signature: &[u8]) -> SignatureResult<bool> {
        ensure_algorithm(self.algorithm(), key)?;
        let verifying_key = Self::verifying_key(key)?;

        let Some(raw) = decode_signature(signature) else {
            debug!("Ed25519 signature is not valid hex");
            return Ok(false);
        };
        let Ok(signature) = Signature::from_slice(&raw) else {
            debug!(len = raw.len(), "Ed25519 signature has wrong length");
            return Ok(false);
        };

        Ok(verifying_key.verify(content, &signature).is_ok())
    }
}
