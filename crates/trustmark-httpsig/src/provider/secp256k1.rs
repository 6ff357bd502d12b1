//! ECDSA over secp256k1 with raw key material.
//!
//! Private key files hold the hex-encoded 32-byte scalar; public key files
//! hold a hex-encoded SEC1 point (compressed in practice). Content is hashed
//! with SHA-256 and the digest is signed. Signatures are the fixed-width
//! 64-byte `r || s` form, hex-encoded.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use tracing::debug;
use trustmark_core::{KeyAlgorithm, KeyInfo};

use super::{SignatureProvider, decode_signature, ensure_algorithm, invalid_key, read_hex_key};
use crate::error::{SignatureError, SignatureResult};

/// Signs and verifies with secp256k1 keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Provider;

impl Secp256k1Provider {
    /// Create a new provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SignatureProvider for Secp256k1Provider {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::EcdsaSecp256k1
    }

    fn sign(&self, key: &KeyInfo, content: &[u8]) -> SignatureResult<String> {
        ensure_algorithm(self.algorithm(), key)?;
        let scalar = read_hex_key(&key.path)?;
        let signing_key = SigningKey::from_slice(&scalar)
            .map_err(|e| invalid_key(&key.path, &format!("invalid secp256k1 scalar: {e}")))?;

        let digest = Sha256::digest(content);
        let signature: Signature =
            PrehashSigner::<Signature>::sign_prehash(&signing_key, digest.as_slice())
                .map_err(|e| SignatureError::Signing(e.to_string()))?;

        Ok(hex::encode(signature.to_bytes()))
    }

    fn verify(&self, key: &KeyInfo, content: &[u8], signature: &[u8]) -> SignatureResult<bool> {
        ensure_algorithm(self.algorithm(), key)?;
        let point = read_hex_key(&key.path)?;
        let verifying_key = VerifyingKey::from_sec1_bytes(&point)
            .map_err(|e| invalid_key(&key.path, &format!("invalid secp256k1 point: {e}")))?;

        let Some(raw) = decode_signature(signature) else {
            debug!("secp256k1 signature is not valid hex");
            return Ok(false);
        };
        let Ok(signature) = Signature::from_slice(&raw) else {
            debug!(len = raw.len(), "secp256k1 signature is not a 64-byte r || s pair");
            return Ok(false);
        };

        let digest = Sha256::digest(content);
        Ok(verifying_key
            .verify_prehash(digest.as_slice(), &signature)
            .is_ok())
    }
}
