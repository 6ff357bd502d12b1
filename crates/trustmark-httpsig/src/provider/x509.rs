//! ECDSA over P-256 with standard encoded key material.
//!
//! Private keys are SEC1 (`EC PRIVATE KEY`) or PKCS#8 documents; public keys
//! are SubjectPublicKeyInfo documents. Both may be DER or PEM. Content is
//! hashed with SHA-256 before signing.
//!
//! Signing emits ASN.1 DER. Verification accepts DER and also the fixed-width
//! 64-byte `r || s` form, so signatures from either encoding verify.

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use p256::{PublicKey, SecretKey};
use sha2::{Digest, Sha256};
use tracing::debug;
use trustmark_core::{KeyAlgorithm, KeyInfo};

use super::{
    SignatureProvider, decode_signature, ensure_algorithm, invalid_key, read_key_material,
};
use crate::error::{SignatureError, SignatureResult};

const PEM_PREFIX: &str = "-----BEGIN";

/// Width of one scalar in the fixed-width signature encoding.
const SCALAR_LEN: usize = 32;

/// Signs and verifies with P-256 keys stored in SEC1, PKCS#8 or SPKI form.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509Provider;

impl X509Provider {
    /// Create a new provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn secret_key(key: &KeyInfo) -> SignatureResult<SecretKey> {
        let raw = read_key_material(&key.path)?;
        let parsed = match pem_text(&raw) {
            Some(pem) => SecretKey::from_sec1_pem(pem)
                .or_else(|_| SecretKey::from_pkcs8_pem(pem).map_err(|e| e.to_string())),
            None => SecretKey::from_sec1_der(&raw)
                .or_else(|_| SecretKey::from_pkcs8_der(&raw).map_err(|e| e.to_string())),
        };
        parsed.map_err(|reason| {
            invalid_key(&key.path, &format!("not a P-256 EC private key: {reason}"))
        })
    }

    fn public_key(key: &KeyInfo) -> SignatureResult<PublicKey> {
        let raw = read_key_material(&key.path)?;
        let parsed = match pem_text(&raw) {
            Some(pem) => PublicKey::from_public_key_pem(pem),
            None => PublicKey::from_public_key_der(&raw),
        };
        parsed.map_err(|e| invalid_key(&key.path, &format!("not a P-256 PKIX public key: {e}")))
    }
}

impl SignatureProvider for X509Provider {
    fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::EcdsaX509
    }

    fn sign(&self, key: &KeyInfo, content: &[u8]) -> SignatureResult<String> {
        ensure_algorithm(self.algorithm(), key)?;
        let signing_key = SigningKey::from(Self::secret_key(key)?);

        let digest = Sha256::digest(content);
        let signature: Signature =
            PrehashSigner::<Signature>::sign_prehash(&signing_key, digest.as_slice())
                .map_err(|e| SignatureError::Signing(e.to_string()))?;

        Ok(hex::encode(signature.to_der().as_bytes()))
    }

    fn verify(&self, key: &KeyInfo, content: &[u8], signature: &[u8]) -> SignatureResult<bool> {
        ensure_algorithm(self.algorithm(), key)?;
        let verifying_key = VerifyingKey::from(Self::public_key(key)?);

        let Some(raw) = decode_signature(signature) else {
            debug!("ECDSA signature is not valid hex");
            return Ok(false);
        };
        let Some(signature) = parse_signature(&raw) else {
            debug!(len = raw.len(), "ECDSA signature is neither DER nor r || s");
            return Ok(false);
        };

        let digest = Sha256::digest(content);
        Ok(verifying_key
            .verify_prehash(digest.as_slice(), &signature)
            .is_ok())
    }
}

/// Parse a DER signature, falling back to two fixed-width big-endian scalars.
fn parse_signature(raw: &[u8]) -> Option<Signature> {
    if let Ok(signature) = Signature::from_der(raw) {
        return Some(signature);
    }
    if raw.len() == 2 * SCALAR_LEN {
        return Signature::from_slice(raw).ok();
    }
    None
}

fn pem_text(raw: &[u8]) -> Option<&str> {
    std::str::from_utf8(raw)
        .ok()
        .map(str::trim)
        .filter(|text| text.starts_with(PEM_PREFIX))
}
