//! Pluggable signature providers, one per key algorithm.
//!
//! A [`SignatureProvider`] reads key material from a [`KeyInfo`] and signs or
//! verifies opaque bytes. Signatures travel as lowercase hex text for every
//! algorithm so they survive text-only transports such as HTTP headers.
//!
//! Providers are collected in a [`ProviderRegistry`] once at configuration
//! time and passed by reference into the signing and verification flows.

mod ed25519;
mod secp256k1;
mod x509;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use trustmark_core::{KeyAlgorithm, KeyInfo};

use crate::error::{SignatureError, SignatureResult};

pub use ed25519::Ed25519Provider;
pub use secp256k1::Secp256k1Provider;
pub use x509::X509Provider;

/// Sign and verify bytes with keys of a single algorithm family.
///
/// Implementations must be stateless with respect to individual calls; keys
/// are read fresh on every call.
pub trait SignatureProvider: Send + Sync + fmt::Debug {
    /// The algorithm this provider handles.
    fn algorithm(&self) -> KeyAlgorithm;

    /// Sign `content` with the private key at `key`, returning the transport encoding.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::UnsupportedAlgorithm`] if `key` belongs to a
    /// different algorithm, [`SignatureError::KeyRead`] if the key cannot be
    /// read, and [`SignatureError::InvalidKey`] if it cannot be decoded.
    fn sign(&self, key: &KeyInfo, content: &[u8]) -> SignatureResult<String>;

    /// Verify `signature` (transport encoding) over `content` with the public key at `key`.
    ///
    /// A malformed or non-matching signature yields `Ok(false)`; errors are
    /// reserved for unusable keys.
    fn verify(&self, key: &KeyInfo, content: &[u8], signature: &[u8]) -> SignatureResult<bool>;
}

/// Maps algorithm tags to the provider that implements them.
///
/// # Examples
///
/// ```
/// use trustmark_core::KeyAlgorithm;
/// use trustmark_httpsig::provider::ProviderRegistry;
///
/// let registry = ProviderRegistry::with_defaults();
/// assert!(registry.get(KeyAlgorithm::Ed25519).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<KeyAlgorithm, Arc<dyn SignatureProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in provider for every supported algorithm.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Ed25519Provider::new()));
        registry.register(Arc::new(Secp256k1Provider::new()));
        registry.register(Arc::new(X509Provider::new()));
        registry
    }

    /// Register a provider, replacing any previous provider for the same algorithm.
    pub fn register(&mut self, provider: Arc<dyn SignatureProvider>) {
        self.providers.insert(provider.algorithm(), provider);
    }

    /// Look up the provider for an algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::UnsupportedAlgorithm`] if none is registered.
    pub fn get(&self, algorithm: KeyAlgorithm) -> SignatureResult<&dyn SignatureProvider> {
        self.providers
            .get(&algorithm)
            .map(Arc::as_ref)
            .ok_or_else(|| SignatureError::UnsupportedAlgorithm(algorithm.to_string()))
    }

    /// Sign `content` with the provider registered for the key's algorithm.
    pub fn sign(&self, key: &KeyInfo, content: &[u8]) -> SignatureResult<String> {
        self.get(key.kind)?.sign(key, content)
    }

    /// Verify `signature` with the provider registered for the key's algorithm.
    pub fn verify(&self, key: &KeyInfo, content: &[u8], signature: &[u8]) -> SignatureResult<bool> {
        self.get(key.kind)?.verify(key, content, signature)
    }
}

/// Reject a key whose algorithm does not match the provider, before any I/O.
fn ensure_algorithm(expected: KeyAlgorithm, key: &KeyInfo) -> SignatureResult<()> {
    if key.kind == expected {
        Ok(())
    } else {
        Err(SignatureError::UnsupportedAlgorithm(format!(
            "{} key passed to {expected} provider",
            key.kind
        )))
    }
}

fn read_key_material(path: &Path) -> SignatureResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| SignatureError::KeyRead {
        path: path.to_owned(),
        source,
    })
}

/// Read a key file containing hex text (surrounding whitespace ignored).
fn read_hex_key(path: &Path) -> SignatureResult<Vec<u8>> {
    let raw = read_key_material(path)?;
    let text = std::str::from_utf8(&raw).map_err(|_| invalid_key(path, "key file is not text"))?;
    hex::decode(text.trim()).map_err(|e| invalid_key(path, &format!("invalid hex: {e}")))
}

fn invalid_key(path: &Path, reason: &str) -> SignatureError {
    SignatureError::InvalidKey {
        path: path.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Decode a transport-encoded signature; `None` means it cannot match anything.
fn decode_signature(signature: &[u8]) -> Option<Vec<u8>> {
    let text = std::str::from_utf8(signature).ok()?;
    hex::decode(text.trim()).ok()
}
