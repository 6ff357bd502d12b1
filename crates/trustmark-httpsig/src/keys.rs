//! Key resolution for verification.
//!
//! This module defines the [`KeyResolver`] trait for turning the `keyid` and
//! `alg` parameters of a received signature into a [`KeyInfo`], along with a
//! [`DirectoryKeyResolver`] that looks keys up by file name inside one
//! directory and a [`StaticKeyResolver`] for tests and fixed deployments.

use std::collections::HashMap;
use std::path::{Component as PathComponent, Path, PathBuf};

use tracing::warn;
use trustmark_core::{KeyAlgorithm, KeyInfo};

use crate::error::{SignatureError, SignatureResult};

/// Trait for locating the public key that verifies a signature.
///
/// Implementations decide where keys live. They must not read key material;
/// that is left to the provider so that unusable keys surface as provider
/// errors.
pub trait KeyResolver: Send + Sync {
    /// Resolve the public key named by `keyid` for `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidKeyId`] if the key id is rejected.
    fn resolve(&self, keyid: &str, algorithm: KeyAlgorithm) -> SignatureResult<KeyInfo>;
}

/// Resolves key ids as bare file names inside a single directory.
///
/// Key ids that are empty or that contain path separators, `..`, or NUL are
/// rejected, so a resolved path never leaves the directory.
///
/// # Examples
///
/// ```
/// use trustmark_core::KeyAlgorithm;
/// use trustmark_httpsig::keys::{DirectoryKeyResolver, KeyResolver};
///
/// let resolver = DirectoryKeyResolver::new("/etc/trustmark/keys");
/// let key = resolver.resolve("node.pub", KeyAlgorithm::Ed25519).unwrap();
/// assert_eq!(key.path, std::path::Path::new("/etc/trustmark/keys/node.pub"));
/// assert!(resolver.resolve("../secret.key", KeyAlgorithm::Ed25519).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryKeyResolver {
    directory: PathBuf,
}

impl DirectoryKeyResolver {
    /// Create a resolver rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory keys are resolved in.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl KeyResolver for DirectoryKeyResolver {
    fn resolve(&self, keyid: &str, algorithm: KeyAlgorithm) -> SignatureResult<KeyInfo> {
        if !is_bare_file_name(keyid) {
            warn!(keyid, "Rejected key id outside the key directory");
            return Err(SignatureError::InvalidKeyId(keyid.to_owned()));
        }
        Ok(KeyInfo::new(algorithm, self.directory.join(keyid)))
    }
}

/// An in-memory resolver backed by a `HashMap` from key id to key path.
///
/// The algorithm of the returned key is the one requested, so a mismatch
/// between the stored key and the signature is caught by the provider.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyResolver {
    keys: HashMap<String, PathBuf>,
}

impl StaticKeyResolver {
    /// Create a resolver from `(keyid, path)` pairs.
    pub fn new(keys: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl KeyResolver for StaticKeyResolver {
    fn resolve(&self, keyid: &str, algorithm: KeyAlgorithm) -> SignatureResult<KeyInfo> {
        self.keys
            .get(keyid)
            .map(|path| KeyInfo::new(algorithm, path.clone()))
            .ok_or_else(|| SignatureError::InvalidKeyId(keyid.to_owned()))
    }
}

fn is_bare_file_name(keyid: &str) -> bool {
    if keyid.is_empty() || keyid.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(keyid).components();
    matches!(
        (components.next(), components.next()),
        (Some(PathComponent::Normal(_)), None)
    )
}
