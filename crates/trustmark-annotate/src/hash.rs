//! Content hashing for annotation keys.

use md5::Md5;
use sha2::{Digest, Sha256};
use trustmark_core::HashType;

/// Derive the content key of `data` with the given hash.
///
/// Digests are lowercase hex. [`HashType::None`] uses the data itself,
/// decoded as UTF-8 with invalid sequences replaced.
///
/// # Examples
///
/// ```
/// use trustmark_annotate::derive_hash;
/// use trustmark_core::HashType;
///
/// assert_eq!(
///     derive_hash(HashType::Sha256, b"foo"),
///     "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
/// );
/// assert_eq!(derive_hash(HashType::None, b"foo"), "foo");
/// ```
#[must_use]
pub fn derive_hash(hash: HashType, data: &[u8]) -> String {
    match hash {
        HashType::Md5 => hex::encode(Md5::digest(data)),
        HashType::Sha256 => hex::encode(Sha256::digest(data)),
        HashType::None => String::from_utf8_lossy(data).into_owned(),
    }
}
