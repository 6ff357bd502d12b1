//! Common type definitions shared across Trustmark crates.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::CoreError;

/// Declares a closed set of string tags with `as_str`, `Display` and `FromStr`.
macro_rules! string_tag {
    (
        $(#[$meta:meta])*
        $name:ident, $err:expr, {
            $($(#[$vmeta:meta])* $variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            /// Every supported value, in declaration order.
            pub const ALL: &[Self] = &[$(Self::$variant),+];

            /// The wire tag for this value.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(Self::$variant),)+
                    other => Err($err(other.to_owned())),
                }
            }
        }
    };
}

fn invalid(kind: &'static str) -> impl Fn(String) -> CoreError {
    move |value| CoreError::InvalidValue { kind, value }
}

string_tag! {
    /// Algorithm family of a signing key.
    ///
    /// The tag doubles as the `alg` signature parameter on the wire.
    KeyAlgorithm, CoreError::UnsupportedAlgorithm, {
        /// EdDSA over Curve25519 with hex-encoded raw keys.
        Ed25519 => "ed25519",
        /// ECDSA over secp256k1 with a hex-encoded scalar / compressed point.
        EcdsaSecp256k1 => "ecdsa-secp256k1",
        /// ECDSA over P-256 with SEC1/PKCS#8 private and SPKI public keys.
        EcdsaX509 => "ecdsa-x509",
    }
}

string_tag! {
    /// Hash algorithm used to derive the content key of an annotation.
    HashType, invalid("hash type"), {
        /// MD5, hex-encoded.
        Md5 => "md5",
        /// SHA-256, hex-encoded.
        Sha256 => "sha256",
        /// The data itself is used as its key.
        None => "none",
    }
}

string_tag! {
    /// The trust property an annotation attests to.
    AnnotationKind, invalid("annotation kind"), {
        /// Signature embedded in the data payload.
        Pki => "pki",
        /// HTTP message signature carried in request headers.
        PkiHttp => "pki-http",
        /// Data source attestation.
        Source => "src",
        /// Transport-layer security state of the channel.
        Tls => "tls",
        /// Presence of a hardware root of trust.
        Tpm => "tpm",
    }
}

string_tag! {
    /// The pipeline layer producing an annotation.
    LayerType, invalid("layer type"), {
        /// Application layer.
        Application => "app",
        /// Operating system layer.
        Os => "os",
        /// Host layer.
        Host => "host",
    }
}

/// A reference to key material: its algorithm and where to read it from.
///
/// Key references are resolved fresh for every operation; nothing here
/// caches the material itself.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyInfo {
    /// The algorithm the key belongs to.
    #[serde(rename = "type")]
    pub kind: KeyAlgorithm,
    /// Filesystem location of the key material.
    pub path: PathBuf,
}

impl KeyInfo {
    /// Create a new key reference.
    pub fn new(kind: KeyAlgorithm, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    /// The bare file name of the key, used as the `keyid` signature parameter.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// The directory containing the key.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// The key pair a party signs with and publishes for verification.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignatureInfo {
    /// Public key; its file name is advertised as `keyid`.
    pub public: KeyInfo,
    /// Private key used to produce signatures.
    pub private: KeyInfo,
}
