//! Error types for HTTP message signatures.
//!
//! All failures are represented by [`SignatureError`]. A signature that is
//! absent or does not match is *not* an error: verification reports it as an
//! unsatisfied outcome. The error channel is reserved for cases where signing
//! or verification could not be attempted at all.

use std::path::PathBuf;

/// Broad category of a [`SignatureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed header, unknown component, missing field, or relative URI.
    Parse,
    /// The `alg` parameter or key type is outside the supported set.
    UnsupportedAlgorithm,
    /// The key could not be located or the key id was rejected.
    KeyResolution,
    /// The key material is malformed or the provider failed to sign.
    Crypto,
}

/// Errors that can occur while signing or verifying an HTTP message.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// A required header (e.g. `Signature-Input`) is missing from the request.
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// The `Signature-Input` header could not be parsed.
    #[error("Invalid Signature-Input header: {0}")]
    InvalidSignatureInput(String),

    /// A derived component (`@...`) that is not part of the supported set.
    #[error("Unhandled derived component: {0}")]
    UnknownDerivedComponent(String),

    /// A header field listed as a component is not present on the request.
    #[error("Header field not found: {0}")]
    HeaderFieldNotFound(String),

    /// A header value is not representable as visible ASCII text.
    #[error("Invalid header value for: {0}")]
    InvalidHeaderValue(String),

    /// The component requires an absolute request URI but the request has none.
    #[error("Request URI is not absolute: {0}")]
    NonAbsoluteUri(String),

    /// The signing algorithm is not supported.
    #[error("Unrecognized key type: {0}")]
    UnsupportedAlgorithm(String),

    /// The key id would escape the configured key directory or is empty.
    #[error("Invalid key id: {0:?}")]
    InvalidKeyId(String),

    /// The key material could not be read.
    #[error("Failed to read key {}", path.display())]
    KeyRead {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The key material could not be decoded.
    #[error("Invalid key material in {}: {reason}", path.display())]
    InvalidKey {
        /// Location the key was read from.
        path: PathBuf,
        /// Why decoding failed.
        reason: String,
    },

    /// The provider failed to produce a signature.
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl SignatureError {
    /// Classify this error into one of the broad [`ErrorKind`] categories.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingHeader(_)
            | Self::InvalidSignatureInput(_)
            | Self::UnknownDerivedComponent(_)
            | Self::HeaderFieldNotFound(_)
            | Self::InvalidHeaderValue(_)
            | Self::NonAbsoluteUri(_) => ErrorKind::Parse,
            Self::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Self::InvalidKeyId(_) | Self::KeyRead { .. } => ErrorKind::KeyResolution,
            Self::InvalidKey { .. } | Self::Signing(_) => ErrorKind::Crypto,
        }
    }
}

impl From<trustmark_core::CoreError> for SignatureError {
    fn from(err: trustmark_core::CoreError) -> Self {
        match err {
            trustmark_core::CoreError::UnsupportedAlgorithm(alg) => Self::UnsupportedAlgorithm(alg),
            other => Self::InvalidSignatureInput(other.to_string()),
        }
    }
}

/// Convenience result type for signature operations.
pub type SignatureResult<T> = Result<T, SignatureError>;
