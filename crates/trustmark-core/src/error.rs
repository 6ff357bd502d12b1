//! Error types for the Trustmark core.

/// Core error type for Trustmark configuration and vocabulary parsing.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A key algorithm tag outside the supported set.
    #[error("unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A tag that does not name any known variant of the given kind.
    #[error("invalid {kind} value: {value}")]
    InvalidValue {
        /// Which vocabulary the value was parsed against.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for Trustmark core operations.
pub type CoreResult<T> = Result<T, CoreError>;
