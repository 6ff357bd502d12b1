//! Annotation error types.

use trustmark_httpsig::SignatureError;

/// Errors that can occur while producing or checking an annotation.
///
/// Any error aborts annotation: a partially built annotation is never returned.
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    /// Signing or verifying failed before an outcome could be reached.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The annotation or the annotated payload is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for annotation operations.
pub type AnnotateResult<T> = Result<T, AnnotateError>;
