//! Trust annotations for Trustmark.
//!
//! An [`Annotation`] records whether a trust property holds for a piece of
//! data, keyed by a hash of that data and signed by the annotating host. This
//! crate provides the annotation record, content hashing, annotation signing
//! and verification, and the signature-based annotators:
//!
//! - [`PkiAnnotator`] checks a signature embedded in a JSON payload.
//! - [`HttpPkiAnnotator`] checks the HTTP message signature of a request.

mod annotation;
mod annotator;
mod error;
mod hash;
mod signing;

pub use annotation::Annotation;
pub use annotator::{HttpPkiAnnotator, PkiAnnotator};
pub use error::{AnnotateError, AnnotateResult};
pub use hash::derive_hash;
pub use signing::{sign_annotation, verify_annotation};
