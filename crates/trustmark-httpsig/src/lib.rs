//! HTTP message signatures for Trustmark.
//!
//! This crate signs outgoing HTTP requests and verifies incoming ones. A
//! signature covers an ordered list of components (derived values such as the
//! method or path, and header fields), which are rendered into a canonical
//! signature base and signed with a pluggable per-algorithm provider.
//!
//! # Overview
//!
//! The signer attaches two headers: `Signature-Input`, listing the covered
//! components and the `created`/`keyid`/`alg` parameters, and `Signature`,
//! carrying the hex-encoded signature. The verifier decodes `Signature-Input`,
//! rebuilds the base from the request it actually received, resolves the
//! public key named by `keyid`, and checks the signature.
//!
//! # Usage
//!
//! ```rust
//! use trustmark_httpsig::component::Component;
//! use trustmark_httpsig::keys::DirectoryKeyResolver;
//! use trustmark_httpsig::provider::ProviderRegistry;
//!
//! let providers = ProviderRegistry::with_defaults();
//! let resolver = DirectoryKeyResolver::new("/etc/trustmark/keys");
//! let components = vec![Component::parse("@method").unwrap(), Component::parse("@path").unwrap()];
//!
//! // Sign with `sign_request(&mut request, &components, &keys, created, &providers)`.
//! // Verify with `verify_request(&MessageView::from(&request), &resolver, &providers)`.
//! ```
//!
//! # Modules
//!
//! - [`base`] - Signature base construction
//! - [`component`] - Component identifiers and their resolution against a request
//! - [`error`] - Signature error types
//! - [`header`] - `Signature-Input` encoding and decoding
//! - [`keys`] - Key resolver trait and directory/in-memory implementations
//! - [`message`] - Borrowed request snapshot
//! - [`provider`] - Per-algorithm sign/verify providers and their registry
//! - [`sign`] - Request signing
//! - [`verify`] - Request verification

pub mod base;
pub mod component;
pub mod error;
pub mod header;
pub mod keys;
pub mod message;
pub mod provider;
pub mod sign;
pub mod verify;

pub use base::{SignatureBase, build_signature_base};
pub use component::{Component, DerivedComponent};
pub use error::{ErrorKind, SignatureError, SignatureResult};
pub use header::{
    SignatureInput, SignatureParams, decode_signature_input, encode_signature_input, validate_keyid,
};
pub use keys::{DirectoryKeyResolver, KeyResolver, StaticKeyResolver};
pub use message::MessageView;
pub use provider::{ProviderRegistry, SignatureProvider};
pub use sign::{SignatureHeaders, sign_message, sign_request};
pub use verify::{ParsedSignature, parse_signature, verify_request};
