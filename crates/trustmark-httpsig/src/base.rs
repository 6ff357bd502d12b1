//! Signature base construction.
//!
//! The signature base is the exact byte sequence that is signed and verified.
//! It is never transmitted; signer and verifier each compute it from the
//! request:
//!
//! ```text
//! "<component1>" <value1>\n
//! "<component2>" <value2>\n
//! ...
//! ;<parameter tail>
//! ```
//!
//! Component order is preserved exactly as listed, and each side resolves
//! values with the same normalization rules so the bases match byte-for-byte.

use tracing::debug;

use crate::component::{Component, resolve_component};
use crate::error::SignatureResult;
use crate::header::{SignatureParams, encode_signature_input};
use crate::message::MessageView;

/// A freshly built signature base and its matching `Signature-Input` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBase {
    /// The canonical string to sign.
    pub base: String,
    /// The `Signature-Input` header value describing how `base` was built.
    pub header_value: String,
}

/// Build the signature base and `Signature-Input` header value for a request.
///
/// # Errors
///
/// The first component that cannot be resolved aborts the build with that
/// component's error; a partial base is never returned.
///
/// # Examples
///
/// ```
/// use trustmark_httpsig::base::build_signature_base;
/// use trustmark_httpsig::component::Component;
/// use trustmark_httpsig::header::SignatureParams;
/// use trustmark_httpsig::message::MessageView;
///
/// let request = http::Request::builder()
///     .method("GET")
///     .uri("/status")
///     .body(())
///     .unwrap();
/// let components = vec![Component::parse("@method").unwrap(), Component::parse("@path").unwrap()];
/// let params = SignatureParams::new(1, "public.key", "ed25519");
///
/// let built = build_signature_base(&MessageView::from(&request), &components, &params).unwrap();
/// assert_eq!(
///     built.base,
///     "\"@method\" GET\n\"@path\" /status\n;created=1;keyid=\"public.key\";alg=\"ed25519\";"
/// );
/// ```
pub fn build_signature_base(
    message: &MessageView<'_>,
    components: &[Component],
    params: &SignatureParams,
) -> SignatureResult<SignatureBase> {
    let header_value = encode_signature_input(components, params);
    let tail = params.to_string();
    let base = build_base_with_tail(message, components, tail.trim_start_matches(';'))?;

    Ok(SignatureBase { base, header_value })
}

/// Build the signature base from a component list and a raw parameter tail.
///
/// `tail` is everything after the first `;` of a `Signature-Input` value; it
/// is re-attached after a single `;` exactly as given. Verification uses this
/// form so that parameters the decoder does not interpret stay covered.
pub fn build_base_with_tail(
    message: &MessageView<'_>,
    components: &[Component],
    tail: &str,
) -> SignatureResult<String> {
    let mut base = String::new();

    for component in components {
        for resolved in resolve_component(message, component)? {
            base.push_str(&resolved.to_base_line());
        }
    }

    base.push(';');
    base.push_str(tail);

    debug!(base, "Built signature base");

    Ok(base)
}
