//! Request verification.
//!
//! Verification decodes `Signature-Input`, checks `alg` against the supported
//! set, rebuilds the signature base from the live request, resolves the key
//! named by `keyid`, and asks the matching provider to verify.
//!
//! The outcome is a plain `bool`. A missing, empty, malformed or non-matching
//! `Signature` is `Ok(false)`; errors mean verification could not be attempted.

use tracing::debug;
use trustmark_core::KeyAlgorithm;

use crate::base::build_base_with_tail;
use crate::error::{SignatureError, SignatureResult};
use crate::header::{SIGNATURE, SIGNATURE_INPUT, decode_signature_input};
use crate::keys::KeyResolver;
use crate::message::MessageView;
use crate::provider::ProviderRegistry;

/// A decoded signature ready for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    /// Signature base recomputed from the request.
    pub base: String,
    /// Raw `Signature` header value; empty when the header is absent.
    pub signature: Vec<u8>,
    /// Key id from the `Signature-Input` tail.
    pub keyid: String,
    /// Validated algorithm from the `Signature-Input` tail.
    pub algorithm: KeyAlgorithm,
}

/// Decode the signature headers of a request and recompute its signature base.
///
/// The base is rebuilt from the request's own method, URI and headers using
/// the component list and raw parameter tail of `Signature-Input`.
///
/// # Errors
///
/// - [`SignatureError::MissingHeader`] if `Signature-Input` is absent.
/// - [`SignatureError::InvalidSignatureInput`] if it cannot be decoded.
/// - [`SignatureError::UnsupportedAlgorithm`] if `alg` is not a known algorithm.
/// - Any component resolution error.
pub fn parse_signature(message: &MessageView<'_>) -> SignatureResult<ParsedSignature> {
    let input = message
        .headers
        .get(SIGNATURE_INPUT)
        .ok_or(SignatureError::MissingHeader(SIGNATURE_INPUT))?
        .to_str()
        .map_err(|_| SignatureError::InvalidHeaderValue(SIGNATURE_INPUT.to_owned()))?;

    debug!(signature_input = input, "Parsing Signature-Input header");

    let decoded = decode_signature_input(input)?;
    let algorithm: KeyAlgorithm = decoded.params.alg.parse()?;
    let base = build_base_with_tail(message, &decoded.components, &decoded.tail)?;

    let signature = message
        .headers
        .get(SIGNATURE)
        .map(|value| value.as_bytes().to_vec())
        .unwrap_or_default();

    Ok(ParsedSignature {
        base,
        signature,
        keyid: decoded.params.keyid,
        algorithm,
    })
}

/// Verify the HTTP message signature carried by a request.
///
/// # Errors
///
/// Everything [`parse_signature`] reports, plus
/// [`SignatureError::UnsupportedAlgorithm`] if no provider is registered for
/// `alg`, [`SignatureError::InvalidKeyId`] if the resolver rejects `keyid`,
/// and provider errors for unreadable or malformed public keys. A signature
/// that does not match is `Ok(false)`, not an error.
///
/// # Examples
///
/// ```
/// use trustmark_httpsig::keys::DirectoryKeyResolver;
/// use trustmark_httpsig::message::MessageView;
/// use trustmark_httpsig::provider::ProviderRegistry;
/// use trustmark_httpsig::verify::verify_request;
///
/// let request = http::Request::builder()
///     .method("GET")
///     .uri("/")
///     .header("signature-input", "\"@method\";created=1;keyid=\"public.key\";alg=\"ed25519\";")
///     .header("signature", "")
///     .body(())
///     .unwrap();
///
/// let resolver = DirectoryKeyResolver::new("/nonexistent");
/// let providers = ProviderRegistry::with_defaults();
/// let verified = verify_request(&MessageView::from(&request), &resolver, &providers).unwrap();
/// assert!(!verified);
/// ```
pub fn verify_request(
    message: &MessageView<'_>,
    resolver: &dyn KeyResolver,
    providers: &ProviderRegistry,
) -> SignatureResult<bool> {
    let parsed = parse_signature(message)?;
    let provider = providers.get(parsed.algorithm)?;
    let key = resolver.resolve(&parsed.keyid, parsed.algorithm)?;

    if parsed.signature.is_empty() {
        debug!(keyid = %parsed.keyid, "Signature header is empty");
        return Ok(false);
    }

    let verified = provider.verify(&key, parsed.base.as_bytes(), &parsed.signature)?;

    debug!(
        keyid = %parsed.keyid,
        alg = %parsed.algorithm,
        verified,
        "Verified HTTP message signature"
    );

    Ok(verified)
}
