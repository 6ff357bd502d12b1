//! Request signing.
//!
//! Signing builds the signature base for the chosen components, signs it with
//! the provider registered for the key algorithm, and produces the
//! `Signature-Input`/`Signature` header pair. The request is only modified once
//! a signature has been produced.

use http::{HeaderMap, HeaderValue, Request};
use tracing::debug;
use trustmark_core::SignatureInfo;

use crate::base::build_signature_base;
use crate::component::Component;
use crate::error::{SignatureError, SignatureResult};
use crate::header::{SIGNATURE, SIGNATURE_INPUT, SignatureParams, validate_keyid};
use crate::message::MessageView;
use crate::provider::ProviderRegistry;

/// The header pair produced by signing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    /// Value for the `Signature-Input` header.
    pub signature_input: String,
    /// Value for the `Signature` header.
    pub signature: String,
}

impl SignatureHeaders {
    /// Write both headers onto `headers`, replacing any previous values.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidHeaderValue`] if either value is not a
    /// valid header value; `headers` is left untouched in that case.
    pub fn apply(self, headers: &mut HeaderMap) -> SignatureResult<()> {
        let input = HeaderValue::try_from(self.signature_input)
            .map_err(|_| SignatureError::InvalidHeaderValue(SIGNATURE_INPUT.to_owned()))?;
        let signature = HeaderValue::try_from(self.signature)
            .map_err(|_| SignatureError::InvalidHeaderValue(SIGNATURE.to_owned()))?;
        headers.insert(SIGNATURE_INPUT, input);
        headers.insert(SIGNATURE, signature);
        Ok(())
    }
}

/// Sign a request snapshot and return the headers to attach.
///
/// The `keyid` parameter is the file name of `keys.public` and `alg` is its
/// algorithm tag; the base is signed with `keys.private`.
///
/// # Errors
///
/// - [`SignatureError::InvalidKeyId`] if the public key path has no file name,
///   or the file name is not visible ASCII free of `;` and `"`.
/// - [`SignatureError::UnsupportedAlgorithm`] if the key pair mixes algorithms
///   or no provider is registered, before any key is read.
/// - Any component resolution error, before the provider is called.
/// - Provider errors for unreadable or malformed private keys.
pub fn sign_message(
    message: &MessageView<'_>,
    components: &[Component],
    keys: &SignatureInfo,
    created: i64,
    providers: &ProviderRegistry,
) -> SignatureResult<SignatureHeaders> {
    let keyid = keys
        .public
        .file_name()
        .ok_or_else(|| SignatureError::InvalidKeyId(keys.public.path.display().to_string()))?;
    validate_keyid(keyid)?;

    if keys.private.kind != keys.public.kind {
        return Err(SignatureError::UnsupportedAlgorithm(format!(
            "private key type {} does not match public key type {}",
            keys.private.kind, keys.public.kind
        )));
    }
    let provider = providers.get(keys.private.kind)?;

    let params = SignatureParams::new(created, keyid, keys.public.kind.as_str());
    let built = build_signature_base(message, components, &params)?;
    let signature = provider.sign(&keys.private, built.base.as_bytes())?;

    debug!(
        keyid,
        alg = %keys.public.kind,
        components = components.len(),
        "Signed HTTP message"
    );

    Ok(SignatureHeaders {
        signature_input: built.header_value,
        signature,
    })
}

/// Sign `request` and attach the `Signature-Input` and `Signature` headers.
///
/// # Errors
///
/// Same as [`sign_message`]; on error the request is not modified.
pub fn sign_request<B>(
    request: &mut Request<B>,
    components: &[Component],
    keys: &SignatureInfo,
    created: i64,
    providers: &ProviderRegistry,
) -> SignatureResult<()> {
    let headers = sign_message(
        &MessageView::from(&*request),
        components,
        keys,
        created,
        providers,
    )?;
    headers.apply(request.headers_mut())
}
