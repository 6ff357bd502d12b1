//! `Signature-Input` header encoding and decoding.
//!
//! Format:
//! ```text
//! "<name1>" "<name2>" ...;created=<unix-seconds>;keyid="<filename>";alg="<algorithm>";
//! ```
//!
//! The part before the first `;` is the covered component list; everything
//! after it is the parameter tail, which is appended verbatim to the
//! signature base.

use std::fmt;

use crate::component::Component;
use crate::error::{SignatureError, SignatureResult};

/// Name of the header carrying the covered components and parameters.
pub const SIGNATURE_INPUT: &str = "signature-input";

/// Name of the header carrying the encoded signature.
pub const SIGNATURE: &str = "signature";

/// Signature parameters carried in the `Signature-Input` tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParams {
    /// Creation time as unix seconds. Staleness checks are left to callers.
    pub created: Option<i64>,
    /// Bare file name of the public key that verifies the signature.
    pub keyid: String,
    /// Algorithm tag, validated by the verifier rather than the decoder.
    pub alg: String,
}

impl SignatureParams {
    /// Create parameters for a new signature.
    pub fn new(created: i64, keyid: impl Into<String>, alg: impl Into<String>) -> Self {
        Self {
            created: Some(created),
            keyid: keyid.into(),
            alg: alg.into(),
        }
    }
}

impl fmt::Display for SignatureParams {
    /// Render the parameter tail, including its leading and trailing `;`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(created) = self.created {
            write!(f, ";created={created}")?;
        }
        write!(f, ";keyid=\"{}\";alg=\"{}\";", self.keyid, self.alg)
    }
}

/// Check that a key id survives encoding into `Signature-Input` and back.
///
/// Key ids are limited to visible ASCII without `;` or `"`, so the decoded
/// tail yields the same `keyid` that was encoded.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidKeyId`] for any other key id.
pub fn validate_keyid(keyid: &str) -> SignatureResult<()> {
    let encodable = !keyid.is_empty()
        && keyid
            .bytes()
            .all(|b| b.is_ascii_graphic() && b != b';' && b != b'"');
    if encodable {
        Ok(())
    } else {
        Err(SignatureError::InvalidKeyId(keyid.to_owned()))
    }
}

/// The result of decoding a `Signature-Input` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInput {
    /// Covered components, in header order.
    pub components: Vec<Component>,
    /// Parameters extracted from the tail.
    pub params: SignatureParams,
    /// The raw tail after the first `;`, used verbatim in the signature base.
    pub tail: String,
}

/// Encode a component list and parameters as a `Signature-Input` header value.
///
/// # Examples
///
/// ```
/// use trustmark_httpsig::component::Component;
/// use trustmark_httpsig::header::{SignatureParams, encode_signature_input};
///
/// let components = vec![Component::parse("@method").unwrap(), Component::parse("content-type").unwrap()];
/// let params = SignatureParams::new(1644758607, "public.key", "ed25519");
/// assert_eq!(
///     encode_signature_input(&components, &params),
///     "\"@method\" \"content-type\";created=1644758607;keyid=\"public.key\";alg=\"ed25519\";"
/// );
/// ```
#[must_use]
pub fn encode_signature_input(components: &[Component], params: &SignatureParams) -> String {
    let names = components
        .iter()
        .map(|component| format!("\"{}\"", component.name()))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{names}{params}")
}

/// Decode a `Signature-Input` header value.
///
/// `keyid` and `alg` are required and may appear in any order within the
/// tail. `created` is optional but must be an integer when present. Unknown
/// parameters are tolerated; they remain covered through the raw tail.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidSignatureInput`] if the value has no tail,
/// a component name is not a quoted token, or a required parameter is missing,
/// and [`SignatureError::UnknownDerivedComponent`] for unsupported `@` names.
pub fn decode_signature_input(value: &str) -> SignatureResult<SignatureInput> {
    let (group, tail) = value.split_once(';').ok_or_else(|| {
        SignatureError::InvalidSignatureInput("missing signature parameters".to_owned())
    })?;

    let components = group
        .split_whitespace()
        .map(|token| {
            let name = token
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .filter(|name| !name.is_empty() && !name.contains('"'))
                .ok_or_else(|| {
                    SignatureError::InvalidSignatureInput(format!(
                        "component is not a quoted name: {token}"
                    ))
                })?;
            Component::parse(name)
        })
        .collect::<SignatureResult<Vec<_>>>()?;

    let mut created = None;
    let mut keyid = None;
    let mut alg = None;

    for param in tail.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim() {
            "created" => {
                let parsed = raw.trim().parse::<i64>().map_err(|_| {
                    SignatureError::InvalidSignatureInput(format!("invalid created value: {raw}"))
                })?;
                created = Some(parsed);
            }
            "keyid" => keyid = Some(unquote(raw)?),
            "alg" => alg = Some(unquote(raw)?),
            _ => {}
        }
    }

    let keyid = keyid.ok_or_else(|| {
        SignatureError::InvalidSignatureInput("missing keyid parameter".to_owned())
    })?;
    let alg =
        alg.ok_or_else(|| SignatureError::InvalidSignatureInput("missing alg parameter".to_owned()))?;

    Ok(SignatureInput {
        components,
        params: SignatureParams {
            created,
            keyid,
            alg,
        },
        tail: tail.to_owned(),
    })
}

fn unquote(raw: &str) -> SignatureResult<String> {
    raw.trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            SignatureError::InvalidSignatureInput(format!("parameter is not quoted: {raw}"))
        })
}
