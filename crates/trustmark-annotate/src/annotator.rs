//! Annotators for signature-based trust properties.
//!
//! [`PkiAnnotator`] attests to a signature embedded in a JSON payload;
//! [`HttpPkiAnnotator`] attests to the HTTP message signature of the request
//! that delivered the payload. Both sign the resulting annotation with the
//! node's own private key.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;
use trustmark_core::{AnnotationKind, HashType, LayerType, SdkConfig, SignatureInfo};
use trustmark_httpsig::{DirectoryKeyResolver, MessageView, ProviderRegistry, verify_request};

use crate::annotation::Annotation;
use crate::error::AnnotateResult;
use crate::hash::derive_hash;
use crate::signing::sign_annotation;

/// Settings shared by every annotator.
#[derive(Debug, Clone)]
struct AnnotatorContext {
    hash: HashType,
    layer: LayerType,
    host: String,
    signature: SignatureInfo,
    providers: Arc<ProviderRegistry>,
}

impl AnnotatorContext {
    fn new(config: &SdkConfig, providers: Arc<ProviderRegistry>) -> Self {
        Self {
            hash: config.hash,
            layer: config.layer,
            host: config.host.clone(),
            signature: config.signature.clone(),
            providers,
        }
    }

    /// Build the annotation for `data` and sign it with the node's private key.
    fn finish(
        &self,
        kind: AnnotationKind,
        data: &[u8],
        satisfied: bool,
    ) -> AnnotateResult<Annotation> {
        let key = derive_hash(self.hash, data);
        let mut annotation =
            Annotation::new(key, self.hash, &self.host, self.layer, kind, satisfied);
        annotation.signature =
            sign_annotation(&annotation, &self.signature.private, &self.providers)?;
        Ok(annotation)
    }
}

/// Payload shape understood by [`PkiAnnotator`].
#[derive(Debug, Deserialize)]
struct Signable {
    #[serde(default)]
    seed: String,
    #[serde(default)]
    signature: String,
}

/// Attests whether a JSON payload carries a valid signature.
///
/// The payload must be a JSON object with `seed` and `signature` string
/// properties; `signature` is checked over `seed` with the configured public key.
#[derive(Debug, Clone)]
pub struct PkiAnnotator {
    context: AnnotatorContext,
}

impl PkiAnnotator {
    /// Create an annotator from the SDK configuration.
    pub fn new(config: &SdkConfig, providers: Arc<ProviderRegistry>) -> Self {
        Self {
            context: AnnotatorContext::new(config, providers),
        }
    }

    /// Produce a signed `pki` annotation for `data`.
    ///
    /// A missing or empty `signature` property yields an unsatisfied
    /// annotation. Malformed JSON or an unusable key is an error.
    pub fn annotate(&self, data: &[u8]) -> AnnotateResult<Annotation> {
        let signable: Signable = serde_json::from_slice(data)?;
        let public = &self.context.signature.public;

        let satisfied = if signable.signature.is_empty() {
            false
        } else {
            self.context
                .providers
                .verify(public, signable.seed.as_bytes(), signable.signature.as_bytes())?
        };

        debug!(satisfied, "Checked embedded payload signature");
        self.context.finish(AnnotationKind::Pki, data, satisfied)
    }
}

/// Attests whether the request delivering a payload carries a valid HTTP
/// message signature.
///
/// The verifying key is looked up by `keyid` in the directory of the
/// configured public key.
#[derive(Debug, Clone)]
pub struct HttpPkiAnnotator {
    context: AnnotatorContext,
    resolver: DirectoryKeyResolver,
}

impl HttpPkiAnnotator {
    /// Create an annotator from the SDK configuration.
    pub fn new(config: &SdkConfig, providers: Arc<ProviderRegistry>) -> Self {
        Self {
            context: AnnotatorContext::new(config, providers),
            resolver: DirectoryKeyResolver::new(config.public_key_dir()),
        }
    }

    /// Produce a signed `pki-http` annotation for `data` received with `message`.
    ///
    /// Verification errors (malformed headers, unsupported algorithm, rejected
    /// key id, unreadable key) abort annotation.
    pub fn annotate(&self, message: &MessageView<'_>, data: &[u8]) -> AnnotateResult<Annotation> {
        let satisfied = verify_request(message, &self.resolver, &self.context.providers)?;
        self.context.finish(AnnotationKind::PkiHttp, data, satisfied)
    }
}
