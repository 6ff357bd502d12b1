//! Signing and verifying annotations.

use tracing::debug;
use trustmark_core::KeyInfo;
use trustmark_httpsig::ProviderRegistry;

use crate::annotation::Annotation;
use crate::error::AnnotateResult;

/// Sign the JSON form of `annotation` (with `signature` empty) using `key`.
///
/// Returns the signature; the caller stores it in `annotation.signature`.
pub fn sign_annotation(
    annotation: &Annotation,
    key: &KeyInfo,
    providers: &ProviderRegistry,
) -> AnnotateResult<String> {
    let content = unsigned_json(annotation)?;
    let signature = providers.sign(key, &content)?;
    debug!(id = %annotation.id, kind = %annotation.kind, "Signed annotation");
    Ok(signature)
}

/// Verify the signature stored on `annotation` using the public key `key`.
///
/// An empty signature is `Ok(false)` without reading the key.
pub fn verify_annotation(
    annotation: &Annotation,
    key: &KeyInfo,
    providers: &ProviderRegistry,
) -> AnnotateResult<bool> {
    let provider = providers.get(key.kind)?;
    if annotation.signature.is_empty() {
        return Ok(false);
    }
    let content = unsigned_json(annotation)?;
    Ok(provider.verify(key, &content, annotation.signature.as_bytes())?)
}

fn unsigned_json(annotation: &Annotation) -> AnnotateResult<Vec<u8>> {
    let unsigned = Annotation {
        signature: String::new(),
        ..annotation.clone()
    };
    Ok(serde_json::to_vec(&unsigned)?)
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::SigningKey;
    use trustmark_core::{AnnotationKind, HashType, KeyAlgorithm, LayerType, SignatureInfo};

    use super::*;
    use crate::error::AnnotateError;

    fn write_keys(dir: &tempfile::TempDir) -> SignatureInfo {
        let signing_key = SigningKey::from_bytes(&[11u8; 32]);
        let private = dir.path().join("private.key");
        let public = dir.path().join("public.key");
        std::fs::write(&private, hex::encode(signing_key.to_bytes())).unwrap();
        std::fs::write(&public, hex::encode(signing_key.verifying_key().to_bytes())).unwrap();
        SignatureInfo {
            public: KeyInfo::new(KeyAlgorithm::Ed25519, public),
            private: KeyInfo::new(KeyAlgorithm::Ed25519, private),
        }
    }

    fn sample() -> Annotation {
        Annotation::new(
            "key",
            HashType::Md5,
            "host",
            LayerType::Application,
            AnnotationKind::Pki,
            false,
        )
    }

    #[test]
    fn test_should_sign_and_verify_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let keys = write_keys(&dir);
        let providers = ProviderRegistry::with_defaults();

        let mut annotation = sample();
        annotation.signature = sign_annotation(&annotation, &keys.private, &providers).unwrap();
        assert!(verify_annotation(&annotation, &keys.public, &providers).unwrap());

        annotation.is_satisfied = true;
        assert!(!verify_annotation(&annotation, &keys.public, &providers).unwrap());
    }

    #[test]
    fn test_should_treat_unsigned_annotation_as_unverified() {
        let key = KeyInfo::new(KeyAlgorithm::Ed25519, "/nonexistent/public.key");
        let providers = ProviderRegistry::with_defaults();
        assert!(!verify_annotation(&sample(), &key, &providers).unwrap());
    }

    #[test]
    fn test_should_surface_missing_private_key() {
        let key = KeyInfo::new(KeyAlgorithm::Ed25519, "/nonexistent/private.key");
        let providers = ProviderRegistry::with_defaults();
        let result = sign_annotation(&sample(), &key, &providers);
        assert!(matches!(result, Err(AnnotateError::Signature(_))));
    }
}
