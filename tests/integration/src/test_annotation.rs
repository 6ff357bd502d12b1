//! Annotation of signed payloads and signed HTTP requests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use trustmark_annotate::{
        Annotation, HttpPkiAnnotator, PkiAnnotator, derive_hash, verify_annotation,
    };
    use trustmark_core::{AnnotationKind, HashType, KeyAlgorithm};
    use trustmark_httpsig::{MessageView, sign_request};

    use crate::{components, key_fixture, providers, reference_request};

    #[test]
    fn test_should_annotate_signed_request_for_every_algorithm() -> anyhow::Result<()> {
        let providers = providers();
        for (index, algorithm) in KeyAlgorithm::ALL.iter().enumerate() {
            let fixture = key_fixture(*algorithm, 0x71 + u8::try_from(index)?)?;
            let config = fixture.config();
            let mut request = reference_request()?;
            sign_request(
                &mut request,
                &components(&["@method", "@path", "@authority", "content-type"])?,
                &fixture.keys,
                1_644_758_607,
                &providers,
            )?;

            let annotator = HttpPkiAnnotator::new(&config, Arc::clone(&providers));
            let annotation =
                annotator.annotate(&MessageView::from(&request), request.body())?;

            assert!(annotation.is_satisfied, "{algorithm} request should be satisfied");
            assert_eq!(annotation.kind, AnnotationKind::PkiHttp);
            assert_eq!(annotation.host, "integration-host");
            assert_eq!(annotation.key, derive_hash(HashType::Sha256, request.body()));
            assert!(verify_annotation(&annotation, &fixture.keys.public, &providers)?);
        }
        Ok(())
    }

    #[test]
    fn test_should_annotate_unsigned_request_as_unsatisfied() -> anyhow::Result<()> {
        let fixture = key_fixture(KeyAlgorithm::Ed25519, 0x81)?;
        let providers = providers();
        let mut request = reference_request()?;
        request.headers_mut().insert(
            "signature-input",
            http::HeaderValue::from_static(
                "\"@method\";created=1;keyid=\"public.key\";alg=\"ed25519\";",
            ),
        );
        request
            .headers_mut()
            .insert("signature", http::HeaderValue::from_static(""));

        let annotator = HttpPkiAnnotator::new(&fixture.config(), Arc::clone(&providers));
        let annotation = annotator.annotate(&MessageView::from(&request), request.body())?;
        assert!(!annotation.is_satisfied);
        Ok(())
    }

    #[test]
    fn test_should_annotate_payload_signature_and_survive_json_transport() -> anyhow::Result<()> {
        let fixture = key_fixture(KeyAlgorithm::Ed25519, 0x91)?;
        let providers = providers();
        let seed = "reading-42";
        let signature = providers.sign(&fixture.keys.private, seed.as_bytes())?;
        let data = serde_json::to_vec(&serde_json::json!({ "seed": seed, "signature": signature }))?;

        let annotation = PkiAnnotator::new(&fixture.config(), Arc::clone(&providers)).annotate(&data)?;
        assert!(annotation.is_satisfied);

        let transported: Annotation = serde_json::from_slice(&serde_json::to_vec(&annotation)?)?;
        assert_eq!(transported, annotation);
        assert!(verify_annotation(&transported, &fixture.keys.public, &providers)?);
        Ok(())
    }
}
