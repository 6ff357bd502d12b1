//! Request signing and verification across every supported algorithm.

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use trustmark_core::KeyAlgorithm;
    use trustmark_httpsig::header::{SIGNATURE, SIGNATURE_INPUT};
    use trustmark_httpsig::{
        DirectoryKeyResolver, ErrorKind, MessageView, build_signature_base, parse_signature,
        sign_request, verify_request,
    };

    use crate::{components, key_fixture, providers, reference_request};

    const REFERENCE_COMPONENTS: &[&str] =
        &["@method", "@path", "@authority", "content-type", "content-length"];

    #[test]
    fn test_should_sign_and_verify_with_every_algorithm() -> anyhow::Result<()> {
        let providers = providers();
        for (index, algorithm) in KeyAlgorithm::ALL.iter().enumerate() {
            let fixture = key_fixture(*algorithm, 0x11 + u8::try_from(index)?)?;
            let mut request = reference_request()?;
            sign_request(
                &mut request,
                &components(REFERENCE_COMPONENTS)?,
                &fixture.keys,
                1_644_758_607,
                &providers,
            )?;

            let resolver = DirectoryKeyResolver::new(fixture.dir.path());
            let verified = verify_request(&MessageView::from(&request), &resolver, &providers)?;
            assert!(verified, "{algorithm} signature should verify");
        }
        Ok(())
    }

    #[test]
    fn test_should_sign_the_reference_signature_base() -> anyhow::Result<()> {
        let fixture = key_fixture(KeyAlgorithm::Ed25519, 0x21)?;
        let providers = providers();
        let mut request = reference_request()?;
        sign_request(
            &mut request,
            &components(REFERENCE_COMPONENTS)?,
            &fixture.keys,
            1_644_758_607,
            &providers,
        )?;

        let parsed = parse_signature(&MessageView::from(&request))?;
        assert_eq!(
            parsed.base,
            "\"@method\" POST\n\
             \"@path\" /foo\n\
             \"@authority\" example.com\n\
             \"content-type\" application/json\n\
             \"content-length\" 18\n\
             ;created=1644758607;keyid=\"public.key\";alg=\"ed25519\";"
        );
        Ok(())
    }

    #[test]
    fn test_should_detect_tampering_for_every_algorithm() -> anyhow::Result<()> {
        let providers = providers();
        for (index, algorithm) in KeyAlgorithm::ALL.iter().enumerate() {
            let fixture = key_fixture(*algorithm, 0x31 + u8::try_from(index)?)?;
            let mut request = reference_request()?;
            sign_request(
                &mut request,
                &components(&["@method", "@query-params", "date"])?,
                &fixture.keys,
                1,
                &providers,
            )?;
            let resolver = DirectoryKeyResolver::new(fixture.dir.path());

            let mut tampered = request.headers()[SIGNATURE].as_bytes().to_vec();
            let last = tampered.len() - 1;
            tampered[last] = if tampered[last] == b'a' { b'b' } else { b'a' };
            request
                .headers_mut()
                .insert(SIGNATURE, HeaderValue::from_bytes(&tampered)?);

            let verified = verify_request(&MessageView::from(&request), &resolver, &providers)?;
            assert!(!verified, "{algorithm} tampered signature should not verify");
        }
        Ok(())
    }

    #[test]
    fn test_should_reject_algorithm_swap() -> anyhow::Result<()> {
        let fixture = key_fixture(KeyAlgorithm::Ed25519, 0x41)?;
        let providers = providers();
        let mut request = reference_request()?;
        sign_request(&mut request, &components(&["@method"])?, &fixture.keys, 1, &providers)?;

        let input = request.headers()[SIGNATURE_INPUT]
            .to_str()?
            .replace("alg=\"ed25519\"", "alg=\"hmac-sha256\"");
        request
            .headers_mut()
            .insert(SIGNATURE_INPUT, HeaderValue::from_str(&input)?);

        let resolver = DirectoryKeyResolver::new(fixture.dir.path());
        let err = verify_request(&MessageView::from(&request), &resolver, &providers)
            .expect_err("unknown alg must be an error");
        assert_eq!(err.kind(), ErrorKind::UnsupportedAlgorithm);
        Ok(())
    }

    #[test]
    fn test_should_verify_from_request_parts() -> anyhow::Result<()> {
        let fixture = key_fixture(KeyAlgorithm::EcdsaSecp256k1, 0x51)?;
        let providers = providers();
        let mut request = reference_request()?;
        sign_request(
            &mut request,
            &components(&["@request-target", "@query", "content-type"])?,
            &fixture.keys,
            1_700_000_000,
            &providers,
        )?;

        let (parts, _body) = request.into_parts();
        let resolver = DirectoryKeyResolver::new(fixture.dir.path());
        assert!(verify_request(&MessageView::from(&parts), &resolver, &providers)?);
        Ok(())
    }

    #[test]
    fn test_should_sign_absolute_uri_components() -> anyhow::Result<()> {
        let fixture = key_fixture(KeyAlgorithm::EcdsaX509, 0x61)?;
        let providers = providers();
        let mut request = http::Request::builder()
            .method("GET")
            .uri("https://example.com/status?verbose=1")
            .body(())?;
        let list = components(&["@scheme", "@target-uri", "@authority"])?;

        let built = build_signature_base(
            &MessageView::from(&request),
            &list,
            &trustmark_httpsig::SignatureParams::new(5, "x509.pub.der", "ecdsa-x509"),
        )?;
        assert!(built.base.starts_with(
            "\"@scheme\" https\n\"@target-uri\" https://example.com/status?verbose=1\n\"@authority\" example.com\n"
        ));

        sign_request(&mut request, &list, &fixture.keys, 5, &providers)?;
        let resolver = DirectoryKeyResolver::new(fixture.dir.path());
        assert!(verify_request(&MessageView::from(&request), &resolver, &providers)?);
        Ok(())
    }
}
