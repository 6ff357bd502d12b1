//! End-to-end tests for Trustmark.
//!
//! Key pairs for every supported algorithm are written to temporary
//! directories, requests are signed and verified across crate boundaries,
//! and annotations are produced from the results.
//!
//! Run them with:
//! ```text
//! cargo test -p trustmark-integration
//! ```

use std::sync::{Arc, Once};

use anyhow::Context;
use p256::pkcs8::{EncodePublicKey, LineEnding};
use tempfile::TempDir;
use trustmark_core::{KeyAlgorithm, KeyInfo, SdkConfig, SignatureInfo};
use trustmark_httpsig::{Component, ProviderRegistry};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A key pair written to a temporary directory.
///
/// The directory lives as long as the fixture.
#[derive(Debug)]
pub struct KeyFixture {
    /// Directory holding both key files.
    pub dir: TempDir,
    /// The key pair.
    pub keys: SignatureInfo,
}

impl KeyFixture {
    /// An SDK configuration that signs and verifies with this key pair.
    #[must_use]
    pub fn config(&self) -> SdkConfig {
        SdkConfig {
            signature: self.keys.clone(),
            host: "integration-host".to_owned(),
            ..SdkConfig::default()
        }
    }
}

/// Write a deterministic key pair for `algorithm`, derived from `seed`.
pub fn key_fixture(algorithm: KeyAlgorithm, seed: u8) -> anyhow::Result<KeyFixture> {
    init_tracing();

    let dir = tempfile::tempdir().context("create key directory")?;
    let secret = [seed; 32];

    let (private_name, public_name, private_bytes, public_bytes) = match algorithm {
        KeyAlgorithm::Ed25519 => {
            let key = ed25519_dalek::SigningKey::from_bytes(&secret);
            (
                "private.key",
                "public.key",
                hex::encode(key.to_keypair_bytes()).into_bytes(),
                hex::encode(key.verifying_key().to_bytes()).into_bytes(),
            )
        }
        KeyAlgorithm::EcdsaSecp256k1 => {
            let key = k256::ecdsa::SigningKey::from_slice(&secret)
                .context("derive secp256k1 key")?;
            let point = key.verifying_key().to_encoded_point(true);
            (
                "secp256k1.key",
                "secp256k1.pub",
                hex::encode(secret).into_bytes(),
                hex::encode(point.as_bytes()).into_bytes(),
            )
        }
        KeyAlgorithm::EcdsaX509 => {
            let key = p256::SecretKey::from_slice(&secret).context("derive P-256 key")?;
            let private = key.to_sec1_pem(LineEnding::LF).context("encode SEC1 key")?;
            let public = key
                .public_key()
                .to_public_key_der()
                .context("encode SPKI key")?;
            (
                "x509.pem",
                "x509.pub.der",
                private.as_bytes().to_vec(),
                public.as_bytes().to_vec(),
            )
        }
    };

    let private_path = dir.path().join(private_name);
    let public_path = dir.path().join(public_name);
    std::fs::write(&private_path, private_bytes).context("write private key")?;
    std::fs::write(&public_path, public_bytes).context("write public key")?;

    Ok(KeyFixture {
        dir,
        keys: SignatureInfo {
            public: KeyInfo::new(algorithm, public_path),
            private: KeyInfo::new(algorithm, private_path),
        },
    })
}

/// The shared provider registry.
#[must_use]
pub fn providers() -> Arc<ProviderRegistry> {
    Arc::new(ProviderRegistry::with_defaults())
}

/// Parse a list of component identifiers.
pub fn components(names: &[&str]) -> anyhow::Result<Vec<Component>> {
    names
        .iter()
        .map(|name| Component::parse(name).with_context(|| format!("parse component {name}")))
        .collect()
}

/// The reference request: `POST /foo?var1=&var2=2` to `example.com` with a JSON body.
pub fn reference_request() -> anyhow::Result<http::Request<Vec<u8>>> {
    let body = br#"{"hello":"world!"}"#.to_vec();
    http::Request::builder()
        .method("POST")
        .uri("/foo?var1=&var2=2")
        .header("host", "example.com")
        .header("date", "Tue, 20 Apr 2021 02:07:55 GMT")
        .header("content-type", "application/json")
        .header("content-length", "18")
        .body(body)
        .context("build reference request")
}

mod test_annotation;
mod test_signing;
