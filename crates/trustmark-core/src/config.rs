//! Configuration management for Trustmark.
//!
//! All configuration is driven by environment variables. The struct is also
//! serde-deserializable for callers that keep configuration in files.

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::{HashType, KeyAlgorithm, KeyInfo, LayerType, SignatureInfo};

/// Global configuration for annotators and the signing engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    /// Hash used to derive annotation content keys.
    pub hash: HashType,
    /// Signing key pair of this node.
    pub signature: SignatureInfo,
    /// Pipeline layer annotations are attributed to.
    pub layer: LayerType,
    /// Host name recorded in annotations.
    pub host: String,
    /// Log level.
    pub log_level: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            hash: HashType::Sha256,
            signature: SignatureInfo {
                public: KeyInfo::new(KeyAlgorithm::Ed25519, "./keys/public.key"),
                private: KeyInfo::new(KeyAlgorithm::Ed25519, "./keys/private.key"),
            },
            layer: LayerType::Application,
            host: "localhost".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl SdkConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; set but invalid values are errors.
    pub fn from_env() -> CoreResult<Self> {
        let mut config = Self::default();

        if let Some(v) = parse_env::<HashType>("TRUSTMARK_HASH")? {
            config.hash = v;
        }
        if let Some(v) = parse_env::<KeyAlgorithm>("TRUSTMARK_PUBLIC_KEY_TYPE")? {
            config.signature.public.kind = v;
        }
        if let Ok(v) = std::env::var("TRUSTMARK_PUBLIC_KEY_PATH") {
            config.signature.public.path = v.into();
        }
        if let Some(v) = parse_env::<KeyAlgorithm>("TRUSTMARK_PRIVATE_KEY_TYPE")? {
            config.signature.private.kind = v;
        }
        if let Ok(v) = std::env::var("TRUSTMARK_PRIVATE_KEY_PATH") {
            config.signature.private.path = v.into();
        }
        if let Some(v) = parse_env::<LayerType>("TRUSTMARK_LAYER")? {
            config.layer = v;
        }
        if let Ok(v) = std::env::var("HOSTNAME") {
            config.host = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        debug!(
            hash = %config.hash,
            public_key = %config.signature.public.path.display(),
            layer = %config.layer,
            "Loaded SDK configuration"
        );

        Ok(config)
    }

    /// The directory that verification resolves `keyid` values against.
    #[must_use]
    pub fn public_key_dir(&self) -> &Path {
        self.signature.public.directory()
    }
}

fn parse_env<T>(name: &str) -> CoreResult<Option<T>>
where
    T: FromStr<Err = CoreError>,
{
    match std::env::var(name) {
        Ok(v) => v
            .parse()
            .map(Some)
            .map_err(|e| CoreError::Config(format!("{name}: {e}"))),
        Err(_) => Ok(None),
    }
}
