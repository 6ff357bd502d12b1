//! Core types and configuration for Trustmark.
//!
//! This crate provides the vocabulary shared by the signing engine and the
//! annotators built on top of it: key algorithms and key references, content
//! hash types, annotation kinds, pipeline layers, and the environment-driven
//! SDK configuration.

mod config;
mod error;
mod types;

pub use config::SdkConfig;
pub use error::{CoreError, CoreResult};
pub use types::{AnnotationKind, HashType, KeyAlgorithm, KeyInfo, LayerType, SignatureInfo};
