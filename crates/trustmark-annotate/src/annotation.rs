//! The annotation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trustmark_core::{AnnotationKind, HashType, LayerType};
use uuid::Uuid;

/// One attested trust property of a piece of data.
///
/// Annotations are created once per unit of data, signed once, and treated as
/// immutable afterwards. The signature covers the JSON form of the annotation
/// with `signature` left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique id of the annotation itself.
    pub id: Uuid,
    /// Content key of the annotated data, derived with `hash`.
    pub key: String,
    /// Hash used to derive `key`.
    pub hash: HashType,
    /// Host that produced the annotation.
    pub host: String,
    /// Pipeline layer that produced the annotation.
    pub layer: LayerType,
    /// Trust property being attested.
    pub kind: AnnotationKind,
    /// Signature of the annotating host, empty until signed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
    /// Whether the attested property holds.
    pub is_satisfied: bool,
    /// When the annotation was created.
    pub timestamp: DateTime<Utc>,
}

impl Annotation {
    /// Create an unsigned annotation with a fresh id and the current time.
    pub fn new(
        key: impl Into<String>,
        hash: HashType,
        host: impl Into<String>,
        layer: LayerType,
        kind: AnnotationKind,
        is_satisfied: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            hash,
            host: host.into(),
            layer,
            kind,
            signature: String::new(),
            is_satisfied,
            timestamp: Utc::now(),
        }
    }
}
