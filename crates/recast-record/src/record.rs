//! Record representation flowing through the assignment engine
#![allow(clippy::must_use_candidate)] // Builder/constructor API intentionally omits pervasive #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent builder methods return Self for ergonomics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metadata::{BinaryAttachment, Pairing};

/// One unit of structured data: an ordered field mapping plus optional
/// binary attachments and pairing metadata
///
/// Records are immutable by convention: every processing stage builds a new
/// record rather than mutating one it received. On the wire the field mapping
/// lives under `"json"`, attachments under `"binary"`, and pairing under
/// `"pairedItem"`; absent channels are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Field mapping, in insertion order
    #[serde(rename = "json", default)]
    pub fields: Map<String, Value>,

    /// Binary attachments keyed by property name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BTreeMap<String, BinaryAttachment>>,

    /// Provenance linkage back to the originating batch position(s)
    #[serde(rename = "pairedItem", default, skip_serializing_if = "Option::is_none")]
    pub pairing: Option<Pairing>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from a field mapping
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            binary: None,
            pairing: None,
        }
    }

    /// Attach binary data
    pub fn with_binary(mut self, binary: BTreeMap<String, BinaryAttachment>) -> Self {
        self.binary = Some(binary);
        self
    }

    /// Attach pairing metadata
    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = Some(pairing);
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Whether the record carries any binary attachments
    pub fn has_binary(&self) -> bool {
        self.binary.as_ref().is_some_and(|b| !b.is_empty())
    }
}
