//! Pairing metadata and the binary side channel attached to records

use serde::{Deserialize, Serialize};

/// Reference to the batch position an output record was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    /// Zero-based position of the originating input record
    pub item: usize,
}

/// Provenance linkage from an output record back to its input position(s)
///
/// Two wire-compatible shapes exist: the legacy single reference
/// (`{"item": 2}`) and the current list form (`[{"item": 2}]`). The list
/// form leaves room for many-to-one provenance; records produced by this
/// engine always carry exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pairing {
    /// Single position reference (legacy wire shape)
    Single(PairedItem),

    /// List of position references (current wire shape)
    Many(Vec<PairedItem>),
}

/// Marker selecting which pairing wire shape a node emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// Emit the single-reference pairing shape
    Legacy,

    /// Emit the list-of-references pairing shape
    #[default]
    Current,
}

/// One binary attachment carried alongside a record's fields
///
/// Payloads are base64 text and are copied verbatim; the engine never
/// inspects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryAttachment {
    /// MIME type of the payload
    pub mime_type: String,

    /// Base64-encoded payload
    pub data: String,

    /// Original file name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Original file extension, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
}

impl PairedItem {
    /// Create a reference to the given batch position
    #[must_use]
    pub fn new(item: usize) -> Self {
        Self { item }
    }
}

impl Pairing {
    /// Positions referenced by this pairing, in order
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        match self {
            Pairing::Single(paired) => vec![paired.item],
            Pairing::Many(paired) => paired.iter().map(|p| p.item).collect(),
        }
    }
}

impl SchemaVersion {
    /// Build the pairing metadata for a record produced from `index`
    #[must_use]
    pub fn pairing_for(self, index: usize) -> Pairing {
        match self {
            SchemaVersion::Legacy => Pairing::Single(PairedItem::new(index)),
            SchemaVersion::Current => Pairing::Many(vec![PairedItem::new(index)]),
        }
    }
}

impl BinaryAttachment {
    /// Create an attachment from a MIME type and base64 payload
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
            file_name: None,
            file_extension: None,
        }
    }

    /// Attach the original file name
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Attach the original file extension
    #[must_use]
    pub fn with_file_extension(mut self, file_extension: impl Into<String>) -> Self {
        self.file_extension = Some(file_extension.into());
        self
    }
}
