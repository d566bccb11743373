//! Output-shaping options handed through to the parser and composer

use serde::{Deserialize, Serialize};

/// How the composed record relates to the original input record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Output fields are exactly the new document; input fields are dropped
    KeepOnlySet,

    /// New fields are applied on top of the input record's fields
    #[default]
    Merge,
}

/// Conflict resolution when a new value lands on an existing key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The new value replaces the slot wholesale
    #[default]
    Shallow,

    /// Mappings merge recursively; anything else replaces the slot
    Deep,
}

/// Parser tolerance for resolver output that is still a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseTolerance {
    /// A resolved string is a scalar and therefore a structure error
    #[default]
    Strict,

    /// A resolved string gets one re-parse as JSON before failing
    Lenient,
}

/// Option bundle shaping the composed output record
///
/// Opaque pass-through configuration: the executor hands it to the parser
/// and composer without interpreting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Composition mode
    pub mode: OutputMode,

    /// Conflict policy applied in merge mode
    pub merge_policy: MergePolicy,

    /// Expand field names containing `.` into nested structure
    pub dot_notation: bool,

    /// Copy the input record's binary attachments to the output
    pub include_binary: bool,

    /// Parser tolerance for string-typed resolver output
    pub tolerance: ParseTolerance,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            merge_policy: MergePolicy::default(),
            dot_notation: true,
            include_binary: false,
            tolerance: ParseTolerance::default(),
        }
    }
}
