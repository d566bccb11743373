//! Raw output specifications authored by the user

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user-authored specification of desired output fields
///
/// Either a mapping that is already structured, or a string that may contain
/// embedded expressions and whose resolution must yield a mapping. The two
/// cases are an explicit variant so the parser's contract stays exhaustive
/// instead of type-checking at call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSpec {
    /// A mapping that needs no resolution
    Structured(Map<String, Value>),

    /// A string that may contain embedded expressions
    Unresolved(String),
}

impl RawSpec {
    /// Example document shown to users authoring a new specification
    #[must_use]
    pub fn default_document() -> Self {
        RawSpec::Unresolved("{\n  \"my_field_1\": \"value\",\n  \"my_field_2\": 1\n}\n".to_string())
    }
}

impl From<&str> for RawSpec {
    fn from(raw: &str) -> Self {
        RawSpec::Unresolved(raw.to_string())
    }
}

impl From<String> for RawSpec {
    fn from(raw: String) -> Self {
        RawSpec::Unresolved(raw)
    }
}

impl From<Map<String, Value>> for RawSpec {
    fn from(fields: Map<String, Value>) -> Self {
        RawSpec::Structured(fields)
    }
}
