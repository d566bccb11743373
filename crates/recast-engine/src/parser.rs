//! Document parsing and shape validation
//!
//! Guarantees that a raw specification, once resolved, denotes a JSON
//! mapping before composition is allowed to see it.

use serde_json::{Map, Value};

use crate::options::ParseTolerance;
use crate::resolver::ValueResolver;
use crate::spec::RawSpec;
use crate::{Error, Result};

/// Upper bound on the excerpt of an offending value quoted in errors.
const EXCERPT_MAX_CHARS: usize = 80;

/// Parse a raw specification into a field mapping for the item at `index`
///
/// Structured specifications pass through unchanged; unresolved ones make a
/// single round-trip through the resolver before shape validation.
///
/// # Errors
///
/// Returns [`Error::Resolution`] when the resolver fails, and
/// [`Error::InvalidStructure`] when the resolved value is an array, scalar,
/// or null.
pub async fn parse_document<R: ValueResolver>(
    spec: &RawSpec,
    resolver: &R,
    index: usize,
    tolerance: ParseTolerance,
) -> Result<Map<String, Value>> {
    match spec {
        RawSpec::Structured(fields) => Ok(fields.clone()),
        RawSpec::Unresolved(raw) => {
            let resolved = resolver.resolve(raw, index).await?;
            into_mapping(resolved, index, tolerance)
        }
    }
}

/// Validate that a resolved value is a mapping.
fn into_mapping(
    value: Value,
    index: usize,
    tolerance: ParseTolerance,
) -> Result<Map<String, Value>> {
    match value {
        Value::Object(fields) => Ok(fields),
        Value::String(text) if tolerance == ParseTolerance::Lenient => {
            // One extra attempt to read a resolver-returned string as JSON.
            match serde_json::from_str(&text) {
                Ok(Value::Object(fields)) => Ok(fields),
                _ => Err(Error::invalid_structure(
                    index,
                    excerpt(&Value::String(text)),
                )),
            }
        }
        other => Err(Error::invalid_structure(index, excerpt(&other))),
    }
}

/// Printable, length-capped rendering of an offending value.
fn excerpt(value: &Value) -> String {
    let rendered = value.to_string();
    match rendered.char_indices().nth(EXCERPT_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &rendered[..cut]),
        None => rendered,
    }
}
