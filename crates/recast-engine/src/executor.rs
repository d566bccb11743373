//! Per-record execution
//!
//! Orchestrates resolve, parse, and compose for a single record, and
//! converts any failure into an [`ExecutionError`] tagged with the record's
//! batch position. Whether a failure becomes data or aborts the batch is the
//! caller's decision, not this module's.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use recast_record::{Record, SchemaVersion};

use crate::composer::compose;
use crate::options::OutputOptions;
use crate::parser::parse_document;
use crate::resolver::ValueResolver;
use crate::spec::RawSpec;

/// Pipeline stage a per-record failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Waiting on the expression resolver
    Resolving,

    /// Validating the resolved document's shape
    Parsing,

    /// Building the output record
    Composing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolving => "resolving",
            Stage::Parsing => "parsing",
            Stage::Composing => "composing",
        };
        f.write_str(name)
    }
}

/// Failure of a single record's execution, tagged with its batch position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("item {index} failed while {stage}: {source}")]
pub struct ExecutionError {
    /// Batch position of the record that failed
    pub index: usize,

    /// Stage the failure occurred in
    pub stage: Stage,

    /// Underlying failure
    pub source: crate::Error,
}

impl ExecutionError {
    /// Wrap an engine error, deriving the stage from its kind.
    #[must_use]
    pub fn new(index: usize, source: crate::Error) -> Self {
        let stage = match &source {
            crate::Error::Resolution { .. } => Stage::Resolving,
            crate::Error::InvalidStructure { .. } => Stage::Parsing,
        };
        Self {
            index,
            stage,
            source,
        }
    }

    /// Build the continue-mode synthetic record for this failure:
    /// `{"error": <message>}`, paired back to the failed position.
    #[must_use]
    pub fn to_error_record(&self, version: SchemaVersion) -> Record {
        let mut fields = Map::new();
        fields.insert(
            "error".to_string(),
            Value::String(self.source.to_string()),
        );
        Record::from_fields(fields).with_pairing(version.pairing_for(self.index))
    }
}

/// Execute the assignment for a single record
///
/// Drives resolve, parse, and compose for the record at `index`. The
/// composer is total, so a returned error always originates in resolution
/// or shape validation.
///
/// # Errors
///
/// Returns [`ExecutionError`] tagged with `index` when any stage fails.
pub async fn execute_item<R: ValueResolver>(
    item: &Record,
    index: usize,
    spec: &RawSpec,
    options: &OutputOptions,
    version: SchemaVersion,
    resolver: &R,
) -> Result<Record, ExecutionError> {
    let new_data = parse_document(spec, resolver, index, options.tolerance)
        .await
        .map_err(|source| ExecutionError::new(index, source))?;
    tracing::debug!(item = index, fields = new_data.len(), "document parsed");

    Ok(compose(item, new_data, options, version, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OutputMode;
    use crate::resolver::LiteralResolver;
    use serde_json::json;

    struct FailingResolver;

    impl ValueResolver for FailingResolver {
        async fn resolve(&self, _raw: &str, index: usize) -> crate::Result<Value> {
            Err(crate::Error::resolution(index, "undefined variable 'foo'"))
        }
    }

    fn ann() -> Record {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("Ann"));
        Record::from_fields(fields)
    }

    #[tokio::test]
    async fn test_merge_mode_end_to_end() {
        let spec = RawSpec::from(r#"{"age": 30}"#);

        let out = execute_item(
            &ann(),
            0,
            &spec,
            &OutputOptions::default(),
            SchemaVersion::Current,
            &LiteralResolver,
        )
        .await
        .unwrap();

        assert_eq!(out.field("name"), Some(&json!("Ann")));
        assert_eq!(out.field("age"), Some(&json!(30)));
        assert_eq!(out.pairing.unwrap().positions(), vec![0]);
    }

    #[tokio::test]
    async fn test_keep_only_set_mode_end_to_end() {
        let spec = RawSpec::from(r#"{"age": 30}"#);
        let options = OutputOptions {
            mode: OutputMode::KeepOnlySet,
            ..OutputOptions::default()
        };

        let out = execute_item(
            &ann(),
            0,
            &spec,
            &options,
            SchemaVersion::Current,
            &LiteralResolver,
        )
        .await
        .unwrap();

        assert_eq!(out.field("name"), None);
        assert_eq!(out.field("age"), Some(&json!(30)));
    }

    #[tokio::test]
    async fn test_structure_failures_carry_index_and_parsing_stage() {
        let spec = RawSpec::from("[1, 2, 3]");

        let err = execute_item(
            &ann(),
            2,
            &spec,
            &OutputOptions::default(),
            SchemaVersion::Current,
            &LiteralResolver,
        )
        .await
        .unwrap_err();

        assert_eq!(err.index, 2);
        assert_eq!(err.stage, Stage::Parsing);
        assert!(err.to_string().contains("item 2"));
    }

    #[tokio::test]
    async fn test_resolver_failures_carry_resolving_stage() {
        let spec = RawSpec::from("{{ $json.foo }}");

        let err = execute_item(
            &ann(),
            1,
            &spec,
            &OutputOptions::default(),
            SchemaVersion::Current,
            &FailingResolver,
        )
        .await
        .unwrap_err();

        assert_eq!(err.stage, Stage::Resolving);
        assert!(err.to_string().contains("undefined variable"));
    }

    #[test]
    fn test_error_record_shape() {
        let err = ExecutionError::new(2, crate::Error::invalid_structure(2, "[1,2,3]"));
        let record = err.to_error_record(SchemaVersion::Legacy);

        let wire = serde_json::to_value(&record).unwrap();
        assert_eq!(wire["pairedItem"], json!({"item": 2}));
        let message = wire["json"]["error"].as_str().unwrap();
        assert!(message.contains("item 2"));
        assert!(message.contains("[1,2,3]"));
    }

    #[tokio::test]
    async fn test_structured_specs_skip_the_resolver_entirely() {
        let mut fields = Map::new();
        fields.insert("age".to_string(), json!(30));
        let spec = RawSpec::Structured(fields);

        // A resolver that always fails proves it is never consulted.
        let out = execute_item(
            &ann(),
            0,
            &spec,
            &OutputOptions::default(),
            SchemaVersion::Current,
            &FailingResolver,
        )
        .await
        .unwrap();

        assert_eq!(out.field("age"), Some(&json!(30)));
    }
}
