//! # recast-engine
//!
//! Document parsing, item composition, and per-record execution for the
//! structured-data assignment engine.
//!
//! The engine turns one input record plus a raw output specification into
//! exactly one output record. Failures never escape a record: every stage
//! reports through [`ExecutionError`], tagged with the record's batch
//! position, and the caller decides whether that aborts the batch.

pub mod composer;
pub mod executor;
pub mod options;
pub mod parser;
pub mod resolver;
pub mod spec;

pub use composer::compose;
pub use executor::{ExecutionError, Stage, execute_item};
pub use options::{MergePolicy, OutputMode, OutputOptions, ParseTolerance};
pub use parser::parse_document;
pub use resolver::{LiteralResolver, ValueResolver};
pub use spec::RawSpec;

use thiserror::Error;

/// Errors raised below the executor boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An embedded expression failed to evaluate
    #[error("expression resolution failed for item {index}: {message}")]
    Resolution { index: usize, message: String },

    /// The resolved document is not a JSON mapping
    #[error("item {index} must resolve to a JSON object, received: {excerpt}")]
    InvalidStructure { index: usize, excerpt: String },
}

impl Error {
    /// Build a resolution error for the item at `index`.
    pub fn resolution(index: usize, message: impl Into<String>) -> Self {
        Self::Resolution {
            index,
            message: message.into(),
        }
    }

    /// Build a structure error for the item at `index`, keeping a printable
    /// excerpt of the offending value.
    pub fn invalid_structure(index: usize, excerpt: impl Into<String>) -> Self {
        Self::InvalidStructure {
            index,
            excerpt: excerpt.into(),
        }
    }

    /// Batch position of the item this error belongs to.
    pub fn index(&self) -> usize {
        match self {
            Self::Resolution { index, .. } | Self::InvalidStructure { index, .. } => *index,
        }
    }
}

/// Crate-local result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
