#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # recast-pipeline
//!
//! Sequential batch iteration over the per-record assignment engine.
//!
//! This crate plays the batch-collaborator role: it enumerates input
//! records, drives the engine once per record, and applies the configured
//! failure policy so one record's failure cannot corrupt the rest of the
//! batch.

/// Batch runner, run configuration, and statistics.
pub mod batch;
/// Failure policies applied across a batch.
pub mod policies;

/// Batch execution entry points.
pub use batch::{BatchOutcome, BatchRunner, RunConfig, RunStats};
/// Policy selecting between fail-fast and continue-on-fail.
pub use policies::FailurePolicy;

/// The error aborting a fail-fast run, re-exported from the engine.
///
/// The pipeline propagates the engine's [`ExecutionError`] verbatim; a
/// wrapper error type would add no information.
pub use recast_engine::ExecutionError;
