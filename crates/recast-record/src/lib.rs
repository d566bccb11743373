#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # recast-record
//!
//! Record data model for the structured-data assignment engine.
//!
//! A [`Record`] is an ordered mapping from field name to JSON value plus two
//! optional side channels: binary attachments and pairing metadata linking an
//! output record back to the batch position(s) it was produced from.

/// Pairing metadata, the schema-version marker, and the binary channel.
pub mod metadata;
/// Core record container and field accessors.
pub mod record;

/// Pairing shapes and the version marker that selects between them.
pub use metadata::{BinaryAttachment, PairedItem, Pairing, SchemaVersion};
/// Primary record type.
pub use record::Record;
