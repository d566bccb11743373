//! Failure policies applied across a batch

use serde::{Deserialize, Serialize};

/// Policy for handling a failed record within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole batch on the first failed record
    FailFast,

    /// Convert each failure into an error record and keep going
    ContinueOnFail,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::FailFast
    }
}
