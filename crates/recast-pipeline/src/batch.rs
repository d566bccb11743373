//! Batch execution over the per-record engine

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use recast_engine::{ExecutionError, OutputOptions, RawSpec, ValueResolver, execute_item};
use recast_record::{Record, SchemaVersion};

use crate::policies::FailurePolicy;

/// Configuration for a batch run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    /// Output-shaping options handed to the engine
    pub options: OutputOptions,

    /// Pairing wire shape emitted for composed records
    pub schema_version: SchemaVersion,

    /// What to do when a record fails
    pub policy: FailurePolicy,
}

/// Sequential batch runner over the assignment engine
///
/// Each record is processed at its zero-based position with its own locally
/// owned values; the shared raw specification is resolved once per record so
/// the resolver can consult per-item context.
#[derive(Debug)]
pub struct BatchRunner<R> {
    /// Expression resolver shared by all records in the batch
    resolver: R,

    /// Run configuration
    config: RunConfig,
}

/// Statistics for one batch run
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Total records handed to the engine
    pub items_processed: usize,

    /// Records that composed normally
    pub items_succeeded: usize,

    /// Records converted into error records
    pub items_failed: usize,

    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,

    /// Total processing time
    pub duration: Duration,
}

/// Result of one batch run
#[derive(Debug)]
pub struct BatchOutcome {
    /// One output record per input record, in input order
    pub records: Vec<Record>,

    /// Run statistics
    pub stats: RunStats,
}

impl<R: ValueResolver> BatchRunner<R> {
    /// Create a runner with the given resolver and configuration
    pub fn new(resolver: R, config: RunConfig) -> Self {
        Self { resolver, config }
    }

    /// Create a runner with default configuration
    pub fn with_defaults(resolver: R) -> Self {
        Self::new(resolver, RunConfig::default())
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the assignment over `items` with a shared raw specification
    ///
    /// Under [`FailurePolicy::ContinueOnFail`] a failed record becomes an
    /// error record in place and subsequent records are unaffected. Under
    /// [`FailurePolicy::FailFast`] the first failure aborts the run and no
    /// output batch is produced.
    ///
    /// # Errors
    ///
    /// Returns the aborting [`ExecutionError`], tagged with the failed
    /// record's position, in fail-fast mode.
    pub async fn run(
        &self,
        items: &[Record],
        spec: &RawSpec,
    ) -> Result<BatchOutcome, ExecutionError> {
        let started = Instant::now();
        let started_at = Utc::now();

        let mut records = Vec::with_capacity(items.len());
        let mut failed = 0;

        for (index, item) in items.iter().enumerate() {
            match execute_item(
                item,
                index,
                spec,
                &self.config.options,
                self.config.schema_version,
                &self.resolver,
            )
            .await
            {
                Ok(record) => {
                    tracing::debug!(item = index, "item composed");
                    records.push(record);
                }
                Err(error) => match self.config.policy {
                    FailurePolicy::ContinueOnFail => {
                        tracing::warn!(item = index, %error, "item failed, continuing");
                        failed += 1;
                        records.push(error.to_error_record(self.config.schema_version));
                    }
                    FailurePolicy::FailFast => {
                        tracing::error!(item = index, %error, "aborting batch");
                        return Err(error);
                    }
                },
            }
        }

        let stats = RunStats {
            items_processed: items.len(),
            items_succeeded: items.len() - failed,
            items_failed: failed,
            started_at,
            duration: started.elapsed(),
        };

        Ok(BatchOutcome { records, stats })
    }
}
