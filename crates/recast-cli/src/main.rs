//! # recast-cli
//!
//! CLI application for the structured-data assignment engine.
//!
//! Reads input records as JSON Lines, applies a job's raw document to each
//! record, and writes the composed records back out as JSON Lines.

use std::fs;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use recast_engine::{LiteralResolver, OutputOptions, RawSpec};
use recast_pipeline::{BatchRunner, FailurePolicy, RunConfig};
use recast_record::{Record, SchemaVersion};

#[derive(Parser)]
#[command(name = "recast")]
#[command(about = "Structured-data assignment engine CLI")]
#[command(version)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Apply a job's document to every record in a batch
    Run {
        /// Input file path (JSON Lines, one record's fields per line)
        input: String,

        /// Job file path
        #[arg(short, long)]
        job: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write a starter job file
    Init {
        /// Output file path
        output: String,
    },
}

/// A job file: the raw output document plus run configuration
#[derive(Debug, Serialize, Deserialize)]
struct JobSpec {
    /// Human-readable job name
    #[serde(default)]
    name: Option<String>,

    /// The raw output document (template string or inline mapping)
    document: RawSpec,

    /// Output-shaping options
    #[serde(default)]
    options: OutputOptions,

    /// Failure policy across the batch
    #[serde(default)]
    policy: FailurePolicy,

    /// Pairing wire shape
    #[serde(default)]
    schema_version: SchemaVersion,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { input, job, output } => run(&input, &job, output.as_deref()).await,
        Commands::Init { output } => init(&output),
    }
}

async fn run(input: &str, job_path: &str, output: Option<&str>) -> anyhow::Result<()> {
    let job_text =
        fs::read_to_string(job_path).with_context(|| format!("reading job file {job_path}"))?;
    let job: JobSpec = serde_yaml::from_str(&job_text)
        .with_context(|| format!("parsing job file {job_path}"))?;

    let items = read_items(input)?;
    tracing::info!(
        items = items.len(),
        job = job.name.as_deref().unwrap_or("unnamed"),
        "starting run"
    );

    let config = RunConfig {
        options: job.options,
        schema_version: job.schema_version,
        policy: job.policy,
    };
    let runner = BatchRunner::new(LiteralResolver, config);
    let outcome = runner.run(&items, &job.document).await?;

    let mut lines = String::new();
    for record in &outcome.records {
        lines.push_str(&serde_json::to_string(record)?);
        lines.push('\n');
    }

    match output {
        Some(path) => fs::write(path, lines).with_context(|| format!("writing {path}"))?,
        None => print!("{lines}"),
    }

    tracing::info!(
        processed = outcome.stats.items_processed,
        failed = outcome.stats.items_failed,
        duration_ms = outcome.stats.duration.as_millis() as u64,
        "run finished"
    );
    Ok(())
}

fn init(output: &str) -> anyhow::Result<()> {
    let job = JobSpec {
        name: Some("example".to_string()),
        document: RawSpec::default_document(),
        options: OutputOptions::default(),
        policy: FailurePolicy::default(),
        schema_version: SchemaVersion::default(),
    };

    let text = serde_yaml::to_string(&job).context("serializing job file")?;
    fs::write(output, text).with_context(|| format!("writing {output}"))?;
    tracing::info!(path = output, "wrote starter job file");
    Ok(())
}

fn read_items(path: &str) -> anyhow::Result<Vec<Record>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading input file {path}"))?;

    let mut items = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_str(line)
            .with_context(|| format!("input line {} is not a JSON object", line_no + 1))?;
        items.push(Record::from_fields(fields));
    }
    Ok(items)
}
