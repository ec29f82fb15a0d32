//! Bulk Job Runner - replay and render bulk upload jobs

use anyhow::{Context, Result};
use bulkjob_common::logging::{init_logging, LogConfig, LogLevel};
use bulkjob_runner::{
    config::Config,
    handler::{GenericRowHandler, OutputColumns},
    snapshot::{JobSnapshot, ResultsFile},
    storage,
    store::{InMemoryJobStore, InMemoryTaskStore, JobStore},
    writer::render_results,
    BatchProcessor, CloudExport, CompletionHandler, JobRunner,
};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bulkjob-runner")]
#[command(author, version, about = "Bulk upload background job runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Drive a job from a JSON snapshot to completion and export its results
    Run {
        /// Snapshot file holding the job record and its tasks
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Columns that must be filled in, comma separated
        #[arg(short, long, value_delimiter = ',')]
        required: Vec<String>,

        /// Result file column order, comma separated
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Display names as field=Display, comma separated
        #[arg(short, long, value_delimiter = ',')]
        display: Vec<String>,
    },

    /// Render aggregated results to CSV on stdout
    Render {
        /// JSON file with "success" and "failure" row arrays
        #[arg(short = 'i', long)]
        results: PathBuf,

        /// Result file column order, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Display names as field=Display, comma separated
        #[arg(short, long, value_delimiter = ',')]
        display: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::builder()
        .level(LogLevel::Info)
        .log_file_prefix("bulkjob-runner")
        .build()
        .merge_env()?;
    let log_config = apply_verbose(log_config, cli.verbose);

    let _guard = init_logging(&log_config)?;

    match cli.command {
        Command::Run {
            snapshot,
            required,
            columns,
            display,
        } => {
            let columns = output_columns(columns, &display)?;
            run(&snapshot, required, columns).await?;
        },
        Command::Render {
            results,
            columns,
            display,
        } => {
            let columns = output_columns(columns, &display)?;
            let results = ResultsFile::load(&results).await?;
            let rendered = render_results(&results.success, &results.failure, &columns, |_| {})?;
            std::io::stdout().write_all(&rendered)?;
        },
    }

    Ok(())
}

async fn run(snapshot: &Path, required: Vec<String>, columns: OutputColumns) -> Result<()> {
    let config = Config::load()?;

    let snapshot = JobSnapshot::load(snapshot).await?;
    let job_id = snapshot.job.id.clone();

    let jobs = Arc::new(InMemoryJobStore::new());
    let tasks = Arc::new(InMemoryTaskStore::new());
    snapshot.seed(&jobs, &tasks).await;

    let storage = storage::from_config(&config.export).await?;
    let mut export = CloudExport::new(storage);
    if let Some(ref dir) = config.export.temp_dir {
        export = export.with_temp_dir(dir.clone());
    }

    let processor = BatchProcessor::new(
        tasks,
        CompletionHandler::new(jobs.clone(), export),
        config.batch.batch_size,
    );
    let handler = GenericRowHandler::new(columns).with_mandatory_fields(required);

    let outcome = JobRunner::new(jobs.clone())
        .run_with_handler(&job_id, &processor, &handler)
        .await?;
    info!(job_id = %job_id, outcome = ?outcome, "Run finished");

    let job = jobs
        .read(&job_id)
        .await?
        .with_context(|| format!("Job {} disappeared from the store", job_id))?;
    println!("{}", serde_json::to_string_pretty(&job)?);

    Ok(())
}

/// `--verbose` wins over `LOG_LEVEL`
fn apply_verbose(mut config: LogConfig, verbose: bool) -> LogConfig {
    if verbose {
        config.level = LogLevel::Debug;
    }
    config
}

fn output_columns(order: Vec<String>, display: &[String]) -> Result<OutputColumns> {
    let mut columns = OutputColumns::new(order);
    for pair in display {
        let (field, name) = pair
            .split_once('=')
            .with_context(|| format!("Display name '{}' is not field=Display", pair))?;
        columns = columns.with_display_name(field.trim(), name.trim());
    }
    Ok(columns)
}
