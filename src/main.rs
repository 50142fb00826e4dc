//! `ot-classifier` — rate a software catalog for OT/ICS relevance with an LLM.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load credentials and settings ([`config::load_config`]); missing
//!    credentials abort here, before any row is read.
//! 3. Build the Azure OpenAI client ([`llm::azure`]) and the [`classifier`].
//! 4. Stream rows from the input table through the classifier, flushing each
//!    result to the output table ([`table`], [`batch`]).
//! 5. Render the requested report ([`report`]).

mod batch;
mod classifier;
mod cli;
mod config;
mod error;
mod llm;
mod models;
mod prompt;
mod report;
mod schema;
mod table;

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use classifier::Classifier;
use cli::{Cli, ReportFormat};
use config::load_config;
use llm::azure::AzureOpenAi;
use table::{CsvSink, CsvSource};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let show_progress = !cli.quiet && matches!(cli.report, ReportFormat::Terminal);
    let pb = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} classified  {msg}")?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    init_tracing(cli.verbose, cli.quiet, pb.clone());

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref(), cli.deployment.as_deref())?;
    tracing::debug!(?config, "loaded configuration");

    let model = AzureOpenAi::new(&config)?;
    let classifier = Classifier::new(&model)?;

    let mut source = CsvSource::open(&cli.input)?;
    let mut sink = CsvSink::create(&cli.output)?;

    let rows = batch::run(source.records(), &mut sink, &classifier, Some(&pb)).await?;

    sink.into_inner()?;
    pb.finish_with_message("Done");

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&rows, &cli.output, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", report::json::render(&rows)?);
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for reports. `RUST_LOG` wins over the
/// verbosity flags. Lines are printed with the spinner suspended so the two
/// never share a terminal line.
fn init_tracing(verbose: bool, quiet: bool, pb: ProgressBar) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet))),
        )
        .with_target(false)
        .with_writer(move || ProgressWriter(pb.clone()))
        .init();
}

fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "ot_classifier=debug"
    } else if quiet {
        "error"
    } else {
        "info"
    }
}

/// stderr writer that clears the progress spinner around each write.
struct ProgressWriter(ProgressBar);

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.suspend(|| std::io::stderr().write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}
