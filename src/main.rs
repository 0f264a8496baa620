//! txt-insights command-line entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};

use txt_insights::config::AppConfig;
use txt_insights::logging::{init_logging, OperationTimer};
use txt_insights::render::SvgRenderer;
use txt_insights::report::{output_directory, ReportEmitter};
use txt_insights::validation::InputValidator;
use txt_insights::{CsvDirectorySource, NlpToolkit, Pipeline};

/// Analyze the exported conversation with one contact
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the exported conversation CSV files
    conversation_dir: PathBuf,

    /// Contact name as it appears in the file names
    contact_name: String,

    /// Extra configuration file layered over config/default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Number of words listed in each top-words table
    #[arg(long)]
    top_words: Option<usize>,

    /// Skip chart rendering; summaries and exports are still written
    #[arg(long)]
    no_charts: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "Run failed");
            let _ = writeln!(std::io::stderr().lock(), "Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Load configuration
    if let Some(path) = &cli.config {
        InputValidator::validate_config_file(path)?;
    }
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(top_words) = cli.top_words {
        config.analysis.top_words = top_words;
    }
    config.validate()?;

    // Initialize logging
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(Path::new),
        &config.logging.format,
    )?;

    InputValidator::validate_contact_name(&cli.contact_name)?;
    InputValidator::validate_conversation_dir(&cli.conversation_dir)?;

    info!(
        directory = %cli.conversation_dir.display(),
        contact = %cli.contact_name,
        "Starting txt-insights"
    );
    let timer = OperationTimer::new("run");

    let toolkit = NlpToolkit::standard().context("Failed to initialize text processing")?;
    let mut pipeline = Pipeline::new(CsvDirectorySource::new(config.input.clone()), toolkit);
    let analysis = pipeline.analyze(&cli.conversation_dir, &cli.contact_name)?;

    let mut emitter = ReportEmitter::new(
        SvgRenderer::new(&config.report),
        &config.report,
        &config.analysis,
    )?;
    if cli.no_charts {
        emitter = emitter.without_charts();
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    emitter
        .write_summary(&analysis, &mut out)
        .context("Failed to print summary")?;
    out.flush()?;

    let directory = output_directory(
        &cli.conversation_dir,
        &cli.contact_name,
        config.report.output_directory.as_deref(),
    );
    let report = emitter
        .emit(&analysis, &directory)
        .with_context(|| format!("Failed to write report to {}", directory.display()))?;

    info!(
        directory = %report.directory.display(),
        charts = report.charts.len(),
        exports = report.exports.len(),
        "Report complete"
    );
    debug!(pipeline = ?pipeline.metrics(), report = ?emitter.metrics(), "Run metrics");
    timer.finish();
    Ok(())
}
