//! CLI binary entry point for the tribevote scenario runner.
//!
//! Usage:
//!   tribevote [OPTIONS] <SCENARIO>
//!
//! Options:
//!   -c, --config <FILE>    Path to configuration TOML file
//!   -f, --format <FORMAT>  Report format: text or json (overrides config)
//!   --halt-on-error        Stop at the first rejected step
//!   -v, --verbose          Increase logging verbosity

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use tribevote_election::config::{OutputFormat, TallyConfig};
use tribevote_election::{Scenario, ScenarioRunner};

/// tribevote - replay an election scenario and print per-area winners.
#[derive(Parser, Debug)]
#[command(name = "tribevote")]
#[command(about = "In-memory election tally driven by TOML scenarios")]
#[command(version)]
struct Cli {
    /// Path to the scenario TOML file.
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Path to configuration TOML file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format (overrides config).
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Stop at the first step the election rejects.
    #[arg(long)]
    halt_on_error: bool,

    /// Increase logging verbosity (can be repeated: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration.
    let mut config = TallyConfig::load(cli.config.as_deref())?;

    // Apply CLI overrides.
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.halt_on_error {
        config.run.halt_on_error = true;
    }

    // Adjust log level based on verbosity.
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so reports on stdout stay machine-readable.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let scenario = Scenario::from_file(&cli.scenario)?;

    tracing::info!(
        path = %cli.scenario.display(),
        format = ?config.output.format,
        halt_on_error = config.run.halt_on_error,
        "Starting tribevote"
    );

    let mut runner = ScenarioRunner::new(&config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = runner.run(&scenario, &mut out)?;
    out.flush()?;

    if summary.halted {
        anyhow::bail!(
            "scenario halted after {} applied step(s) on a rejected step",
            summary.applied
        );
    }

    Ok(())
}
