//! arcgen - Generate a corpus of archive test fixtures
//!
//! This tool builds a set of archive files spanning formats and
//! structural edge cases by invoking the standard tool for each format,
//! then writes a manifest describing every artifact produced.

use anyhow::{Context, Result};
use arcgen_core::{generate, CorpusReport, Error, SystemToolRunner, DEFAULT_OUTPUT_DIR};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

/// Generate a corpus of archive test fixtures
#[derive(Parser, Debug)]
#[command(name = "arcgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output directory for the generated corpus
    #[arg(default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(report) => {
            println!(
                "Wrote {} artifacts and a manifest to {}",
                report.descriptors.len(),
                report.out_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(failure_code(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<CorpusReport> {
    generate(&cli.output, &SystemToolRunner)
        .with_context(|| format!("failed to generate corpus in '{}'", cli.output.display()))
}

/// Process exit code for a failed run.
///
/// When an external tool failed, its own exit code is propagated so
/// callers see the underlying failure signal; anything that does not fit
/// a u8 process code collapses to 1.
fn failure_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<Error>()
        .and_then(Error::tool_exit_code)
        .unwrap_or(1);
    match u8::try_from(code) {
        Ok(0) | Err(_) => 1,
        Ok(code) => code,
    }
}
