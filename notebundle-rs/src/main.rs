//! notebundle CLI entry point.

use clap::Parser;
use notebundle::cli::{Cli, Output};
use notebundle::config::ConvertConfig;
use notebundle::diagnostics::{Severity, TracingSink};
use notebundle::error::{BundleError, exit_code};
use notebundle::pipeline;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(cli.output_format(), cli.quiet);

    match run(&cli, &output) {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli, output: &Output) -> Result<(), BundleError> {
    let config = cli.apply(ConvertConfig::load(cli.config.as_deref())?);
    init_tracing(config.log_level);

    let sink = TracingSink::new(config.log_level);
    let report = pipeline::run(&config, &sink)?;

    output.print(&report)?;

    if cli.strict && report.has_failures() {
        return Err(BundleError::NotesFailed {
            count: report.failed.len(),
        });
    }
    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `level`.
fn init_tracing(level: Severity) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.level_filter().into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .try_init();
}
