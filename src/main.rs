//! `kubrun` application entry point.
//!
//! This binary runs a container image as a Kubernetes Job and prints its
//! output. It uses `eyre` for opaque error handling at the application
//! boundary, converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/kubrun/config.toml` or path from `KUBRUN_CONFIG_PATH`)
//! 3. Environment variables (`KUBRUN_*`)
//! 4. Command-line arguments
//!
//! Diagnostics go to stderr via `tracing` so the captured job output owns
//! stdout.

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use kubrun::config::{AppConfig, Cli, load_config};
use kubrun::error::Result as KubrunResult;
use kubrun::run::{ExecutionReport, RunParams, execute};
use mockable::DefaultEnv;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Loads configuration with layered precedence via `OrthoConfig`, runs the
/// execution pipeline, writes the captured job output, and maps pipeline and
/// trailing cleanup errors to a nonzero exit.
///
/// Uses `eyre::Result` as the return type to provide human-readable error
/// reports with backtraces when available.
fn main() -> EyreResult<()> {
    init_tracing();

    // Parse CLI first (usage errors must exit before any cluster work).
    let cli = Cli::parse();

    // Load configuration with layered precedence: defaults < file < env < CLI.
    let config = load_config(&cli).map_err(Report::from)?;

    let report = run(&cli, &config).map_err(Report::from)?;
    emit_output(&report);

    // A completed run still fails the process when teardown failed; the
    // output above has already been delivered.
    report
        .cleanup_error
        .map_or(Ok(()), |cleanup_error| Err(Report::new(cleanup_error)))
}

/// Execute the run, returning domain-specific errors.
///
/// Keeps semantic errors inside the run path so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli, config: &AppConfig) -> KubrunResult<ExecutionReport> {
    let env = DefaultEnv::new();
    execute(RunParams {
        config,
        command: cli.command.clone(),
        env: &env,
    })
}

/// Write the captured job output to the caller's stdout and stderr.
#[expect(clippy::print_stdout, reason = "job stdout is the CLI's product")]
#[expect(clippy::print_stderr, reason = "job stderr belongs on stderr")]
fn emit_output(report: &ExecutionReport) {
    print!("{}", report.stdout);
    eprint!("{}", report.stderr);
}

/// Initialise `tracing` with env-filter control, writing to stderr.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
