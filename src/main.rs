//! NTC2-PRECONFIG: TPM configuration register reconciler
//!
//! Entry point for the ntc2-preconfig application.

use ntc2_preconfig::config::{Cli, Command, ValidatedConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, print_usage_hint, setup_tracing};
use run::RunError;

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Some(Command::Init { output }) = &cli.command {
        return handle_init(output);
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::from_status(exit_code::CONFIG_ERROR);
        }
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    if cli.is_show() {
        return handle_show(&config);
    }

    run_application(config)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::from_status(exit_code::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::from_status(exit_code::CONFIG_ERROR)
        }
    }
}

/// Handles the `show` subcommand.
#[cfg(not(tarpaulin_include))]
fn handle_show(config: &ValidatedConfig) -> ExitCode {
    match run::show(&config.target) {
        Ok(registers) => {
            print!("{}", run::render_registers(&registers));
            exit_code::from_status(exit_code::SUCCESS)
        }
        Err(e) => report_error(&e),
    }
}

/// Runs one reconciliation with the given configuration.
///
/// Excluded from coverage - requires a device.
#[cfg(not(tarpaulin_include))]
fn run_application(config: ValidatedConfig) -> ExitCode {
    match run::execute(config) {
        Ok(report) => {
            print!("{}", run::render_report(&report));
            exit_code::from_status(exit_code::SUCCESS)
        }
        Err(e) => report_error(&e),
    }
}

fn report_error(error: &RunError) -> ExitCode {
    tracing::error!("{error}");
    if let RunError::Reconcile(e) = error {
        print_usage_hint(e);
    }
    exit_code::from_status(error.exit_status())
}
