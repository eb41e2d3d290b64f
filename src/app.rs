//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use ntc2_preconfig::config::ConfigError;
use ntc2_preconfig::reconcile::{ReconcileError, UsageError};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: u8 = 0;

    /// Configuration or usage error (exit code 1) - invalid args, bad mode combination, etc.
    pub const CONFIG_ERROR: u8 = 1;

    /// Transport error (exit code 2) - device missing, TPM rejected the command, etc.
    pub const TRANSPORT_ERROR: u8 = 2;

    /// Fixed value violation (exit code 3) - nothing was written.
    pub const VIOLATION: u8 = 3;

    /// Converts a status from this table into an [`ExitCode`].
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn from_status(status: u8) -> ExitCode {
        ExitCode::from(status)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::FileRead { .. } => {
            eprintln!("\nRun 'ntc2-preconfig init' to generate a configuration template.");
        }
        ConfigError::UnknownRegister { .. } | ConfigError::NotSettable { .. } => {
            eprintln!("\nRun 'ntc2-preconfig show' to list the registers.");
        }
        _ => {}
    }
}

/// Prints helpful hints for usage errors reported by the reconciler.
pub fn print_usage_hint(error: &ReconcileError) {
    let ReconcileError::Usage(usage) = error else {
        return;
    };

    match usage {
        UsageError::ConflictingModes | UsageError::NoModeSelected => {
            eprintln!("\nPass exactly one of --prequired or --override.");
        }
        UsageError::OverrideWithoutFields => {
            eprintln!("\nSet at least one register, e.g. --override --set AltCfg=03");
        }
        UsageError::PresetWithFields { .. } => {
            eprintln!("\nDrop the register values, or use --override to write them.");
        }
        UsageError::NotSettable { .. } => {
            eprintln!("\nUse --prequired to write the required lock state.");
        }
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
