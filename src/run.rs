//! Application execution logic.
//!
//! Opens the selected device, runs one reconciliation and renders the
//! outcome for the terminal.

use thiserror::Error;

use ntc2_preconfig::config::{DeviceTarget, ValidatedConfig};
use ntc2_preconfig::device::{ConfigDevice, ImageDevice, TpmDevice, TransportError};
use ntc2_preconfig::reconcile::{ReconcileError, ReconcileReport, Reconciler, Verbosity};
use ntc2_preconfig::register::{Classification, RegisterSet, table};

use crate::app::exit_code;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to open the selected device.
    #[error("Failed to open {target}: {source}")]
    Open {
        /// Device that could not be opened
        target: DeviceTarget,
        /// Error reported by the backend
        #[source]
        source: TransportError,
    },

    /// Failed to read the device configuration (show command).
    #[error("Failed to read configuration: {0}")]
    Read(#[source] TransportError),

    /// The reconciliation failed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl RunError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_status(&self) -> u8 {
        match self {
            Self::Open { .. } | Self::Read(_) => exit_code::TRANSPORT_ERROR,
            Self::Reconcile(ReconcileError::Transport { .. }) => exit_code::TRANSPORT_ERROR,
            Self::Reconcile(ReconcileError::Violation(_)) => exit_code::VIOLATION,
            Self::Reconcile(ReconcileError::Usage(_)) => exit_code::CONFIG_ERROR,
        }
    }
}

/// Opens the backend for a device target.
///
/// # Errors
///
/// Returns an error if the TPM device cannot be opened. Image targets are
/// opened lazily and never fail here.
pub fn open_device(target: &DeviceTarget) -> Result<Box<dyn ConfigDevice>, RunError> {
    match target {
        DeviceTarget::Tpm(path) => {
            let device = TpmDevice::open(path).map_err(|source| RunError::Open {
                target: target.clone(),
                source,
            })?;
            Ok(Box::new(device))
        }
        DeviceTarget::Image(path) => {
            tracing::debug!("Using register image {}", path.display());
            Ok(Box::new(ImageDevice::new(path.clone())))
        }
    }
}

/// Runs one reconciliation against the configured device.
///
/// # Errors
///
/// Returns an error if the device cannot be opened or the reconciliation fails.
pub fn execute(config: ValidatedConfig) -> Result<ReconcileReport, RunError> {
    let mut device = open_device(&config.target)?;
    execute_with(device.as_mut(), config)
}

/// Runs one reconciliation against an already opened device.
///
/// # Errors
///
/// Returns an error if the reconciliation fails.
pub fn execute_with<D>(device: &mut D, config: ValidatedConfig) -> Result<ReconcileReport, RunError>
where
    D: ConfigDevice + ?Sized,
{
    let verbosity = if config.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - the device will not be written");
    }

    let report = Reconciler::new()
        .with_verbosity(verbosity)
        .with_dry_run(config.dry_run)
        .run(device, config.request)?;

    Ok(report)
}

/// Reads the current configuration from the configured device.
///
/// # Errors
///
/// Returns an error if the device cannot be opened or read.
pub fn show(target: &DeviceTarget) -> Result<RegisterSet, RunError> {
    let mut device = open_device(target)?;
    device.read_config().map_err(RunError::Read)
}

/// Renders a register set as a table with classification and fixed status.
pub fn render_registers(config: &RegisterSet) -> String {
    config
        .fields()
        .map(|field| {
            let status = match field.classification {
                Classification::Fixed => {
                    let required = table::spec(field.name).preset;
                    if field.value == required {
                        "ok".to_string()
                    } else {
                        format!("MISMATCH (required {required:02x})")
                    }
                }
                Classification::Free | Classification::RequiredPreset => String::new(),
            };
            let line = format!(
                "{:<10} {:02x}  {:<11} {status}",
                field.name.as_str(),
                field.value,
                field.classification.to_string()
            );
            format!("{}\n", line.trim_end())
        })
        .collect()
}

/// Renders a one-paragraph summary of a reconciliation.
pub fn render_report(report: &ReconcileReport) -> String {
    let mut lines = vec![format!("Mode: {}", report.mode.name())];

    if report.baseline.is_some() {
        if report.changes.is_empty() {
            lines.push("No register changes".to_string());
        } else {
            lines.extend(report.changes.iter().map(|change| format!("  {change}")));
        }
    }

    let outcome = if report.submitted {
        "Configuration written"
    } else {
        "Dry run: configuration validated, not written"
    };
    lines.push(outcome.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
