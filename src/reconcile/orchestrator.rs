//! Reconciliation orchestrator.
//!
//! Drives one invocation through its stages:
//!
//! ```text
//! Init -> ModeResolved -> [BaselineFetched] -> Merged -> Validated -> Submitted
//! ```
//!
//! `BaselineFetched` only exists in override mode; preset mode goes from
//! `ModeResolved` to `Merged` by populating the preset values. Any stage may
//! end in `Failed`. The device is only written after `Validated`.

use std::fmt;

use crate::device::ConfigDevice;
use crate::register::{Overlay, RegisterChange, RegisterSet};

use super::merge::{merge, preset};
use super::mode::{ResolvedMode, resolve};
use super::validate::validate;
use super::{ReconcileError, TransportPhase};

/// Stage of a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet
    Init,
    /// Mode flags and overlay accepted
    ModeResolved,
    /// Device configuration read (override mode only)
    BaselineFetched,
    /// Final register set computed
    Merged,
    /// Fixed values checked
    Validated,
    /// Final register set written to the device
    Submitted,
    /// Run aborted
    Failed,
}

impl Stage {
    /// Returns true if `next` may directly follow this stage.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::ModeResolved)
                | (Self::ModeResolved, Self::BaselineFetched | Self::Merged)
                | (Self::BaselineFetched, Self::Merged)
                | (Self::Merged, Self::Validated)
                | (Self::Validated, Self::Submitted)
                | (
                    Self::Init
                        | Self::ModeResolved
                        | Self::BaselineFetched
                        | Self::Merged
                        | Self::Validated,
                    Self::Failed
                )
        )
    }

    /// Returns true for stages no run leaves.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Submitted | Self::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::ModeResolved => "mode-resolved",
            Self::BaselineFetched => "baseline-fetched",
            Self::Merged => "merged",
            Self::Validated => "validated",
            Self::Submitted => "submitted",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How much the reconciler reports about register changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Summary only; register changes go to debug logs.
    #[default]
    Normal,
    /// Register changes and the final set are logged at info level.
    Verbose,
}

/// What the user asked for: mode flags plus requested register values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileRequest {
    /// Write the preset values
    pub use_preset: bool,
    /// Read-modify-write with the overlay
    pub use_override: bool,
    /// Requested register values
    pub overlay: Overlay,
}

impl ReconcileRequest {
    /// Request for preset mode with no overlay.
    #[must_use]
    pub fn preset() -> Self {
        Self {
            use_preset: true,
            ..Self::default()
        }
    }

    /// Request for override mode with the given overlay.
    #[must_use]
    pub fn override_with(overlay: Overlay) -> Self {
        Self {
            use_override: true,
            overlay,
            ..Self::default()
        }
    }
}

/// Result of a successful reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Resolved mode
    pub mode: ResolvedMode,
    /// Configuration read from the device (override mode only)
    pub baseline: Option<RegisterSet>,
    /// Validated configuration that was (or, in a dry run, would be) written
    pub config: RegisterSet,
    /// Registers that differ from the baseline (override mode only)
    pub changes: Vec<RegisterChange>,
    /// Stages visited, in order
    pub stages: Vec<Stage>,
    /// Whether the configuration was written to the device
    pub submitted: bool,
}

/// Records stage transitions and rejects illegal ones.
#[derive(Debug)]
struct StageTrail {
    stages: Vec<Stage>,
}

impl StageTrail {
    fn new() -> Self {
        Self {
            stages: vec![Stage::Init],
        }
    }

    fn current(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Init)
    }

    fn advance(&mut self, next: Stage) {
        let current = self.current();
        debug_assert!(
            current.can_advance_to(next),
            "illegal stage transition {current} -> {next}"
        );
        tracing::debug!("Reconcile stage: {current} -> {next}");
        self.stages.push(next);
    }

    fn fail(&mut self, error: &ReconcileError) {
        debug_assert_eq!(self.current(), error.stage());
        tracing::debug!("Reconcile failed at stage {}: {error}", self.current());
        self.advance(Stage::Failed);
    }
}

/// Runs reconciliations against a [`ConfigDevice`].
///
/// # Example
///
/// ```ignore
/// use ntc2_preconfig::reconcile::{Reconciler, ReconcileRequest, Verbosity};
///
/// let report = Reconciler::new()
///     .with_verbosity(Verbosity::Verbose)
///     .run(&mut device, ReconcileRequest::preset())?;
/// assert!(report.submitted);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    verbosity: Verbosity,
    dry_run: bool,
}

impl Reconciler {
    /// Creates a reconciler with normal verbosity that submits its result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            dry_run: false,
        }
    }

    /// Sets the verbosity.
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Stops after validation without writing to the device.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the configured verbosity.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Returns true if submission is skipped.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Runs one reconciliation.
    ///
    /// The device is read at most once (override mode, right before the
    /// merge) and written at most once (after validation, unless this is a
    /// dry run).
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::Usage`] if the mode flags and overlay conflict;
    ///   the device is not touched.
    /// - [`ReconcileError::Transport`] if the baseline read or the
    ///   submission fails.
    /// - [`ReconcileError::Violation`] if a fixed register would be written
    ///   with the wrong value; nothing is written.
    ///
    /// [`ReconcileError::stage`] tells which stage the run reached before
    /// failing.
    pub fn run<D>(
        &self,
        device: &mut D,
        request: ReconcileRequest,
    ) -> Result<ReconcileReport, ReconcileError>
    where
        D: ConfigDevice + ?Sized,
    {
        let mut trail = StageTrail::new();
        let result = self.drive(device, request, &mut trail);
        if let Err(ref e) = result {
            trail.fail(e);
        }
        result
    }

    fn drive<D>(
        &self,
        device: &mut D,
        request: ReconcileRequest,
        trail: &mut StageTrail,
    ) -> Result<ReconcileReport, ReconcileError>
    where
        D: ConfigDevice + ?Sized,
    {
        let mode = resolve(request.use_preset, request.use_override, request.overlay)?;
        trail.advance(Stage::ModeResolved);
        tracing::info!("Reconciling in {} mode", mode.name());

        let (baseline, config) = match &mode {
            ResolvedMode::Preset => {
                let config = preset();
                trail.advance(Stage::Merged);
                (None, config)
            }
            ResolvedMode::Override(overlay) => {
                let baseline = device
                    .read_config()
                    .map_err(|e| ReconcileError::transport(TransportPhase::BaselineRead, e))?;
                trail.advance(Stage::BaselineFetched);
                tracing::debug!("Baseline: {baseline}");

                let merged = merge(&baseline, overlay);
                trail.advance(Stage::Merged);
                (Some(baseline), merged)
            }
        };

        let changes = baseline.map(|b| b.diff(&config)).unwrap_or_default();
        self.log_changes(baseline.is_some(), &changes, &config);

        validate(&config)?;
        trail.advance(Stage::Validated);

        let submitted = if self.dry_run {
            tracing::info!("Dry-run: skipping device write");
            false
        } else {
            device
                .submit_config(&config)
                .map_err(|e| ReconcileError::transport(TransportPhase::Submission, e))?;
            trail.advance(Stage::Submitted);
            tracing::info!("Configuration written to device");
            true
        };

        Ok(ReconcileReport {
            mode,
            baseline,
            config,
            changes,
            stages: trail.stages.clone(),
            submitted,
        })
    }

    fn log_changes(&self, has_baseline: bool, changes: &[RegisterChange], config: &RegisterSet) {
        let verbose = self.verbosity == Verbosity::Verbose;

        if has_baseline && changes.is_empty() {
            tracing::info!("Requested values already match the device configuration");
        }

        for change in changes {
            if verbose {
                tracing::info!("{change}");
            } else {
                tracing::debug!("{change}");
            }
        }

        if verbose {
            tracing::info!("Final configuration: {config}");
        } else {
            tracing::debug!("Final configuration: {config}");
        }
    }
}
