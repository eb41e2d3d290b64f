//! Error types for register reconciliation.

use thiserror::Error;

use crate::device::TransportError;
use crate::register::RegisterName;

use super::Stage;

/// Invalid combination of mode flags and overlay.
///
/// Detected before any device interaction. Fixed by correcting the
/// invocation; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Both preset and override mode were requested.
    #[error("cannot use both preset and override mode")]
    ConflictingModes,

    /// Neither preset nor override mode was requested.
    #[error("need either preset or override mode")]
    NoModeSelected,

    /// Override mode was requested without any register value.
    #[error("override mode requires at least one register value to set")]
    OverrideWithoutFields,

    /// Preset mode was requested together with register values.
    #[error("preset mode cannot set register values (given: {})", join_names(.touched))]
    PresetWithFields {
        /// Registers the overlay touched
        touched: Vec<RegisterName>,
    },

    /// Override mode was asked to write a register only the preset may set.
    #[error("{field} cannot be set in override mode; it is only written by the preset")]
    NotSettable {
        /// The first such register in wire order
        field: RegisterName,
    },
}

fn join_names(names: &[RegisterName]) -> String {
    names
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A fixed register does not hold its hardware-mandated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} is not the required value {expected:02x} (got {actual:02x})")]
pub struct FieldViolation {
    /// The offending register
    pub field: RegisterName,
    /// Hardware-mandated value
    pub expected: u8,
    /// Value the reconciled set would have written
    pub actual: u8,
}

/// Device interaction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportPhase {
    /// Reading the baseline configuration
    BaselineRead,
    /// Submitting the reconciled configuration
    Submission,
}

impl std::fmt::Display for TransportPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BaselineRead => write!(f, "baseline read"),
            Self::Submission => write!(f, "submission"),
        }
    }
}

/// Error type for a reconciliation run.
///
/// Every variant is terminal; the reconciler never retries.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Invalid mode/overlay combination.
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// The reconciled set violates a fixed register value.
    #[error("Fixed value violation: {0}")]
    Violation(#[from] FieldViolation),

    /// The device collaborator failed.
    #[error("Transport error during {phase}: {source}")]
    Transport {
        /// Which device interaction failed
        phase: TransportPhase,
        /// Error reported by the device
        #[source]
        source: TransportError,
    },
}

impl ReconcileError {
    /// Creates a `Transport` error for the given phase.
    #[must_use]
    pub const fn transport(phase: TransportPhase, source: TransportError) -> Self {
        Self::Transport { phase, source }
    }

    /// The last stage the run reached before failing.
    ///
    /// Each error can only arise at one point of a run, so the stage
    /// follows from the error itself.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Usage(_) => Stage::Init,
            Self::Transport {
                phase: TransportPhase::BaselineRead,
                ..
            } => Stage::ModeResolved,
            Self::Violation(_) => Stage::Merged,
            Self::Transport {
                phase: TransportPhase::Submission,
                ..
            } => Stage::Validated,
        }
    }
}
