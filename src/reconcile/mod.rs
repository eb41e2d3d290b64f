//! Register reconciliation engine.
//!
//! This module provides:
//! - Mode resolution ([`resolve`], [`ResolvedMode`])
//! - Overlay merging and preset population ([`merge`], [`preset`])
//! - Fixed-value validation ([`validate`])
//! - The orchestrator tying them to a device ([`Reconciler`])
//!
//! Nothing here retries. Every error ends the run, and the device is only
//! written once the final register set has passed validation.

mod error;
mod merge;
mod mode;
mod orchestrator;
mod validate;

#[cfg(test)]
mod mode_tests;

pub use error::{FieldViolation, ReconcileError, TransportPhase, UsageError};
pub use merge::{merge, preset};
pub use mode::{ResolvedMode, resolve};
pub use orchestrator::{ReconcileReport, ReconcileRequest, Reconciler, Stage, Verbosity};
pub use validate::validate;
