//! Mode resolution: preset or override, never both.

use std::fmt;

use crate::register::Overlay;

use super::UsageError;

/// The reconciliation mode of one invocation, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMode {
    /// Write the preset register values.
    Preset,
    /// Read-modify-write with a non-empty overlay.
    Override(Overlay),
}

impl ResolvedMode {
    /// Short name for logs and reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Override(_) => "override",
        }
    }

    /// Returns true if this mode needs a baseline read.
    #[must_use]
    pub const fn reads_baseline(&self) -> bool {
        matches!(self, Self::Override(_))
    }
}

impl fmt::Display for ResolvedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset => write!(f, "preset"),
            Self::Override(overlay) => write!(f, "override {overlay}"),
        }
    }
}

/// Resolves the mode flags and overlay into a [`ResolvedMode`].
///
/// Checks run in a fixed order, so every combination of inputs maps to
/// exactly one outcome:
/// 1. both flags: [`UsageError::ConflictingModes`]
/// 2. no flag: [`UsageError::NoModeSelected`]
/// 3. override with an empty overlay: [`UsageError::OverrideWithoutFields`]
/// 4. override touching a register that is not user-settable:
///    [`UsageError::NotSettable`]
/// 5. preset with a non-empty overlay: [`UsageError::PresetWithFields`]
///
/// # Errors
///
/// Returns the first [`UsageError`] that applies.
pub fn resolve(
    use_preset: bool,
    use_override: bool,
    overlay: Overlay,
) -> Result<ResolvedMode, UsageError> {
    match (use_preset, use_override) {
        (true, true) => Err(UsageError::ConflictingModes),
        (false, false) => Err(UsageError::NoModeSelected),
        (false, true) if overlay.is_empty() => Err(UsageError::OverrideWithoutFields),
        (false, true) => match overlay.touched().iter().find(|n| !n.is_user_settable()) {
            Some(&field) => Err(UsageError::NotSettable { field }),
            None => Ok(ResolvedMode::Override(overlay)),
        },
        (true, false) if !overlay.is_empty() => Err(UsageError::PresetWithFields {
            touched: overlay.touched().iter().copied().collect(),
        }),
        (true, false) => Ok(ResolvedMode::Preset),
    }
}
