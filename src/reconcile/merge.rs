//! Merging a sparse overlay onto a baseline.

use crate::register::{Overlay, RegisterName, RegisterSet};

/// Merges an overlay onto a baseline.
///
/// Touched registers take the overlay value; every other register keeps the
/// baseline value. The baseline is not modified.
#[must_use]
pub fn merge(baseline: &RegisterSet, overlay: &Overlay) -> RegisterSet {
    let mut merged = *baseline;
    for name in RegisterName::ALL {
        if let Some(value) = overlay.get(name) {
            merged.set(name, value);
        }
    }
    merged
}

/// Builds the register set written in preset mode.
///
/// No baseline is involved: every register comes from the register table.
#[must_use]
pub fn preset() -> RegisterSet {
    RegisterSet::preset()
}
