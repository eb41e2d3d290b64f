//! Fixed-value validation: the last gate before a device write.

use crate::register::{RegisterSet, table};

use super::FieldViolation;

/// Checks every fixed register against its mandated value.
///
/// Registers are checked in wire order and the first mismatch is returned.
///
/// # Errors
///
/// Returns a [`FieldViolation`] naming the first fixed register whose value
/// differs from the register table.
pub fn validate(set: &RegisterSet) -> Result<(), FieldViolation> {
    for row in table::fixed_registers() {
        let actual = set.get(row.name);
        if actual != row.preset {
            return Err(FieldViolation {
                field: row.name,
                expected: row.preset,
                actual,
            });
        }
    }
    Ok(())
}
