//! The register table: classification and preset value of every register.
//!
//! This table is the only place register constants live. Preset population
//! reads the `preset` column for every register; the fixed-value validator
//! reads it for the [`Classification::Fixed`] rows, where the preset value
//! is the hardware-mandated constant.

use super::name::{Classification, REGISTER_COUNT, RegisterName};

/// One row of the register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSpec {
    /// Register this row describes
    pub name: RegisterName,
    /// How the register may be changed
    pub classification: Classification,
    /// Value written in preset mode (the mandated constant for fixed registers)
    pub preset: u8,
}

const fn row(name: RegisterName, classification: Classification, preset: u8) -> RegisterSpec {
    RegisterSpec {
        name,
        classification,
        preset,
    }
}

/// Register table, in wire order.
pub static REGISTER_TABLE: [RegisterSpec; REGISTER_COUNT] = {
    use Classification::{Fixed, Free, RequiredPreset};
    use RegisterName as R;

    [
        row(R::I2cLoc1_2, Free, 0xff),
        row(R::I2cLoc3_4, Free, 0xff),
        row(R::AltCfg, Free, 0x03),
        row(R::Direction, Fixed, 0x03),
        row(R::PullUp, Fixed, 0xff),
        row(R::PushPull, Fixed, 0xff),
        row(R::CfgA, Free, 0xfe),
        row(R::CfgB, Free, 0xff),
        row(R::CfgC, Free, 0xff),
        row(R::CfgD, Free, 0xff),
        row(R::CfgE, Free, 0xff),
        row(R::CfgF, Fixed, 0xff),
        row(R::CfgG, Free, 0xff),
        row(R::CfgH, Free, 0xff),
        row(R::CfgI, Fixed, 0xff),
        row(R::CfgJ, Fixed, 0xff),
        row(R::IsValid, Fixed, 0xaa),
        row(R::IsLocked, RequiredPreset, 0x00),
    ]
};

/// Returns the table row for a register.
#[must_use]
pub fn spec(name: RegisterName) -> &'static RegisterSpec {
    &REGISTER_TABLE[name.index()]
}

/// Returns the mandated constant of a fixed register, or `None` otherwise.
#[must_use]
pub fn fixed_value(name: RegisterName) -> Option<u8> {
    let row = spec(name);
    (row.classification == Classification::Fixed).then_some(row.preset)
}

/// Iterates over the fixed registers in wire order.
pub fn fixed_registers() -> impl Iterator<Item = &'static RegisterSpec> {
    REGISTER_TABLE
        .iter()
        .filter(|row| row.classification == Classification::Fixed)
}
