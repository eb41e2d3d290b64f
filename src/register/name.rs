//! Register names and their classification.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of registers in the vendor configuration structure.
pub const REGISTER_COUNT: usize = 18;

/// One of the configuration registers of the device.
///
/// The declaration order is the wire order of the configuration structure,
/// and the discriminant doubles as the register's byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegisterName {
    /// I2C locality 1 and 2 addresses
    I2cLoc1_2,
    /// I2C locality 3 and 4 addresses
    I2cLoc3_4,
    /// GPIO alternate function select
    AltCfg,
    /// GPIO direction
    Direction,
    /// GPIO pull-up enable
    PullUp,
    /// GPIO push-pull / open-drain select
    PushPull,
    CfgA,
    CfgB,
    CfgC,
    CfgD,
    CfgE,
    CfgF,
    CfgG,
    CfgH,
    CfgI,
    CfgJ,
    /// Marks the configuration structure as valid
    IsValid,
    /// Pre-configuration lock state
    IsLocked,
}

impl RegisterName {
    /// All registers, in wire order.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::I2cLoc1_2,
        Self::I2cLoc3_4,
        Self::AltCfg,
        Self::Direction,
        Self::PullUp,
        Self::PushPull,
        Self::CfgA,
        Self::CfgB,
        Self::CfgC,
        Self::CfgD,
        Self::CfgE,
        Self::CfgF,
        Self::CfgG,
        Self::CfgH,
        Self::CfgI,
        Self::CfgJ,
        Self::IsValid,
        Self::IsLocked,
    ];

    /// Byte offset of the register in the configuration structure.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical spelling, as used by the vendor tooling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I2cLoc1_2 => "i2cLoc1_2",
            Self::I2cLoc3_4 => "i2cLoc3_4",
            Self::AltCfg => "AltCfg",
            Self::Direction => "Direction",
            Self::PullUp => "PullUp",
            Self::PushPull => "PushPull",
            Self::CfgA => "CFG_A",
            Self::CfgB => "CFG_B",
            Self::CfgC => "CFG_C",
            Self::CfgD => "CFG_D",
            Self::CfgE => "CFG_E",
            Self::CfgF => "CFG_F",
            Self::CfgG => "CFG_G",
            Self::CfgH => "CFG_H",
            Self::CfgI => "CFG_I",
            Self::CfgJ => "CFG_J",
            Self::IsValid => "IsValid",
            Self::IsLocked => "IsLocked",
        }
    }

    /// Classification of this register, from the register table.
    #[must_use]
    pub fn classification(self) -> Classification {
        super::table::spec(self).classification
    }

    /// Returns true if the register may appear in a user overlay.
    #[must_use]
    pub fn is_user_settable(self) -> bool {
        !matches!(self.classification(), Classification::RequiredPreset)
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known register.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown register '{0}'")]
pub struct UnknownRegister(pub String);

impl FromStr for RegisterName {
    type Err = UnknownRegister;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRegister(s.to_string()))
    }
}

/// How a register may be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// User-settable in override mode.
    Free,
    /// Hardware-mandated; must equal its constant in every mode.
    Fixed,
    /// Has a value only in preset mode; never user-settable.
    RequiredPreset,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Fixed => write!(f, "fixed"),
            Self::RequiredPreset => write!(f, "preset-only"),
        }
    }
}
