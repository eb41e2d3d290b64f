//! Register sets and sparse overlays.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::name::{Classification, REGISTER_COUNT, RegisterName};
use super::table;

/// One register slot as seen through a [`RegisterSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterField {
    /// Register name
    pub name: RegisterName,
    /// Current value
    pub value: u8,
    /// Classification from the register table
    pub classification: Classification,
}

/// A value that differs between two register sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterChange {
    /// Register that changed
    pub name: RegisterName,
    /// Value before
    pub from: u8,
    /// Value after
    pub to: u8,
}

impl fmt::Display for RegisterChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:02x} -> {:02x}", self.name, self.from, self.to)
    }
}

/// Complete set of register values, one per known register.
///
/// The set always covers every register; there is no way to add or remove
/// one. Values are stored in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u8>", into = "BTreeMap<String, u8>")]
pub struct RegisterSet {
    values: [u8; REGISTER_COUNT],
}

impl RegisterSet {
    /// Creates a set with every register zeroed.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            values: [0; REGISTER_COUNT],
        }
    }

    /// Creates a set from the raw configuration structure bytes.
    #[must_use]
    pub const fn from_bytes(values: [u8; REGISTER_COUNT]) -> Self {
        Self { values }
    }

    /// Returns the raw configuration structure bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; REGISTER_COUNT] {
        self.values
    }

    /// Creates a set holding the preset value of every register.
    #[must_use]
    pub fn preset() -> Self {
        let mut set = Self::zeroed();
        for row in &table::REGISTER_TABLE {
            set.set(row.name, row.preset);
        }
        set
    }

    /// Returns the value of a register.
    #[must_use]
    pub const fn get(&self, name: RegisterName) -> u8 {
        self.values[name.index()]
    }

    /// Sets the value of a register.
    pub fn set(&mut self, name: RegisterName, value: u8) {
        self.values[name.index()] = value;
    }

    /// Returns a copy with one register replaced.
    #[must_use]
    pub fn with(mut self, name: RegisterName, value: u8) -> Self {
        self.set(name, value);
        self
    }

    /// Iterates over all registers in wire order.
    pub fn fields(&self) -> impl Iterator<Item = RegisterField> + '_ {
        RegisterName::ALL.into_iter().map(|name| RegisterField {
            name,
            value: self.get(name),
            classification: name.classification(),
        })
    }

    /// Lists the registers whose value differs in `other`, in wire order.
    #[must_use]
    pub fn diff(&self, other: &Self) -> Vec<RegisterChange> {
        RegisterName::ALL
            .into_iter()
            .filter(|&name| self.get(name) != other.get(name))
            .map(|name| RegisterChange {
                name,
                from: self.get(name),
                to: other.get(name),
            })
            .collect()
    }
}

impl fmt::Display for RegisterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for field in self.fields() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}={:02x}", field.name, field.value)?;
        }
        Ok(())
    }
}

/// Error converting a name/value map into a [`RegisterSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterMapError {
    /// The map names a register that does not exist.
    #[error("unknown register '{0}'")]
    Unknown(String),

    /// The map names the same register twice (differing only in case).
    #[error("register {0} given more than once")]
    Duplicate(RegisterName),

    /// The map does not cover every register.
    #[error("missing registers: {}", join_names(.0))]
    Missing(Vec<RegisterName>),
}

fn join_names(names: &[RegisterName]) -> String {
    names
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TryFrom<BTreeMap<String, u8>> for RegisterSet {
    type Error = RegisterMapError;

    fn try_from(map: BTreeMap<String, u8>) -> Result<Self, Self::Error> {
        let mut set = Self::zeroed();
        let mut seen = BTreeSet::new();

        for (key, value) in map {
            let name = key
                .parse::<RegisterName>()
                .map_err(|_| RegisterMapError::Unknown(key.clone()))?;
            if !seen.insert(name) {
                return Err(RegisterMapError::Duplicate(name));
            }
            set.set(name, value);
        }

        let missing: Vec<_> = RegisterName::ALL
            .into_iter()
            .filter(|name| !seen.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(RegisterMapError::Missing(missing));
        }

        Ok(set)
    }
}

impl From<RegisterSet> for BTreeMap<String, u8> {
    fn from(set: RegisterSet) -> Self {
        set.fields()
            .map(|field| (field.name.as_str().to_string(), field.value))
            .collect()
    }
}

/// Sparse set of requested register values.
///
/// Holds the requested values together with the set of registers that were
/// actually requested (the touched mask). Values of untouched registers are
/// meaningless and never read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    values: RegisterSet,
    touched: BTreeSet<RegisterName>,
}

impl Overlay {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a value for a register, replacing any earlier request.
    pub fn set(&mut self, name: RegisterName, value: u8) {
        self.values.set(name, value);
        self.touched.insert(name);
    }

    /// Builder form of [`Overlay::set`].
    #[must_use]
    pub fn with(mut self, name: RegisterName, value: u8) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the requested value, if the register is touched.
    #[must_use]
    pub fn get(&self, name: RegisterName) -> Option<u8> {
        self.is_touched(name).then(|| self.values.get(name))
    }

    /// Returns true if the register is touched.
    #[must_use]
    pub fn is_touched(&self, name: RegisterName) -> bool {
        self.touched.contains(&name)
    }

    /// Returns the touched registers, in wire order.
    #[must_use]
    pub const fn touched(&self) -> &BTreeSet<RegisterName> {
        &self.touched
    }

    /// Iterates over touched registers and their requested values.
    pub fn entries(&self) -> impl Iterator<Item = (RegisterName, u8)> + '_ {
        self.touched
            .iter()
            .map(|&name| (name, self.values.get(name)))
    }

    /// Returns true if no register is touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Number of touched registers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.touched.len()
    }
}

impl FromIterator<(RegisterName, u8)> for Overlay {
    fn from_iter<I: IntoIterator<Item = (RegisterName, u8)>>(iter: I) -> Self {
        let mut overlay = Self::new();
        for (name, value) in iter {
            overlay.set(name, value);
        }
        overlay
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<_> = self
            .entries()
            .map(|(name, value)| format!("{name}={value:02x}"))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}
