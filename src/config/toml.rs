//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Device selection
    #[serde(default)]
    pub device: DeviceSection,

    /// Reconciliation mode flags
    #[serde(default)]
    pub mode: ModeSection,

    /// Requested register values, keyed by register name
    #[serde(default)]
    pub registers: BTreeMap<String, RegisterValue>,
}

/// Device selection section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceSection {
    /// TPM device node
    pub path: Option<String>,

    /// JSON register image used instead of a TPM
    pub image: Option<String>,
}

/// Mode flags section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeSection {
    /// Write the required preset values
    #[serde(default)]
    pub prequired: bool,

    /// Read-modify-write with the `[registers]` values
    #[serde(default, rename = "override")]
    pub use_override: bool,
}

/// A register value as written in the file: an integer or a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RegisterValue {
    /// Integer value, e.g. `AltCfg = 7`
    Integer(i64),
    /// Hex string, e.g. `AltCfg = "0x07"`
    Text(String),
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# NTC2-PRECONFIG Configuration File
#
# WARNING: these registers configure the TPM bus interface. A wrong value
# can make the TPM unreachable. Fixed registers are checked before writing.

[device]
# TPM device node (default: /dev/tpmrm0)
# path = "/dev/tpmrm0"

# JSON register image to use instead of a TPM (for staging and testing)
# image = "registers.json"

[mode]
# Write the required preset values; no [registers] values allowed
# prequired = false

# Read-modify-write: read the device, apply [registers], validate, write
# override = false

[registers]
# Values to set in override mode, as hex strings or integers.
# Note: a CLI --set for the same register wins over the value here.
# Settable: i2cLoc1_2 i2cLoc3_4 AltCfg Direction PullUp PushPull
#           CFG_A CFG_B CFG_C CFG_D CFG_E CFG_F CFG_G CFG_H CFG_I CFG_J IsValid
# Fixed (must keep their required value): Direction PullUp PushPull CFG_F CFG_I CFG_J IsValid
# AltCfg = "0x03"
# CFG_A = "0xfe"
"#
    .to_string()
}
