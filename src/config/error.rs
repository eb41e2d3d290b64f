//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::register::RegisterName;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
/// Mode flag conflicts are not configuration errors; they are reported
/// by the reconciler.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A register assignment is not in `NAME=HEX` or `NAME:HEX` form.
    #[error("Invalid register assignment '{value}': expected 'NAME=HEX' or 'NAME:HEX'")]
    InvalidAssignment {
        /// The invalid assignment string
        value: String,
    },

    /// The register name is not known.
    #[error("Unknown register '{name}'")]
    UnknownRegister {
        /// The name as given
        name: String,
    },

    /// The register exists but cannot be set by the user.
    #[error("Register {name} cannot be set; it is only written by the preset")]
    NotSettable {
        /// The register
        name: RegisterName,
    },

    /// The register value is not a byte.
    #[error("Invalid value '{value}' for {name}: expected a hex byte (00-ff)")]
    InvalidRegisterValue {
        /// The register
        name: RegisterName,
        /// The value as given
        value: String,
    },

    /// Both a TPM device and a register image were selected.
    #[error("Conflicting device targets: '{device}' and image '{image}'. {hint}")]
    ConflictingDevice {
        /// The TPM device path
        device: String,
        /// The register image path
        image: String,
        /// Hint for resolving the conflict
        hint: &'static str,
    },
}
