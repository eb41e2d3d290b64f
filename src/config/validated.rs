//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::reconcile::ReconcileRequest;
use crate::register::{Overlay, RegisterName, parse_hex_byte};

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::{RegisterValue, TomlConfig};

/// Where the configuration registers live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTarget {
    /// TPM device node
    Tpm(PathBuf),
    /// JSON register image file
    Image(PathBuf),
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tpm(path) => write!(f, "tpm:{}", path.display()),
            Self::Image(path) => write!(f, "image:{}", path.display()),
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// Every register name and value has been checked. The mode flags are
/// carried as given: whether they form a valid combination is decided by
/// the reconciler, not here.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Mode flags and requested register values
    pub request: ReconcileRequest,

    /// Device to read from and write to
    pub target: DeviceTarget,

    /// Dry-run mode (validate without writing)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ target: {}, prequired: {}, override: {}, registers: {}, dry_run: {} }}",
            self.target,
            self.request.use_preset,
            self.request.use_override,
            self.request.overlay,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A register name is unknown or not user-settable
    /// - A register value is not a hex byte
    /// - A `--set` argument is malformed
    /// - Both a TPM device and a register image are selected
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        // Mode flags (OR semantics: either source can enable)
        let use_preset = cli.use_preset || toml.is_some_and(|t| t.mode.prequired);
        let use_override = cli.use_override || toml.is_some_and(|t| t.mode.use_override);

        // Register values (CLI wins per register)
        let overlay = Self::resolve_overlay(cli, toml)?;

        // Device target (CLI selection replaces TOML selection)
        let target = Self::resolve_target(cli, toml)?;

        Ok(Self {
            request: ReconcileRequest {
                use_preset,
                use_override,
                overlay,
            },
            target,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(&expand_tilde(path))?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_overlay(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Overlay, ConfigError> {
        let mut overlay = Overlay::new();

        // TOML values first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.registers {
                let register = parse_register_name(name)?;
                let byte = parse_register_value(register, value)?;
                overlay.set(register, byte);
            }
        }

        // CLI values (override TOML)
        for assignment in &cli.registers {
            let (name, value) = parse_assignment(assignment)?;
            let register = parse_register_name(&name)?;
            let byte = parse_register_value(register, &RegisterValue::Text(value))?;
            overlay.set(register, byte);
        }

        Ok(overlay)
    }

    fn resolve_target(cli: &Cli, toml: Option<&TomlConfig>) -> Result<DeviceTarget, ConfigError> {
        let (device, image) = if cli.device.is_some() || cli.image.is_some() {
            (cli.device.clone(), cli.image.clone())
        } else {
            let section = toml.map(|t| &t.device);
            (
                section.and_then(|d| d.path.as_ref().map(PathBuf::from)),
                section.and_then(|d| d.image.as_ref().map(PathBuf::from)),
            )
        };

        match (device, image) {
            (Some(device), Some(image)) => Err(ConfigError::ConflictingDevice {
                device: device.display().to_string(),
                image: image.display().to_string(),
                hint: "Use either --device or --image",
            }),
            (None, Some(image)) => Ok(DeviceTarget::Image(expand_tilde(&image))),
            (Some(device), None) => Ok(DeviceTarget::Tpm(expand_tilde(&device))),
            (None, None) => Ok(DeviceTarget::Tpm(PathBuf::from(defaults::DEVICE_PATH))),
        }
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_assignment(s: &str) -> Result<(String, String), ConfigError> {
    // Try "NAME=HEX" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "NAME:HEX" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidAssignment {
        value: s.to_string(),
    })
}

fn parse_register_name(name: &str) -> Result<RegisterName, ConfigError> {
    let register = name
        .parse::<RegisterName>()
        .map_err(|_| ConfigError::UnknownRegister {
            name: name.to_string(),
        })?;

    if !register.is_user_settable() {
        return Err(ConfigError::NotSettable { name: register });
    }

    Ok(register)
}

fn parse_register_value(name: RegisterName, value: &RegisterValue) -> Result<u8, ConfigError> {
    let parsed = match value {
        RegisterValue::Integer(v) => u8::try_from(*v).ok(),
        RegisterValue::Text(s) => parse_hex_byte(s),
    };

    parsed.ok_or_else(|| ConfigError::InvalidRegisterValue {
        name,
        value: value.to_string(),
    })
}

/// Expands a leading `~` to the home directory.
///
/// Paths without `~`, or when no home directory is known, are returned as-is.
fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}
