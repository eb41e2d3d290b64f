//! Configuration layer for NTC2-PRECONFIG.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`DeviceTarget`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Register values are merged per register: `--set AltCfg=07` replaces only the
//! TOML value of `AltCfg`, other `[registers]` entries are kept.
//!
//! Device selection is replaced as a whole: if the CLI gives `--device` or
//! `--image`, the TOML `[device]` section is ignored. Selecting both a device and
//! an image within one source is an error.
//!
//! # Boolean Flag Semantics
//!
//! Mode flags (`--prequired`, `--override`) use OR semantics:
//! - If set `true` in either CLI or TOML, the result is `true`.
//! - Setting both modes is not rejected here; the reconciler reports it as a
//!   usage error together with the other mode/overlay conflicts.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use self::toml::{RegisterValue, TomlConfig, default_config_template};
pub use validated::{DeviceTarget, ValidatedConfig, write_default_config};
