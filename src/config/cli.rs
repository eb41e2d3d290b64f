//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// NTC2-PRECONFIG: TPM configuration register reconciler
///
/// Writes either the required preset configuration or individual register
/// overrides (read-modify-write) to the vendor configuration registers of a
/// TPM. Fixed register values are checked before anything is written.
#[derive(Debug, Parser)]
#[command(name = "ntc2-preconfig")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Write the required preset values (write only)
    #[arg(long = "prequired", visible_alias = "preset")]
    pub use_preset: bool,

    /// Permit individual register values (read-modify-write); can brick the TPM
    #[arg(long = "override")]
    pub use_override: bool,

    /// Register value as 'NAME=HEX' or 'NAME:HEX' (can be specified multiple times)
    #[arg(long = "set", value_name = "NAME=HEX")]
    pub registers: Vec<String>,

    /// TPM device node
    #[arg(long, global = true)]
    pub device: Option<PathBuf>,

    /// JSON register image to use instead of a TPM device
    #[arg(long, global = true)]
    pub image: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Read, merge and validate, but do not write to the device
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for ntc2-preconfig
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Read and print the current device configuration without changing it
    Show,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// Returns true if this is the show command.
    #[must_use]
    pub const fn is_show(&self) -> bool {
        matches!(self.command, Some(Command::Show))
    }
}
