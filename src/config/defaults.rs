//! Default values for configuration options.
//!
//! Centralized constants to avoid magic values scattered across the codebase.

/// Default TPM device node (kernel resource manager).
pub const DEVICE_PATH: &str = "/dev/tpmrm0";

/// Default output path for `init`.
pub const CONFIG_FILE: &str = "ntc2-preconfig.toml";
