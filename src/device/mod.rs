//! Device layer: reading and writing the configuration registers.
//!
//! This module provides:
//! - The boundary trait used by the reconciler ([`ConfigDevice`])
//! - A TPM character device backend using the vendor commands ([`TpmDevice`])
//! - A JSON register image backend for staging without hardware ([`ImageDevice`])

mod image;
mod tpm;

#[cfg(test)]
pub(crate) mod test_fixtures;


pub use image::ImageDevice;
pub use tpm::{NTC2_CC_GET_CONFIG, NTC2_CC_PRE_CONFIG, TpmDevice};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::register::RegisterSet;

/// Error type for device operations.
///
/// Surfaced to the user as-is; the reconciler never interprets or retries
/// these errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to open the device.
    #[error("Failed to open device '{}': {source}", path.display())]
    Open {
        /// Path of the device
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the device failed.
    #[error("Device I/O error: {0}")]
    Io(#[source] io::Error),

    /// The device answered with something that is not a valid response.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The device rejected the command.
    #[error("TPM returned response code 0x{0:08x}")]
    ResponseCode(u32),

    /// Failed to read the register image file.
    #[error("Failed to read register image '{}': {source}", path.display())]
    ImageRead {
        /// Path of the image file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The register image file exists but is not usable.
    #[error("Invalid register image '{}': {reason}", path.display())]
    ImageInvalid {
        /// Path of the image file
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// Failed to write the register image file.
    #[error("Failed to write register image '{}': {source}", path.display())]
    ImageWrite {
        /// Path of the image file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Access to the device's persistent configuration registers.
///
/// # Design
///
/// - The reconciler only talks to the device through this trait
/// - Both calls are blocking and treated as atomic by the caller
/// - Implementations must not cache: every `read_config` reflects the
///   device state at the time of the call
///
/// # Example
///
/// ```ignore
/// use ntc2_preconfig::device::{ConfigDevice, TransportError};
/// use ntc2_preconfig::register::RegisterSet;
///
/// struct MockDevice {
///     current: RegisterSet,
///     written: Vec<RegisterSet>,
/// }
///
/// impl ConfigDevice for MockDevice {
///     fn read_config(&mut self) -> Result<RegisterSet, TransportError> {
///         Ok(self.current)
///     }
///
///     fn submit_config(&mut self, config: &RegisterSet) -> Result<(), TransportError> {
///         self.written.push(*config);
///         Ok(())
///     }
/// }
/// ```
pub trait ConfigDevice {
    /// Reads the current value of every configuration register.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the device cannot be reached or its
    /// answer cannot be decoded.
    fn read_config(&mut self) -> Result<RegisterSet, TransportError>;

    /// Writes a complete, validated configuration to the device.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the write fails. The device may then be
    /// in any state the backend left it in.
    fn submit_config(&mut self, config: &RegisterSet) -> Result<(), TransportError>;
}
