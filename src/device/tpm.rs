//! TPM character device backend.
//!
//! Talks to `/dev/tpmrm0`-style device nodes with the two vendor commands
//! that read and write the configuration structure. Commands carry no
//! sessions and no handles.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::register::{REGISTER_COUNT, RegisterSet};

use super::{ConfigDevice, TransportError};

/// Vendor command writing the configuration structure.
pub const NTC2_CC_PRE_CONFIG: u32 = 0x2000_0211;

/// Vendor command reading the configuration structure.
pub const NTC2_CC_GET_CONFIG: u32 = 0x2000_0213;

const TPM_ST_NO_SESSIONS: u16 = 0x8001;

/// Tag (2) + size (4) + command/response code (4)
const HEADER_SIZE: usize = 10;

const TPM_MAX_RESPONSE_SIZE: usize = 4096;

/// TPM device reached through a byte channel.
///
/// The channel is normally the opened device node; tests substitute an
/// in-memory channel.
#[derive(Debug)]
pub struct TpmDevice<C = File> {
    channel: C,
    path: PathBuf,
}

impl TpmDevice<File> {
    /// Opens a TPM device node for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Open`] if the node cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| TransportError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("Opened TPM device {}", path.display());
        Ok(Self::from_channel(file, path))
    }
}

impl<C: Read + Write> TpmDevice<C> {
    /// Wraps an already-open channel.
    #[must_use]
    pub fn from_channel(channel: C, path: impl Into<PathBuf>) -> Self {
        Self {
            channel,
            path: path.into(),
        }
    }

    /// Returns the device path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes the device and returns the channel.
    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Sends one command and returns the response parameters.
    fn execute(&mut self, command_code: u32, parameters: &[u8]) -> Result<Vec<u8>, TransportError> {
        let command = build_command(command_code, parameters);
        tracing::trace!("TPM command {command_code:#010x}: {} bytes", command.len());

        self.channel
            .write_all(&command)
            .map_err(TransportError::Io)?;

        let mut response = vec![0u8; TPM_MAX_RESPONSE_SIZE];
        let n = self
            .channel
            .read(&mut response)
            .map_err(TransportError::Io)?;
        response.truncate(n);

        parse_response(&response).map(<[u8]>::to_vec)
    }
}

impl<C: Read + Write> ConfigDevice for TpmDevice<C> {
    fn read_config(&mut self) -> Result<RegisterSet, TransportError> {
        let body = self.execute(NTC2_CC_GET_CONFIG, &[])?;
        let bytes: [u8; REGISTER_COUNT] = body.as_slice().try_into().map_err(|_| {
            TransportError::MalformedResponse(format!(
                "configuration is {} bytes, expected {REGISTER_COUNT}",
                body.len()
            ))
        })?;
        Ok(RegisterSet::from_bytes(bytes))
    }

    fn submit_config(&mut self, config: &RegisterSet) -> Result<(), TransportError> {
        let body = self.execute(NTC2_CC_PRE_CONFIG, &config.to_bytes())?;
        if !body.is_empty() {
            tracing::debug!(
                "Ignoring {} unexpected response bytes from PreConfig",
                body.len()
            );
        }
        Ok(())
    }
}

/// Builds a session-less command buffer.
pub(super) fn build_command(command_code: u32, parameters: &[u8]) -> Vec<u8> {
    let size = HEADER_SIZE + parameters.len();
    let mut buf = Vec::with_capacity(size);

    buf.extend_from_slice(&TPM_ST_NO_SESSIONS.to_be_bytes());
    // Commands are at most a few dozen bytes
    buf.extend_from_slice(&u32::try_from(size).unwrap_or(u32::MAX).to_be_bytes());
    buf.extend_from_slice(&command_code.to_be_bytes());
    buf.extend_from_slice(parameters);
    buf
}

/// Checks a response header and returns the parameter area.
pub(super) fn parse_response(response: &[u8]) -> Result<&[u8], TransportError> {
    if response.len() < HEADER_SIZE {
        return Err(TransportError::MalformedResponse(format!(
            "response is {} bytes, shorter than the {HEADER_SIZE}-byte header",
            response.len()
        )));
    }

    let tag = u16::from_be_bytes([response[0], response[1]]);
    let size = u32::from_be_bytes([response[2], response[3], response[4], response[5]]);
    let code = u32::from_be_bytes([response[6], response[7], response[8], response[9]]);

    if usize::try_from(size).ok() != Some(response.len()) {
        return Err(TransportError::MalformedResponse(format!(
            "header size {size} does not match the {} bytes received",
            response.len()
        )));
    }

    if code != 0 {
        return Err(TransportError::ResponseCode(code));
    }

    if tag != TPM_ST_NO_SESSIONS {
        return Err(TransportError::MalformedResponse(format!(
            "unexpected response tag {tag:#06x}"
        )));
    }

    Ok(&response[HEADER_SIZE..])
}
