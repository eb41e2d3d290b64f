//! Shared test doubles for the device layer.

use std::io::{self, Read, Write};

use crate::register::RegisterSet;

use super::{ConfigDevice, TransportError};

/// In-memory device that records every call.
#[derive(Debug, Default)]
pub(crate) struct MockDevice {
    current: Option<RegisterSet>,
    read_error: Option<TransportError>,
    submit_error: Option<TransportError>,
    pub reads: usize,
    pub submitted: Vec<RegisterSet>,
}

impl MockDevice {
    /// Device whose configuration reads back as `current`.
    pub fn with_config(current: RegisterSet) -> Self {
        Self {
            current: Some(current),
            ..Self::default()
        }
    }

    /// Device whose reads fail with a response code.
    pub fn failing_read(code: u32) -> Self {
        Self {
            read_error: Some(TransportError::ResponseCode(code)),
            ..Self::default()
        }
    }

    /// Device that reads `current` but rejects submissions.
    pub fn failing_submit(current: RegisterSet, code: u32) -> Self {
        Self {
            current: Some(current),
            submit_error: Some(TransportError::ResponseCode(code)),
            ..Self::default()
        }
    }
}

impl ConfigDevice for MockDevice {
    fn read_config(&mut self) -> Result<RegisterSet, TransportError> {
        self.reads += 1;
        if let Some(e) = self.read_error.take() {
            return Err(e);
        }
        Ok(self.current.unwrap_or_default())
    }

    fn submit_config(&mut self, config: &RegisterSet) -> Result<(), TransportError> {
        self.submitted.push(*config);
        if let Some(e) = self.submit_error.take() {
            return Err(e);
        }
        self.current = Some(*config);
        Ok(())
    }
}

/// Byte channel that replays a canned response and captures what was written.
#[derive(Debug, Default)]
pub(crate) struct ScriptedChannel {
    pub written: Vec<u8>,
    response: io::Cursor<Vec<u8>>,
    fail_write: bool,
}

impl ScriptedChannel {
    /// Channel answering every command with `response`.
    pub fn responding(response: Vec<u8>) -> Self {
        Self {
            response: io::Cursor::new(response),
            ..Self::default()
        }
    }

    /// Channel whose writes fail.
    pub fn broken() -> Self {
        Self {
            fail_write: true,
            ..Self::default()
        }
    }
}

impl Read for ScriptedChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.response.read(buf)
    }
}

impl Write for ScriptedChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_write {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builds a response with the given code and parameter area.
pub(crate) fn response(code: u32, parameters: &[u8]) -> Vec<u8> {
    let size = u32::try_from(10 + parameters.len()).unwrap();
    let mut buf = Vec::new();
    buf.extend_from_slice(&0x8001u16.to_be_bytes());
    buf.extend_from_slice(&size.to_be_bytes());
    buf.extend_from_slice(&code.to_be_bytes());
    buf.extend_from_slice(parameters);
    buf
}
