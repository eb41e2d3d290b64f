//! JSON register image backend.
//!
//! Stands in for a device when staging or testing a configuration: the
//! image file holds one value per register, and a submission rewrites it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::register::RegisterSet;

use super::{ConfigDevice, TransportError};

/// Current image file format version.
const IMAGE_FILE_VERSION: u32 = 1;

/// On-disk image format.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImageFile {
    /// Format version; other versions are rejected.
    version: u32,

    /// Unix timestamp of the last write, for humans only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    written_at: Option<String>,

    /// Register values by name.
    registers: RegisterSet,
}

impl ImageFile {
    fn new(registers: RegisterSet) -> Self {
        Self {
            version: IMAGE_FILE_VERSION,
            written_at: Some(unix_timestamp_now()),
            registers,
        }
    }
}

fn unix_timestamp_now() -> String {
    use std::time::SystemTime;

    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", duration.as_secs())
}

/// Register image stored as a JSON file.
///
/// # Atomic Writes
///
/// Submissions write `{path}.tmp` and rename it over `{path}`, so the image
/// is either fully replaced or left untouched.
#[derive(Debug, Clone)]
pub struct ImageDevice {
    path: PathBuf,
}

impl ImageDevice {
    /// Creates an image device backed by the given file.
    ///
    /// The file is not touched until the first read or submission.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the image file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn invalid(&self, reason: impl Into<String>) -> TransportError {
        TransportError::ImageInvalid {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn write_err(&self, source: std::io::Error) -> TransportError {
        TransportError::ImageWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl ConfigDevice for ImageDevice {
    fn read_config(&mut self) -> Result<RegisterSet, TransportError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            TransportError::ImageRead {
                path: self.path.clone(),
                source,
            }
        })?;

        let image: ImageFile = serde_json::from_str(&content)
            .map_err(|e| self.invalid(format!("invalid JSON: {e}")))?;

        if image.version != IMAGE_FILE_VERSION {
            return Err(self.invalid(format!(
                "incompatible version: expected {IMAGE_FILE_VERSION}, got {}",
                image.version
            )));
        }

        Ok(image.registers)
    }

    fn submit_config(&mut self, config: &RegisterSet) -> Result<(), TransportError> {
        let content = serde_json::to_string_pretty(&ImageFile::new(*config))
            .map_err(|e| self.invalid(format!("cannot serialize: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.write_err(e))?;
            }
        }

        // Append .tmp rather than replacing the extension (image.json -> image.json.tmp)
        let temp_path = PathBuf::from(format!("{}.tmp", self.path.display()));

        std::fs::write(&temp_path, content).map_err(|e| self.write_err(e))?;

        if let Err(e) = std::fs::rename(&temp_path, &self.path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(self.write_err(e));
        }

        tracing::debug!("Register image written to {}", self.path.display());
        Ok(())
    }
}
