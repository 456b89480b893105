//! Tunables for the upload client and its HTTP transport.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tfs_upload_protocol::CHUNK_SIZE;

/// Errors produced while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Upload settings. Every field has a default, so partial files are valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Bytes of file content per request.
    pub chunk_size: usize,
    /// Whole-request timeout applied by the transport.
    pub request_timeout_secs: u64,
    /// TCP connect timeout applied by the transport.
    pub connect_timeout_secs: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Files uploaded at the same time by the orchestrator.
    pub max_concurrent_files: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            request_timeout_secs: 300,
            connect_timeout_secs: 30,
            user_agent: concat!("tfs-upload/", env!("CARGO_PKG_VERSION")).to_string(),
            max_concurrent_files: 4,
        }
    }
}

impl UploadSettings {
    /// Loads settings from a JSON file and validates them.
    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&data)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values the client cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.chunk_size == 0 {
            return Err(SettingsError::Invalid("chunk_size must be > 0".into()));
        }
        if self.max_concurrent_files == 0 {
            return Err(SettingsError::Invalid(
                "max_concurrent_files must be > 0".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "request_timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
