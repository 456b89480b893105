//! Upload error types.

use std::path::PathBuf;

use tfs_upload_protocol::{ByteRange, MultipartError};

use crate::auth::AuthError;
use crate::resolver::ResolveError;
use crate::transport::TransportError;

/// Errors produced by an upload.
///
/// Every variant raised after the file is opened names the file, and every
/// network failure names the byte range that failed, so callers can log or
/// restart at a higher level.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid commit item: {0}")]
    InvalidItem(String),

    #[error("cannot resume {} at offset {offset}: not a chunk boundary below {file_size}", .path.display())]
    InvalidResume {
        path: PathBuf,
        offset: u64,
        file_size: u64,
    },

    #[error("upload of {} failed at {range}: server returned {status}: {body}", .path.display())]
    Transfer {
        path: PathBuf,
        range: ByteRange,
        status: u16,
        body: String,
    },

    #[error("upload of {} failed at {range}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        range: ByteRange,
        #[source]
        source: TransportError,
    },

    #[error("authorization failed: {0}")]
    Authorization(#[from] AuthError),

    #[error("encoding error: {0}")]
    Encoding(#[from] MultipartError),

    #[error("endpoint resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    #[error("upload task failed: {0}")]
    Task(String),
}

impl UploadError {
    /// Byte range that failed on the wire, if the failure was a network one.
    pub fn failed_range(&self) -> Option<ByteRange> {
        match self {
            UploadError::Transfer { range, .. } | UploadError::Connection { range, .. } => {
                Some(*range)
            }
            _ => None,
        }
    }
}
