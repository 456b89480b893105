//! Local side of chunked uploads.
//!
//! Plans the byte ranges of a file, reads them back one at a time from an
//! open handle, and streams the whole-file digest without loading the file
//! into memory.

mod chunked;
mod progress;
mod types;
mod validation;

pub use chunked::{ChunkPlan, ChunkReader, plan_chunks};
pub use progress::SpeedCalculator;
pub use types::{Chunk, CommitItem, WorkspaceIdentity};
pub use validation::validate_repository_path;

/// Default chunk size: 512 KiB, as expected by the upload service.
pub const DEFAULT_CHUNK_SIZE: usize = tfs_upload_protocol::CHUNK_SIZE;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid repository path: {0}")]
    InvalidPath(String),

    #[error("offset {offset} is not a chunk boundary below file size {file_size}")]
    InvalidOffset { offset: u64, file_size: u64 },
}
