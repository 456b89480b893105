//! Data types for the upload flow.

use tfs_upload_protocol::{ByteRange, FileDigest};
use tfs_upload_transfer::CommitItem;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::UploadError;

/// Per-call options for [`ChunkedUploadClient::upload_file_with`].
///
/// [`ChunkedUploadClient::upload_file_with`]: crate::ChunkedUploadClient::upload_file_with
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Offset of the first chunk to send. Must be 0 or a chunk boundary
    /// below the file size; earlier chunks are assumed to be on the server.
    pub resume_from: u64,
    /// Checked between chunks; never interrupts a chunk in flight.
    pub cancel: CancellationToken,
    /// Receives progress events. Events are dropped if the channel is full.
    pub events: Option<mpsc::Sender<UploadEvent>>,
}

/// How an upload call ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The server accepted the last chunk.
    Completed {
        /// Chunks sent by this call.
        chunks: usize,
        /// Bytes of file content sent by this call.
        bytes: u64,
        /// Whole-file digest sent with every chunk.
        digest: FileDigest,
    },
    /// Cancellation was observed before all chunks were sent.
    Cancelled {
        /// Offset of the first chunk not sent; pass as `resume_from` to continue.
        next_offset: u64,
    },
}

impl UploadOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, UploadOutcome::Completed { .. })
    }
}

/// Progress event emitted during an upload.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// The file was opened and hashed; chunks are about to be sent.
    Started {
        item: String,
        total_bytes: u64,
        chunks: usize,
    },
    /// The server accepted one chunk.
    ChunkSent {
        item: String,
        range: ByteRange,
        bytes_per_second: f64,
    },
    /// Upload completed for a file.
    Completed { item: String },
    /// Upload failed for a file.
    Failed { item: String, error: String },
    /// Upload was cancelled for a file.
    Cancelled { item: String, next_offset: u64 },
}

/// Result of one file in a batch upload.
#[derive(Debug)]
pub struct FileUploadResult {
    pub item: CommitItem,
    pub result: Result<UploadOutcome, UploadError>,
}

impl FileUploadResult {
    pub fn is_completed(&self) -> bool {
        matches!(&self.result, Ok(outcome) if outcome.is_completed())
    }
}
