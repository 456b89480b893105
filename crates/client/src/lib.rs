//! Chunked upload client for a version-control server's upload service.
//!
//! Sends a local file to `VersionControl/v1.0/upload.ashx` as a sequence of
//! `multipart/form-data` POSTs. Every chunk carries the workspace identity,
//! the file length, the whole-file MD5 and its own byte range. The server
//! reassembles the chunks; the client never retries or rolls back.
//!
//! # Pipeline
//!
//! 1. **Resolve** the upload endpoint once per client
//! 2. **Hash** the file by streaming it from disk
//! 3. **Upload** chunks sequentially, authorizing each request
//! 4. **Report** per-file outcomes through the orchestrator

pub mod auth;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod resolver;
pub mod settings;
pub mod transport;
pub mod types;

#[cfg(test)]
mod mock;

pub use auth::{
    AuthError, Authorization, BasicAuthorization, BearerAuthorization, NoAuthorization,
};
pub use client::ChunkedUploadClient;
pub use error::UploadError;
pub use orchestrator::UploadOrchestrator;
pub use resolver::{
    EndpointResolver, ResolveError, ServerContext, ServiceEndpoint, StaticResolver,
    UploadServiceResolver,
};
pub use settings::{SettingsError, UploadSettings};
pub use transport::{HttpTransport, ReqwestTransport, TransportError, TransportResponse};
pub use types::{FileUploadResult, UploadEvent, UploadOptions, UploadOutcome};

pub use tfs_upload_transfer::{CommitItem, WorkspaceIdentity};
