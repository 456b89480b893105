//! Chunked upload client.
//!
//! Sends one file per call as a sequence of `multipart/form-data` POSTs,
//! one per chunk, in offset order. Each chunk is read, encoded and sent only
//! after the previous chunk's response has been observed.

use std::path::Path;
use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Body, Method, Request};
use tfs_upload_protocol::{
    FileDigest, FormField, MULTIPART_CONTENT_TYPE, MultipartEncoder, OCTET_STREAM,
};
use tfs_upload_transfer::{
    Chunk, ChunkReader, CommitItem, DEFAULT_CHUNK_SIZE, SpeedCalculator, TransferError,
    WorkspaceIdentity, validate_repository_path,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::Authorization;
use crate::error::UploadError;
use crate::resolver::{EndpointResolver, ServerContext};
use crate::settings::UploadSettings;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{UploadEvent, UploadOptions, UploadOutcome};

/// Uploads files to the server's upload service in fixed-size chunks.
///
/// Holds no per-upload state: clones share the transport and the
/// authorization strategy, and independent files may be uploaded from
/// different tasks at the same time.
#[derive(Clone)]
pub struct ChunkedUploadClient {
    endpoint: Url,
    content_type: HeaderValue,
    chunk_size: usize,
    authorization: Arc<dyn Authorization>,
    transport: Arc<dyn HttpTransport>,
}

impl ChunkedUploadClient {
    /// Creates a client, resolving the upload endpoint once.
    pub fn new(
        resolver: &dyn EndpointResolver,
        server: &ServerContext,
        authorization: Arc<dyn Authorization>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, UploadError> {
        let endpoint = resolver.resolve(server)?.url()?;

        debug!(endpoint = %endpoint, "upload endpoint resolved");

        Ok(Self {
            endpoint,
            content_type: HeaderValue::from_static(MULTIPART_CONTENT_TYPE),
            chunk_size: DEFAULT_CHUNK_SIZE,
            authorization,
            transport,
        })
    }

    /// Creates a client with a [`ReqwestTransport`] built from `settings`.
    pub fn from_settings(
        resolver: &dyn EndpointResolver,
        server: &ServerContext,
        authorization: Arc<dyn Authorization>,
        settings: &UploadSettings,
    ) -> Result<Self, UploadError> {
        let transport = Arc::new(ReqwestTransport::new(settings)?);
        Ok(Self::new(resolver, server, authorization, transport)?.with_chunk_size(settings.chunk_size))
    }

    /// Overrides the chunk size. 0 restores the default (512 KiB).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        self
    }

    /// Resolved upload URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Uploads one file from the beginning, without cancellation or events.
    pub async fn upload_file(
        &self,
        item: &CommitItem,
        workspace: &WorkspaceIdentity,
    ) -> Result<UploadOutcome, UploadError> {
        self.upload_file_with(item, workspace, &UploadOptions::default())
            .await
    }

    /// Uploads one file.
    ///
    /// The pipeline:
    /// 1. Open the file and stream it through the hasher (no network yet)
    /// 2. Partition `[resume_from, length)` into chunk ranges
    /// 3. For each range: read, encode, authorize, send, check the status
    ///
    /// Any non-success response aborts the remaining chunks. Nothing is
    /// retried or rolled back; `Completed` is returned only after the last
    /// chunk was accepted.
    pub async fn upload_file_with(
        &self,
        item: &CommitItem,
        workspace: &WorkspaceIdentity,
        options: &UploadOptions,
    ) -> Result<UploadOutcome, UploadError> {
        validate_repository_path(item.repository_path())
            .map_err(|e| UploadError::InvalidItem(e.to_string()))?;

        let path = item.local_path().to_path_buf();

        // 1. Open + hash
        let (mut reader, digest) = tokio::task::spawn_blocking({
            let path = path.clone();
            let chunk_size = self.chunk_size;
            move || -> Result<(ChunkReader, FileDigest), TransferError> {
                let mut reader = ChunkReader::new(&path, chunk_size)?;
                let digest = reader.digest()?;
                Ok((reader, digest))
            }
        })
        .await
        .map_err(|e| UploadError::Task(e.to_string()))?
        .map_err(|e| local_error(&path, e))?;

        // 2. Plan
        if options.resume_from > 0 {
            reader
                .seek_to(options.resume_from)
                .map_err(|e| local_error(&path, e))?;
        }

        let total_bytes = reader.file_size();
        let chunks = reader.remaining_chunks();

        info!(
            item = %item.repository_path(),
            path = %path.display(),
            total_bytes,
            chunks,
            resume_from = options.resume_from,
            "upload started"
        );
        emit(
            options,
            UploadEvent::Started {
                item: item.repository_path().to_string(),
                total_bytes,
                chunks,
            },
        );

        if total_bytes == 0 {
            debug!(item = %item.repository_path(), "empty file, no chunks to send");
        }

        // 3. Send chunks
        let mut speed = SpeedCalculator::default();
        let mut sent_chunks = 0usize;
        let mut sent_bytes = 0u64;

        while reader.remaining_chunks() > 0 {
            if options.cancel.is_cancelled() {
                let next_offset = reader.offset();
                info!(item = %item.repository_path(), next_offset, "upload cancelled");
                return Ok(UploadOutcome::Cancelled { next_offset });
            }

            let (returned, chunk) = tokio::task::spawn_blocking(move || {
                let chunk = reader.next_chunk();
                (reader, chunk)
            })
            .await
            .map_err(|e| UploadError::Task(e.to_string()))?;
            reader = returned;

            let Some(chunk) = chunk.map_err(|e| local_error(&path, e))? else {
                break;
            };

            self.send_chunk(item, workspace, &digest, &chunk).await?;

            speed.add_sample(chunk.range.len());
            sent_chunks += 1;
            sent_bytes += chunk.range.len();

            emit(
                options,
                UploadEvent::ChunkSent {
                    item: item.repository_path().to_string(),
                    range: chunk.range,
                    bytes_per_second: speed.bytes_per_second(),
                },
            );
        }

        info!(
            item = %item.repository_path(),
            chunks = sent_chunks,
            bytes = sent_bytes,
            "upload completed"
        );

        Ok(UploadOutcome::Completed {
            chunks: sent_chunks,
            bytes: sent_bytes,
            digest,
        })
    }

    /// Encodes, authorizes and sends one chunk, then checks the status.
    async fn send_chunk(
        &self,
        item: &CommitItem,
        workspace: &WorkspaceIdentity,
        digest: &FileDigest,
        chunk: &Chunk,
    ) -> Result<(), UploadError> {
        let range = chunk.range;

        let body = MultipartEncoder::new()
            .text(FormField::Item.as_str(), item.repository_path())
            .text(FormField::WorkspaceName.as_str(), workspace.name.as_str())
            .text(FormField::WorkspaceOwner.as_str(), workspace.owner.as_str())
            .text(FormField::FileLength.as_str(), range.total().to_string())
            .text(FormField::Hash.as_str(), digest.as_str())
            .text(FormField::Range.as_str(), range.to_string())
            .file(
                FormField::Content.as_str(),
                item.item_name(),
                OCTET_STREAM,
                &chunk.data,
            )?
            .encode()?;

        let mut request = Request::new(Method::POST, self.endpoint.clone());
        request
            .headers_mut()
            .insert(CONTENT_TYPE, self.content_type.clone());
        *request.body_mut() = Some(Body::from(body));

        self.authorization.authorize(&mut request)?;

        debug!(item = %item.repository_path(), range = %range, "sending chunk");

        let path = item.local_path().to_path_buf();
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(source) => {
                warn!(item = %item.repository_path(), range = %range, error = %source, "chunk send failed");
                return Err(UploadError::Connection {
                    path,
                    range,
                    source,
                });
            }
        };

        if !response.status.is_success() {
            warn!(
                item = %item.repository_path(),
                range = %range,
                status = response.status.as_u16(),
                "chunk rejected by server"
            );
            return Err(UploadError::Transfer {
                path,
                range,
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        Ok(())
    }
}

/// Maps a local read failure to an upload error naming the file.
fn local_error(path: &Path, err: TransferError) -> UploadError {
    let path = path.to_path_buf();
    match err {
        TransferError::Io(source) => UploadError::Io { path, source },
        TransferError::InvalidPath(msg) => UploadError::InvalidItem(msg),
        TransferError::InvalidOffset { offset, file_size } => UploadError::InvalidResume {
            path,
            offset,
            file_size,
        },
    }
}

fn emit(options: &UploadOptions, event: UploadEvent) {
    if let Some(tx) = &options.events {
        let _ = tx.try_send(event);
    }
}
