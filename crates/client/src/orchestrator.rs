//! Upload orchestrator for batches of files.
//!
//! Runs one upload per file with bounded parallelism, forwards progress
//! events to a single channel and shares one cancellation token.

use std::sync::Arc;

use tfs_upload_transfer::{CommitItem, WorkspaceIdentity};
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::client::ChunkedUploadClient;
use crate::error::UploadError;
use crate::types::{FileUploadResult, UploadEvent, UploadOptions, UploadOutcome};

/// Uploads a set of files, several at a time.
pub struct UploadOrchestrator {
    client: ChunkedUploadClient,
    permits: Arc<Semaphore>,
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
    cancel: CancellationToken,
}

impl UploadOrchestrator {
    /// Creates an orchestrator running at most `max_concurrent` files at once
    /// (at least 1).
    pub fn new(client: ChunkedUploadClient, max_concurrent: usize) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Returns the cancellation token shared by every upload in the batch.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Uploads every item. A failed file does not stop the others.
    ///
    /// Results are returned in the order of `items`.
    pub async fn upload_all(
        &self,
        workspace: &WorkspaceIdentity,
        items: Vec<CommitItem>,
    ) -> Vec<FileUploadResult> {
        let mut handles = Vec::with_capacity(items.len());

        for item in items {
            let client = self.client.clone();
            let workspace = workspace.clone();
            let permits = Arc::clone(&self.permits);
            let options = UploadOptions {
                resume_from: 0,
                cancel: self.cancel.clone(),
                events: Some(self.events_tx.clone()),
            };
            let events = self.events_tx.clone();
            let task_item = item.clone();

            let handle = tokio::spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        client
                            .upload_file_with(&task_item, &workspace, &options)
                            .await
                    }
                    Err(e) => Err(UploadError::Task(e.to_string())),
                };
                report(&events, &task_item, &result);
                result
            });
            handles.push((item, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (item, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    let result = Err(UploadError::Task(e.to_string()));
                    report(&self.events_tx, &item, &result);
                    result
                }
            };
            results.push(FileUploadResult { item, result });
        }
        results
    }
}

/// Logs a file's outcome and emits its terminal event.
fn report(
    events: &mpsc::Sender<UploadEvent>,
    item: &CommitItem,
    result: &Result<UploadOutcome, UploadError>,
) {
    let name = item.repository_path().to_string();
    let event = match result {
        Ok(UploadOutcome::Completed { chunks, bytes, .. }) => {
            info!(item = %name, chunks, bytes, "file uploaded");
            UploadEvent::Completed { item: name }
        }
        Ok(UploadOutcome::Cancelled { next_offset }) => {
            info!(item = %name, next_offset, "file upload cancelled");
            UploadEvent::Cancelled {
                item: name,
                next_offset: *next_offset,
            }
        }
        Err(e) => {
            let err_msg = e.to_string();
            error!(item = %name, error = %err_msg, "file upload failed");
            UploadEvent::Failed {
                item: name,
                error: err_msg,
            }
        }
    };
    let _ = events.try_send(event);
}
