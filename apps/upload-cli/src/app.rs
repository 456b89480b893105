//! Wires configuration, client and orchestrator together.

use anyhow::bail;
use tfs_upload_client::{
    ChunkedUploadClient, FileUploadResult, UploadEvent, UploadOrchestrator, UploadOutcome,
    UploadServiceResolver,
};
use tfs_upload_transfer::WorkspaceIdentity;

use crate::Cli;
use crate::config::Config;

/// Uploads every item named on the command line.
///
/// Fails if any file did not complete.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let authorization = config.credentials.authorization()?;
    let client = ChunkedUploadClient::from_settings(
        &UploadServiceResolver,
        &config.server(),
        authorization,
        &config.upload,
    )?;
    tracing::info!(endpoint = %client.endpoint(), "upload endpoint");

    let mut orchestrator = UploadOrchestrator::new(client, config.upload.max_concurrent_files);

    // -- Progress --
    if let Some(mut events) = orchestrator.take_events() {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                log_event(&event);
            }
        });
    }

    // -- Ctrl-C --
    let cancel = orchestrator.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current chunks");
            cancel.cancel();
        }
    });

    let workspace = WorkspaceIdentity::new(cli.workspace, cli.owner);
    let results = orchestrator.upload_all(&workspace, cli.items).await;

    let failed = summarize(&results);
    if failed > 0 {
        bail!("{failed} of {} files were not uploaded", results.len());
    }
    Ok(())
}

fn log_event(event: &UploadEvent) {
    match event {
        UploadEvent::Started {
            item,
            total_bytes,
            chunks,
        } => tracing::debug!(item = %item, total_bytes, chunks, "started"),
        UploadEvent::ChunkSent {
            item,
            range,
            bytes_per_second,
        } => tracing::debug!(item = %item, range = %range, bytes_per_second, "chunk sent"),
        UploadEvent::Completed { .. }
        | UploadEvent::Failed { .. }
        | UploadEvent::Cancelled { .. } => {}
    }
}

/// Logs one line per file and returns how many did not complete.
fn summarize(results: &[FileUploadResult]) -> usize {
    let mut failed = 0;
    for r in results {
        match &r.result {
            Ok(UploadOutcome::Completed { bytes, .. }) => {
                tracing::info!(item = %r.item.repository_path(), bytes, "uploaded");
            }
            Ok(UploadOutcome::Cancelled { next_offset }) => {
                failed += 1;
                tracing::warn!(
                    item = %r.item.repository_path(),
                    next_offset,
                    "cancelled"
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!(item = %r.item.repository_path(), error = %e, "failed");
            }
        }
    }
    failed
}
