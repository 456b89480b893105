use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tfs_upload_protocol::ByteRange;

/// A pending local change paired with its server-relative destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitItem {
    local_path: PathBuf,
    repository_path: String,
}

impl CommitItem {
    pub fn new(local_path: impl Into<PathBuf>, repository_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            repository_path: repository_path.into(),
        }
    }

    /// File on disk whose content is uploaded.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Server path, e.g. `$/Project/src/main.cs`.
    pub fn repository_path(&self) -> &str {
        &self.repository_path
    }

    /// Last segment of the repository path, used as the multipart filename.
    pub fn item_name(&self) -> &str {
        self.repository_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository_path)
    }
}

/// Workspace the upload is recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceIdentity {
    pub name: String,
    pub owner: String,
}

impl WorkspaceIdentity {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
        }
    }
}

/// A contiguous slice of a file read for one upload request.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Position of `data` within the file.
    pub range: ByteRange,
    /// Raw chunk bytes; `data.len() == range.len()`.
    pub data: Vec<u8>,
}
