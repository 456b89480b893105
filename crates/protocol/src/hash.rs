//! Whole-file content digest sent in the `hash` form field.
//!
//! The server verifies the reassembled file against this value, so it is
//! always computed over the complete file content, never over one chunk.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use md5::{Digest, Md5};

/// MD5 digest of a whole file, rendered as padded standard base-64.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileDigest(String);

impl FileDigest {
    /// The encoded digest text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incremental content hasher.
///
/// Feeding the same bytes in any split produces the same digest as
/// [`hash_bytes`] over the concatenation.
#[derive(Clone, Default)]
pub struct ContentHasher {
    inner: Md5,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `data` to the digest.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Consumes the hasher and returns the encoded digest.
    pub fn finalize(self) -> FileDigest {
        FileDigest(STANDARD.encode(self.inner.finalize()))
    }
}

/// Computes the digest of an in-memory buffer.
pub fn hash_bytes(data: &[u8]) -> FileDigest {
    let mut hasher = ContentHasher::new();
    hasher.update(data);
    hasher.finalize()
}
