use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tfs_upload_protocol::{ByteRange, ContentHasher, FileDigest};

use crate::types::Chunk;
use crate::{DEFAULT_CHUNK_SIZE, TransferError};

/// Read buffer used while streaming a file through the hasher.
const DIGEST_BUFFER_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Chunk planning
// ---------------------------------------------------------------------------

/// Iterator over the contiguous ranges that partition `[0, total)`.
///
/// Every range but the last is exactly `chunk_size` bytes long.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    next: u64,
    total: u64,
    chunk_size: u64,
}

/// Plans the chunks of a file of `total` bytes.
///
/// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] (512 KiB) is used.
/// An empty file yields no chunks.
pub fn plan_chunks(total: u64, chunk_size: usize) -> ChunkPlan {
    let chunk_size = if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    };
    ChunkPlan {
        next: 0,
        total,
        chunk_size: chunk_size as u64,
    }
}

impl ChunkPlan {
    /// Offset of the next range to be yielded.
    pub fn offset(&self) -> u64 {
        self.next
    }

    /// Chunk size in bytes.
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    fn skip_to(&mut self, offset: u64) {
        self.next = offset;
    }
}

impl Iterator for ChunkPlan {
    type Item = ByteRange;

    fn next(&mut self) -> Option<ByteRange> {
        if self.next >= self.total {
            return None;
        }
        let start = self.next;
        let end = (start + self.chunk_size).min(self.total);
        self.next = end;
        ByteRange::new(start, end, self.total).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total.saturating_sub(self.next).div_ceil(self.chunk_size) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkPlan {}

// ---------------------------------------------------------------------------
// Digest helpers
// ---------------------------------------------------------------------------

/// Streams `reader` to its end through the content hasher.
///
/// Returns the digest and the number of bytes consumed.
fn digest_reader<R: Read>(reader: &mut R) -> std::io::Result<(FileDigest, u64)> {
    let mut hasher = ContentHasher::new();
    let mut buf = vec![0u8; DIGEST_BUFFER_SIZE];
    let mut consumed = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        consumed += n as u64;
    }
    Ok((hasher.finalize(), consumed))
}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Reads one file's chunks in offset order from a single open handle.
///
/// Each chunk is read by seeking to its start and reading exactly its
/// length, so memory use is bounded by the chunk size.
pub struct ChunkReader {
    file: File,
    file_size: u64,
    plan: ChunkPlan,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    ///
    /// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] (512 KiB) is used.
    pub fn new(path: &Path, chunk_size: usize) -> Result<Self, TransferError> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        Ok(Self {
            file,
            file_size,
            plan: plan_chunks(file_size, chunk_size),
        })
    }

    /// Computes the digest of the whole file through this handle.
    ///
    /// Does not move the chunk cursor. Fails if the file no longer has the
    /// length observed when it was opened.
    pub fn digest(&mut self) -> Result<FileDigest, TransferError> {
        self.file.seek(SeekFrom::Start(0))?;
        let (digest, consumed) = digest_reader(&mut self.file)?;
        if consumed != self.file_size {
            return Err(TransferError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "file changed while reading: expected {} bytes, read {consumed}",
                    self.file_size
                ),
            )));
        }
        Ok(digest)
    }

    /// Moves the chunk cursor to `offset` (for resume).
    ///
    /// `offset` must be a chunk boundary strictly below the file size,
    /// or 0.
    pub fn seek_to(&mut self, offset: u64) -> Result<(), TransferError> {
        let aligned = offset % self.plan.chunk_size() == 0;
        if offset != 0 && (!aligned || offset >= self.file_size) {
            return Err(TransferError::InvalidOffset {
                offset,
                file_size: self.file_size,
            });
        }
        self.plan.skip_to(offset);
        Ok(())
    }

    /// Reads the next chunk. Returns `None` once the file is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        let Some(range) = self.plan.next() else {
            return Ok(None);
        };

        self.file.seek(SeekFrom::Start(range.start()))?;
        let mut data = vec![0u8; range.len() as usize];
        self.file.read_exact(&mut data)?;
        Ok(Some(Chunk { range, data }))
    }

    /// Offset of the next chunk to be read.
    pub fn offset(&self) -> u64 {
        self.plan.offset()
    }

    /// Total file size in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of chunks not yet read.
    pub fn remaining_chunks(&self) -> usize {
        self.plan.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tfs_upload_protocol::hash_bytes;

    fn create_test_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    fn assert_partition(total: u64, chunk_size: usize) {
        let ranges: Vec<ByteRange> = plan_chunks(total, chunk_size).collect();
        let mut expected_start = 0;
        for r in &ranges {
            assert_eq!(r.start(), expected_start, "gap or overlap at {r}");
            assert!(r.len() <= chunk_size as u64);
            assert_eq!(r.total(), total);
            expected_start = r.end();
        }
        assert_eq!(expected_start, total);
        // Only the last chunk may be short.
        for r in ranges.iter().rev().skip(1) {
            assert_eq!(r.len(), chunk_size as u64);
        }
    }

    #[test]
    fn plan_partitions_contiguously() {
        for total in [1u64, 2, 9, 10, 11, 99, 100, 101, 1000] {
            for chunk_size in [1usize, 3, 10, 64, 1000] {
                assert_partition(total, chunk_size);
            }
        }
    }

    #[test]
    fn plan_exact_multiple() {
        let c = DEFAULT_CHUNK_SIZE as u64;
        let ranges: Vec<_> = plan_chunks(c, 0).collect();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].to_string(), format!("bytes=0-{}/{}", c - 1, c));
    }

    #[test]
    fn plan_one_byte_over() {
        let c = DEFAULT_CHUNK_SIZE as u64;
        let ranges: Vec<_> = plan_chunks(c + 1, 0).collect();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].len(), 1);
        assert_eq!(ranges[1].to_string(), format!("bytes={c}-{c}/{}", c + 1));
    }

    #[test]
    fn plan_empty_file_has_no_chunks() {
        assert_eq!(plan_chunks(0, 16).count(), 0);
    }

    #[test]
    fn plan_reports_exact_len() {
        let plan = plan_chunks(25, 10);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn digest_spans_many_buffers() {
        let dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 253) as u8).collect();
        let path = create_test_file(dir.path(), "test.bin", &data);

        let mut reader = ChunkReader::new(&path, 0).unwrap();
        assert_eq!(reader.digest().unwrap(), hash_bytes(&data));
    }

    #[test]
    fn chunk_reader_reads_all() {
        let dir = TempDir::new().unwrap();
        let data = b"AABBCCDDEE"; // 10 bytes.
        let path = create_test_file(dir.path(), "test.bin", data);

        let mut reader = ChunkReader::new(&path, 4).unwrap();
        assert_eq!(reader.file_size(), 10);
        assert_eq!(reader.remaining_chunks(), 3);

        let c1 = reader.next_chunk().unwrap().unwrap();
        assert_eq!(c1.range.to_string(), "bytes=0-3/10");
        assert_eq!(&c1.data, b"AABB");
        assert_eq!(reader.offset(), 4);

        let c2 = reader.next_chunk().unwrap().unwrap();
        assert_eq!(c2.range.to_string(), "bytes=4-7/10");
        assert_eq!(&c2.data, b"CCDD");

        let c3 = reader.next_chunk().unwrap().unwrap();
        assert_eq!(c3.range.to_string(), "bytes=8-9/10");
        assert_eq!(&c3.data, b"EE");

        assert!(reader.next_chunk().unwrap().is_none());
        assert_eq!(reader.remaining_chunks(), 0);
    }

    #[test]
    fn chunk_reader_digest_keeps_cursor() {
        let dir = TempDir::new().unwrap();
        let data = b"0123456789";
        let path = create_test_file(dir.path(), "test.bin", data);

        let mut reader = ChunkReader::new(&path, 4).unwrap();
        let first = reader.next_chunk().unwrap().unwrap();
        assert_eq!(&first.data, b"0123");

        assert_eq!(reader.digest().unwrap(), hash_bytes(data));

        let second = reader.next_chunk().unwrap().unwrap();
        assert_eq!(&second.data, b"4567");
    }

    #[test]
    fn chunk_reader_seek_and_resume() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "test.bin", b"0123456789");

        let mut reader = ChunkReader::new(&path, 4).unwrap();
        reader.seek_to(8).unwrap();
        assert_eq!(reader.offset(), 8);
        assert_eq!(reader.remaining_chunks(), 1);

        let c = reader.next_chunk().unwrap().unwrap();
        assert_eq!(c.range.to_string(), "bytes=8-9/10");
        assert_eq!(&c.data, b"89");
        assert!(reader.next_chunk().unwrap().is_none());
    }

    #[test]
    fn chunk_reader_rejects_unaligned_offset() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "test.bin", b"0123456789");

        let mut reader = ChunkReader::new(&path, 4).unwrap();
        let result = reader.seek_to(6);
        assert!(matches!(
            result,
            Err(TransferError::InvalidOffset { offset: 6, file_size: 10 })
        ));
    }

    #[test]
    fn chunk_reader_rejects_offset_at_end() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "test.bin", b"01234567");

        let mut reader = ChunkReader::new(&path, 4).unwrap();
        assert!(reader.seek_to(8).is_err());
        assert!(reader.seek_to(0).is_ok());
    }

    #[test]
    fn chunk_reader_detects_truncation() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "test.bin", b"0123456789");

        let mut reader = ChunkReader::new(&path, 4).unwrap();
        std::fs::write(&path, b"012").unwrap();
        assert!(matches!(reader.digest(), Err(TransferError::Io(_))));
    }

    #[test]
    fn chunk_reader_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = ChunkReader::new(&dir.path().join("nope.bin"), 4);
        assert!(matches!(result, Err(TransferError::Io(_))));
    }

    #[test]
    fn chunk_reader_default_chunk_size() {
        let dir = TempDir::new().unwrap();
        let data = vec![1u8; DEFAULT_CHUNK_SIZE + 1];
        let path = create_test_file(dir.path(), "big.bin", &data);

        let mut reader = ChunkReader::new(&path, 0).unwrap();
        assert_eq!(reader.remaining_chunks(), 2);
        let first = reader.next_chunk().unwrap().unwrap();
        assert_eq!(first.data.len(), DEFAULT_CHUNK_SIZE);
        let second = reader.next_chunk().unwrap().unwrap();
        assert_eq!(second.data.len(), 1);
    }
}
