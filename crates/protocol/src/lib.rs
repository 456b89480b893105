//! Wire layer for the version-control server's upload service.
//!
//! Everything in this crate is pure: no file or network I/O. The upload
//! client composes these pieces into one HTTP request per chunk.
//!
//! # Wire format
//!
//! Each chunk is a `multipart/form-data` POST with seven parts, in order:
//! `item`, `wsname`, `wsowner`, `filelength`, `hash`, `range`, `content`.
//! See [`multipart`] for the exact byte layout.

pub mod constants;
pub mod fields;
pub mod hash;
pub mod multipart;
pub mod range;

// Re-export primary types for convenience.
pub use constants::{BOUNDARY, CHUNK_SIZE, MULTIPART_CONTENT_TYPE, OCTET_STREAM};
pub use fields::FormField;
pub use hash::{ContentHasher, FileDigest, hash_bytes};
pub use multipart::{MultipartEncoder, MultipartError};
pub use range::{ByteRange, RangeError, format_range};
