/// Maximum number of file bytes carried by one upload request (512 KiB).
///
/// The final chunk of a file may be shorter.
pub const CHUNK_SIZE: usize = 512 * 1024;

/// Multipart boundary token shared with the server.
///
/// Delimiter lines are `--` followed by this token; the closing line appends
/// another `--`.
pub const BOUNDARY: &str = "--------------------------8e5m2D6l5Q4h6";

/// `Content-Type` header of every upload request.
pub const MULTIPART_CONTENT_TYPE: &str =
    "multipart/form-data; boundary=--------------------------8e5m2D6l5Q4h6";

/// Content type of the binary `content` part.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Line terminator used throughout the multipart body.
pub const CRLF: &str = "\r\n";

/// Service path of the upload handler, relative to the collection URI.
pub const UPLOAD_SERVICE_PATH: &str = "VersionControl/v1.0/upload.ashx";
