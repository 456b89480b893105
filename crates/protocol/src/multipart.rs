//! `multipart/form-data` encoding for upload requests.
//!
//! # Layout
//!
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<field>"\r\n
//! \r\n
//! <value>\r\n
//! ... one block per text field, in insertion order ...
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="content"; filename="<name>"\r\n
//! Content-Type: <type>\r\n
//! \r\n
//! <raw bytes>\r\n
//! --<boundary>--\r\n
//! ```
//!
//! The boundary must not occur inside field values. This is not checked.

use std::fmt::Write as _;

use crate::constants::{BOUNDARY, CRLF};

/// Errors produced while assembling a multipart body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MultipartError {
    #[error("multipart body has no binary part")]
    MissingFile,

    #[error("multipart body already has a binary part: {0}")]
    DuplicateFile(String),
}

struct FilePart<'a> {
    name: String,
    filename: String,
    content_type: String,
    data: &'a [u8],
}

/// Builds a multipart body with ordered text fields and one binary part.
///
/// The binary payload is borrowed and copied exactly once, into a body
/// buffer allocated at its final size.
pub struct MultipartEncoder<'a> {
    boundary: String,
    fields: Vec<(String, String)>,
    file: Option<FilePart<'a>>,
}

impl Default for MultipartEncoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MultipartEncoder<'a> {
    /// Creates an encoder using the service's fixed [`BOUNDARY`].
    pub fn new() -> Self {
        Self::with_boundary(BOUNDARY)
    }

    pub fn with_boundary(boundary: &str) -> Self {
        Self {
            boundary: boundary.to_string(),
            fields: Vec::new(),
            file: None,
        }
    }

    /// Appends a text field. Fields are emitted in call order.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Sets the single binary part, always emitted after the text fields.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: &'a [u8],
    ) -> Result<Self, MultipartError> {
        let name = name.into();
        if let Some(existing) = &self.file {
            return Err(MultipartError::DuplicateFile(existing.name.clone()));
        }
        self.file = Some(FilePart {
            name,
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        });
        Ok(self)
    }

    /// Boundary token used by this encoder.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Exact size in bytes of [`encode`](Self::encode)'s output.
    pub fn encoded_len(&self) -> usize {
        let mut len: usize = self
            .fields
            .iter()
            .map(|(name, value)| self.text_header(name).len() + value.len() + CRLF.len())
            .sum();
        if let Some(file) = &self.file {
            len += self.file_header(file).len() + file.data.len() + CRLF.len();
        }
        len + self.closing().len()
    }

    /// Encodes the full body.
    pub fn encode(&self) -> Result<Vec<u8>, MultipartError> {
        let file = self.file.as_ref().ok_or(MultipartError::MissingFile)?;

        let mut body = Vec::with_capacity(self.encoded_len());
        for (name, value) in &self.fields {
            body.extend_from_slice(self.text_header(name).as_bytes());
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(CRLF.as_bytes());
        }
        body.extend_from_slice(self.file_header(file).as_bytes());
        body.extend_from_slice(file.data);
        body.extend_from_slice(CRLF.as_bytes());
        body.extend_from_slice(self.closing().as_bytes());
        Ok(body)
    }

    fn text_header(&self, name: &str) -> String {
        let mut header = String::with_capacity(self.boundary.len() + name.len() + 48);
        let _ = write!(
            header,
            "--{}{CRLF}Content-Disposition: form-data; name=\"{}\"{CRLF}{CRLF}",
            self.boundary, name
        );
        header
    }

    fn file_header(&self, file: &FilePart<'_>) -> String {
        format!(
            "--{}{CRLF}Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"{CRLF}Content-Type: {}{CRLF}{CRLF}",
            self.boundary, file.name, file.filename, file.content_type
        )
    }

    fn closing(&self) -> String {
        format!("--{}--{CRLF}", self.boundary)
    }
}
