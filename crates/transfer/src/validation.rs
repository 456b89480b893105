use crate::TransferError;

/// Validates a server-relative repository path before it goes on the wire.
///
/// Rejects:
/// - Empty paths
/// - Paths outside the repository root (not starting with `$/`)
/// - Paths with an empty item name (trailing `/`)
/// - Empty or parent directory (`..`) segments
/// - Quotes and control characters, which would break the
///   `Content-Disposition` header of the binary part
pub fn validate_repository_path(repository_path: &str) -> Result<(), TransferError> {
    if repository_path.is_empty() {
        return Err(TransferError::InvalidPath("empty path".into()));
    }

    let Some(rest) = repository_path.strip_prefix("$/") else {
        return Err(TransferError::InvalidPath(format!(
            "path must start with $/: {repository_path}"
        )));
    };

    if rest.is_empty() || rest.ends_with('/') {
        return Err(TransferError::InvalidPath(format!(
            "missing item name: {repository_path}"
        )));
    }

    if let Some(c) = repository_path
        .chars()
        .find(|c| *c == '"' || c.is_control())
    {
        return Err(TransferError::InvalidPath(format!(
            "character {c:?} not allowed: {repository_path}"
        )));
    }

    for segment in rest.split('/') {
        match segment {
            "" => {
                return Err(TransferError::InvalidPath(format!(
                    "empty segment not allowed: {repository_path}"
                )));
            }
            ".." => {
                return Err(TransferError::InvalidPath(format!(
                    "parent directory traversal not allowed: {repository_path}"
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
