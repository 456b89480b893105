use std::fmt;

/// Form field names of an upload request, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Server-relative path of the item being uploaded.
    Item,
    /// Workspace name.
    WorkspaceName,
    /// Workspace owner.
    WorkspaceOwner,
    /// Length of the whole file in bytes.
    FileLength,
    /// Whole-file digest.
    Hash,
    /// Byte range covered by this request.
    Range,
    /// Binary chunk content.
    Content,
}

impl FormField {
    /// Every field in the order the server expects them.
    pub const ORDER: [FormField; 7] = [
        FormField::Item,
        FormField::WorkspaceName,
        FormField::WorkspaceOwner,
        FormField::FileLength,
        FormField::Hash,
        FormField::Range,
        FormField::Content,
    ];

    /// Name used in the `Content-Disposition` header.
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Item => "item",
            FormField::WorkspaceName => "wsname",
            FormField::WorkspaceOwner => "wsowner",
            FormField::FileLength => "filelength",
            FormField::Hash => "hash",
            FormField::Range => "range",
            FormField::Content => "content",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
