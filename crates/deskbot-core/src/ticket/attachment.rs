//! Attachments selected for a ticket but not yet uploaded.

use crate::error::Result;
use std::path::Path;

/// Kind of preview shown for a pending attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Document,
}

/// What the escalation dialog shows for each selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPreview {
    pub name: String,
    /// Size in kilobytes with one decimal, e.g. `"12.5 KB"`.
    pub size_label: String,
    pub kind: AttachmentKind,
}

/// A local file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PendingAttachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self { name, mime, bytes }
    }

    /// Reads a file from disk, naming the attachment after the file name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn preview(&self) -> AttachmentPreview {
        AttachmentPreview {
            name: self.name.clone(),
            size_label: format!("{:.1} KB", self.size() as f64 / 1024.0),
            kind: if self.is_image() {
                AttachmentKind::Image
            } else {
                AttachmentKind::Document
            },
        }
    }
}
