//! Files chosen by the user for upload.

use std::{fmt, sync::Arc};

use crate::prelude::*;

/// A file the user has selected, fully loaded into memory.
///
/// No validation of type or size is performed. Whatever the user picks is
/// what gets uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// The file name sent with the upload. Never contains directories.
    file_name: String,

    /// The file contents. Shared so that snapshots taken by in-flight uploads
    /// are cheap.
    data: Arc<[u8]>,
}

impl SelectedFile {
    /// Create a file from in-memory data.
    pub fn new(file_name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Load a file from disk.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub async fn from_path(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file at path: {:?}", path))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_owned());
        debug!(file_name = %file_name, len = data.len(), "Loaded file");
        Ok(Self::new(file_name, data))
    }

    /// The file name, without any directory components.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The file contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Guess a MIME type from the file extension.
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned()
    }
}

// File contents can be large, so don't dump them into logs.
impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("file_name", &self.file_name)
            .field("len", &self.data.len())
            .finish()
    }
}
