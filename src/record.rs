//! File records and the source capability they are built from.
//!
//! A [`FileSource`] is the minimal contract the engine requires from an
//! upload surface: a name and an async full-content read. A [`FileRecord`]
//! is the immutable tokenized view of one source; it is never patched in
//! place. A delimiter change rebuilds every record from the retained
//! sources.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Capability supplied by the upload surface for each file.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Original filename, extension included.
    fn name(&self) -> &str;

    /// Read the full binary content.
    async fn read_all(&self) -> std::io::Result<Vec<u8>>;
}

/// Source backed by a file on disk.
pub struct DiskSource {
    name: String,
    path: PathBuf,
}

impl DiskSource {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for DiskSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// In-memory source for embedding callers and tests.
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[async_trait]
impl FileSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Immutable tokenized view of one file.
///
/// `display_name` is the NFC-normalized original filename; `tokens` is the
/// extension-stripped stem split on the delimiter that was active at
/// creation time.
#[derive(Clone, Serialize)]
pub struct FileRecord {
    #[serde(skip)]
    pub source: Arc<dyn FileSource>,
    pub display_name: String,
    pub tokens: Vec<String>,
    pub extension: String,
}

impl std::fmt::Debug for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRecord")
            .field("display_name", &self.display_name)
            .field("tokens", &self.tokens)
            .field("extension", &self.extension)
            .finish()
    }
}
