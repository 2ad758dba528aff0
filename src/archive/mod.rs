//! Archive materialization.
//!
//! Walks a classification tree depth-first and serializes it into a single
//! compressed container through an [`ArchiveSink`] capability. Reads and
//! writes run strictly sequentially, one file at a time, in traversal
//! order; the only suspension points are the per-file content reads. The
//! per-file write counter is the sole externally observable intermediate
//! state.

pub mod zip;

use crate::classify::ClassificationNode;
use crate::error::ArchiveError;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};

/// Suggested filename for the finished container.
pub const DEFAULT_ARCHIVE_NAME: &str = "classified-archive.zip";

/// Capability for building a nested-folder container.
pub trait ArchiveSink {
    /// Create a folder at the given label path.
    fn open_folder(&mut self, path: &[String]) -> Result<(), ArchiveError>;

    /// Write one file's bytes under the given folder path.
    fn write_file(&mut self, path: &[String], name: &str, bytes: &[u8]) -> Result<(), ArchiveError>;

    /// Finalize into a single downloadable blob.
    fn finish(&mut self) -> Result<Vec<u8>, ArchiveError>;
}

/// Monotonic per-file write counter.
///
/// `percent` is non-decreasing during a pack and reaches 100 exactly when
/// every file has been written; a failed attempt resets it to zero.
#[derive(Debug)]
pub struct ProgressCounter {
    written: AtomicU64,
    total: u64,
}

impl ProgressCounter {
    pub fn new(total: u64) -> Self {
        Self {
            written: AtomicU64::new(0),
            total,
        }
    }

    /// Record one completed file write; returns the new count.
    pub fn advance(&self) -> u64 {
        self.written.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn written(&self) -> u64 {
        self.written.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Rounded completion percentage.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.written() as f64 / self.total as f64) * 100.0).round() as u8
    }

    pub fn reset(&self) {
        self.written.store(0, Ordering::SeqCst);
    }
}

/// Serialize a classification tree into the sink and finalize the blob.
///
/// Fatal on the first failure: no partial archive is produced and the
/// progress counter is reset so a retry starts clean.
pub async fn materialize<S: ArchiveSink + Send>(
    root: &ClassificationNode,
    sink: &mut S,
    progress: &ProgressCounter,
) -> Result<Vec<u8>, ArchiveError> {
    let walked = write_node(root, Vec::new(), sink, progress).await;
    match walked.and_then(|()| sink.finish()) {
        Ok(blob) => Ok(blob),
        Err(e) => {
            progress.reset();
            Err(e)
        }
    }
}

fn write_node<'a, S: ArchiveSink + Send>(
    node: &'a ClassificationNode,
    path: Vec<String>,
    sink: &'a mut S,
    progress: &'a ProgressCounter,
) -> BoxFuture<'a, Result<(), ArchiveError>> {
    Box::pin(async move {
        match node {
            ClassificationNode::Interior { children } => {
                for (label, child) in children {
                    let mut child_path = path.clone();
                    child_path.push(label.clone());
                    sink.open_folder(&child_path)?;
                    write_node(child, child_path, &mut *sink, progress).await?;
                }
            }
            ClassificationNode::Leaf { files } => {
                for record in files {
                    let bytes = record.source.read_all().await.map_err(|source| {
                        ArchiveError::SourceRead {
                            name: record.display_name.clone(),
                            source,
                        }
                    })?;
                    sink.write_file(&path, &record.display_name, &bytes)?;
                    let written = progress.advance();
                    tracing::debug!(
                        file = %record.display_name,
                        written,
                        total = progress.total(),
                        percent = progress.percent(),
                        "archived file"
                    );
                }
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_and_caps() {
        let progress = ProgressCounter::new(3);
        assert_eq!(progress.percent(), 0);
        progress.advance();
        assert_eq!(progress.percent(), 33);
        progress.advance();
        assert_eq!(progress.percent(), 67);
        progress.advance();
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let progress = ProgressCounter::new(2);
        progress.advance();
        progress.reset();
        assert_eq!(progress.written(), 0);
        assert_eq!(progress.percent(), 0);
    }
}
