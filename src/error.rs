//! Error types for the classification engine and archive pipeline.

use thiserror::Error;

/// Fatal-to-attempt failures while materializing an archive.
///
/// Any of these aborts the in-progress pack: no partial blob is produced,
/// and the progress counter is reset so a retry starts clean.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to read '{name}': {source}")]
    SourceRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write archive entry '{entry}': {source}")]
    EntryWrite {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to finalize archive: {0}")]
    Finalize(#[source] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Recoverable engine-level failures.
///
/// Each user-triggered operation reports its own error and leaves the
/// model from prior successful steps intact.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The batch is empty; validation is vacuous and classification has
    /// nothing to group.
    #[error("no files in batch")]
    EmptyBatch,

    /// Two or more distinct token counts across the batch. Blocking:
    /// classification must not proceed until the delimiter changes or the
    /// batch is fixed.
    #[error("inconsistent token counts across batch: {0:?}")]
    InconsistentTokens(Vec<usize>),

    /// An operation that needs a committed classification tree ran before
    /// one was built.
    #[error("no classification tree; run classify first")]
    MissingTree,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
