//! Batch consistency validation.
//!
//! A batch is usable only when every record produced the same token count
//! with the active delimiter. A mixed batch is rejected whole; there is no
//! partial recovery or majority filtering.

use crate::record::FileRecord;
use serde::Serialize;

/// Outcome of validating a tokenized batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchValidation {
    /// Zero records. Vacuously consistent, but callers treat this as a
    /// missing-input condition rather than a green light.
    Empty,
    /// Exactly one distinct token count across the batch.
    Consistent { token_count: usize },
    /// Two or more distinct token counts (sorted, deduplicated).
    Inconsistent { counts: Vec<usize> },
}

impl BatchValidation {
    pub fn is_consistent(&self) -> bool {
        matches!(self, BatchValidation::Consistent { .. })
    }
}

/// Compute the set of distinct token counts across the batch.
pub fn validate_batch(records: &[FileRecord]) -> BatchValidation {
    if records.is_empty() {
        return BatchValidation::Empty;
    }
    let mut counts: Vec<usize> = records.iter().map(|r| r.tokens.len()).collect();
    counts.sort_unstable();
    counts.dedup();
    match counts.as_slice() {
        [only] => BatchValidation::Consistent { token_count: *only },
        _ => BatchValidation::Inconsistent { counts },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FileSource, MemorySource};
    use crate::tokenize::tokenize_batch;
    use std::sync::Arc;

    fn batch(names: &[&str], delimiter: &str) -> Vec<FileRecord> {
        let sources: Vec<Arc<dyn FileSource>> = names
            .iter()
            .map(|n| Arc::new(MemorySource::new(*n, Vec::new())) as Arc<dyn FileSource>)
            .collect();
        tokenize_batch(&sources, delimiter)
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(validate_batch(&[]), BatchValidation::Empty);
    }

    #[test]
    fn test_single_file_is_consistent() {
        let records = batch(&["A_1.txt"], "_");
        assert_eq!(
            validate_batch(&records),
            BatchValidation::Consistent { token_count: 2 }
        );
    }

    #[test]
    fn test_uniform_counts_are_consistent() {
        let records = batch(
            &["A_2024_report.pdf", "B_2024_report.pdf", "A_2023_report.pdf"],
            "_",
        );
        assert_eq!(
            validate_batch(&records),
            BatchValidation::Consistent { token_count: 3 }
        );
    }

    #[test]
    fn test_mixed_counts_are_inconsistent() {
        let records = batch(&["A_1.txt", "B_1_x.txt"], "_");
        assert_eq!(
            validate_batch(&records),
            BatchValidation::Inconsistent { counts: vec![2, 3] }
        );
    }

    #[test]
    fn test_delimiter_absent_everywhere_is_consistent() {
        let records = batch(&["report.pdf", "summary.pdf"], "_");
        assert_eq!(
            validate_batch(&records),
            BatchValidation::Consistent { token_count: 1 }
        );
    }
}
