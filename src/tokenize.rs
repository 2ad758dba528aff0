//! Filename tokenization.
//!
//! A filename is split into an extension and a stem, and the stem into an
//! ordered token sequence on a literal delimiter. Tokenization is total:
//! every filename produces a record, and whether the result is usable is
//! decided later by batch validation.

use crate::record::{FileRecord, FileSource};
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Split a filename into `(stem, extension)`.
///
/// The extension starts at the last `.` only when it sits past the first
/// character, so dot-prefixed names like `.gitignore` carry no extension
/// and the whole name is the stem. The extension keeps its leading dot.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Split a stem into tokens on a literal delimiter.
///
/// A stem without the delimiter yields a single token; an empty stem yields
/// one empty token. An empty delimiter splits into one token per character
/// (and an empty stem into zero tokens).
pub fn split_tokens(stem: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        stem.chars().map(String::from).collect()
    } else {
        stem.split(delimiter).map(str::to_owned).collect()
    }
}

/// Build a [`FileRecord`] from a source with the given delimiter.
///
/// The display name is NFC-normalized once here so that token comparison
/// and folder grouping are byte-stable across platforms.
pub fn tokenize(source: Arc<dyn FileSource>, delimiter: &str) -> FileRecord {
    let display_name: String = source.name().nfc().collect();
    let (stem, extension) = split_extension(&display_name);
    let tokens = split_tokens(stem, delimiter);
    let extension = extension.to_owned();
    FileRecord {
        source,
        display_name,
        tokens,
        extension,
    }
}

/// Tokenize a batch of sources in order.
pub fn tokenize_batch(sources: &[Arc<dyn FileSource>], delimiter: &str) -> Vec<FileRecord> {
    sources
        .iter()
        .map(|s| tokenize(Arc::clone(s), delimiter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MemorySource;
    use proptest::prelude::*;

    fn source(name: &str) -> Arc<dyn FileSource> {
        Arc::new(MemorySource::new(name, Vec::new()))
    }

    #[test]
    fn test_split_extension_basic() {
        assert_eq!(split_extension("A_2024_report.pdf"), ("A_2024_report", ".pdf"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
    }

    #[test]
    fn test_split_extension_absent() {
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(""), ("", ""));
    }

    #[test]
    fn test_split_extension_dot_prefixed() {
        assert_eq!(split_extension(".gitignore"), (".gitignore", ""));
        assert_eq!(split_extension(".env.local"), (".env", ".local"));
    }

    #[test]
    fn test_split_tokens_delimiter_absent_is_single_token() {
        assert_eq!(split_tokens("report", "_"), vec!["report"]);
    }

    #[test]
    fn test_split_tokens_empty_stem_is_single_empty_token() {
        assert_eq!(split_tokens("", "_"), vec![""]);
    }

    #[test]
    fn test_split_tokens_adjacent_delimiters_keep_empty_tokens() {
        assert_eq!(split_tokens("a__b", "_"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_tokens_multichar_delimiter() {
        assert_eq!(split_tokens("a--b--c", "--"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_tokens_empty_delimiter_splits_chars() {
        assert_eq!(split_tokens("abc", ""), vec!["a", "b", "c"]);
        assert!(split_tokens("", "").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_extension_and_order() {
        let record = tokenize(source("A_2024_report.pdf"), "_");
        assert_eq!(record.display_name, "A_2024_report.pdf");
        assert_eq!(record.tokens, vec!["A", "2024", "report"]);
        assert_eq!(record.extension, ".pdf");
    }

    #[test]
    fn test_tokenize_batch_preserves_input_order() {
        let records = tokenize_batch(
            &[source("b_1.txt"), source("a_2.txt")],
            "_",
        );
        assert_eq!(records[0].display_name, "b_1.txt");
        assert_eq!(records[1].display_name, "a_2.txt");
    }

    proptest! {
        // Token count always equals the number of delimiter occurrences
        // plus one for a non-empty delimiter.
        #[test]
        fn prop_token_count_matches_split(
            stem in "[a-zA-Z0-9 ._-]{0,24}",
            delim in "[_,-]",
        ) {
            let tokens = split_tokens(&stem, &delim);
            prop_assert_eq!(tokens.len(), stem.matches(delim.as_str()).count() + 1);
            prop_assert_eq!(tokens.join(&delim), stem);
        }
    }
}
