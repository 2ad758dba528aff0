//! Hierarchical classification of a validated batch.
//!
//! Files are grouped into a tree whose depth equals the configured level
//! count; branching at each depth is keyed by the token value at that
//! level's field index. Grouping is total: an index that is out of range
//! for a record (or selects an empty token) degrades to the fixed
//! `unclassified` label instead of failing.

pub mod render;

use crate::record::FileRecord;
use serde::Serialize;

/// Folder label used when a configured token index is absent or empty for
/// a given record.
pub const UNCLASSIFIED_LABEL: &str = "unclassified";

/// How many hierarchy levels to build and which token index feeds each one.
///
/// `field_indices[i]` selects the token position for level `i`. The
/// builder reads only the first `level_count` entries; a missing entry
/// degrades to [`UNCLASSIFIED_LABEL`] like any other absent index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationSpec {
    pub level_count: usize,
    pub field_indices: Vec<usize>,
}

impl ClassificationSpec {
    /// Spec with one level per given index.
    pub fn from_indices(field_indices: Vec<usize>) -> Self {
        Self {
            level_count: field_indices.len(),
            field_indices,
        }
    }

    pub fn new(level_count: usize, field_indices: Vec<usize>) -> Self {
        Self {
            level_count,
            field_indices,
        }
    }
}

/// One node of the classification tree.
///
/// Interior children keep insertion order; leaf records keep batch order.
/// Only nodes at the final level are leaves.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationNode {
    Interior {
        children: Vec<(String, ClassificationNode)>,
    },
    Leaf {
        files: Vec<FileRecord>,
    },
}

impl ClassificationNode {
    fn interior() -> Self {
        ClassificationNode::Interior {
            children: Vec::new(),
        }
    }

    fn leaf() -> Self {
        ClassificationNode::Leaf { files: Vec::new() }
    }

    /// Total number of files reachable from this node.
    pub fn file_count(&self) -> usize {
        match self {
            ClassificationNode::Interior { children } => {
                children.iter().map(|(_, child)| child.file_count()).sum()
            }
            ClassificationNode::Leaf { files } => files.len(),
        }
    }

    /// Labels of this node's direct children (interior nodes only).
    pub fn child_labels(&self) -> Vec<&str> {
        match self {
            ClassificationNode::Interior { children } => {
                children.iter().map(|(label, _)| label.as_str()).collect()
            }
            ClassificationNode::Leaf { .. } => Vec::new(),
        }
    }

    fn child_entry(&mut self, label: &str, make: fn() -> ClassificationNode) -> &mut ClassificationNode {
        let ClassificationNode::Interior { children } = self else {
            unreachable!("descend only through interior nodes");
        };
        let pos = match children.iter().position(|(l, _)| l == label) {
            Some(pos) => pos,
            None => {
                children.push((label.to_owned(), make()));
                children.len() - 1
            }
        };
        &mut children[pos].1
    }
}

/// Label a record contributes at one level.
fn level_label(record: &FileRecord, index: Option<&usize>) -> String {
    index
        .and_then(|&i| record.tokens.get(i))
        .filter(|token| !token.is_empty())
        .cloned()
        .unwrap_or_else(|| UNCLASSIFIED_LABEL.to_owned())
}

/// Group a batch into a classification tree.
///
/// Deterministic: identical batch and spec reproduce identical key order
/// and leaf membership. Grouping is stable; leaf sequences preserve the
/// input batch order.
pub fn build_tree(records: &[FileRecord], spec: &ClassificationSpec) -> ClassificationNode {
    let mut root = ClassificationNode::interior();
    let levels = spec.level_count.max(1);
    for record in records {
        let mut node = &mut root;
        for level in 0..levels {
            let label = level_label(record, spec.field_indices.get(level));
            if level == levels - 1 {
                let leaf = node.child_entry(&label, ClassificationNode::leaf);
                let ClassificationNode::Leaf { files } = leaf else {
                    unreachable!("final level holds leaves");
                };
                files.push(record.clone());
            } else {
                node = node.child_entry(&label, ClassificationNode::interior);
            }
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FileSource, MemorySource};
    use crate::tokenize::tokenize_batch;
    use std::sync::Arc;

    fn batch(names: &[&str]) -> Vec<FileRecord> {
        let sources: Vec<Arc<dyn FileSource>> = names
            .iter()
            .map(|n| Arc::new(MemorySource::new(*n, Vec::new())) as Arc<dyn FileSource>)
            .collect();
        tokenize_batch(&sources, "_")
    }

    fn leaf_names(node: &ClassificationNode, path: &[&str]) -> Vec<String> {
        let mut current = node;
        for label in path {
            let ClassificationNode::Interior { children } = current else {
                panic!("expected interior at {label}");
            };
            current = &children
                .iter()
                .find(|(l, _)| l == label)
                .unwrap_or_else(|| panic!("missing child {label}"))
                .1;
        }
        let ClassificationNode::Leaf { files } = current else {
            panic!("expected leaf at {path:?}");
        };
        files.iter().map(|f| f.display_name.clone()).collect()
    }

    #[test]
    fn test_two_level_grouping() {
        let records = batch(&["A_2024_report.pdf", "B_2024_report.pdf", "A_2023_report.pdf"]);
        let spec = ClassificationSpec::from_indices(vec![0, 1]);
        let tree = build_tree(&records, &spec);

        assert_eq!(tree.child_labels(), vec!["A", "B"]);
        assert_eq!(leaf_names(&tree, &["A", "2024"]), vec!["A_2024_report.pdf"]);
        assert_eq!(leaf_names(&tree, &["A", "2023"]), vec!["A_2023_report.pdf"]);
        assert_eq!(leaf_names(&tree, &["B", "2024"]), vec!["B_2024_report.pdf"]);
        assert_eq!(tree.file_count(), 3);
    }

    #[test]
    fn test_single_level_keeps_batch_order() {
        let records = batch(&["X_b.txt", "X_a.txt", "X_c.txt"]);
        let spec = ClassificationSpec::from_indices(vec![0]);
        let tree = build_tree(&records, &spec);
        assert_eq!(
            leaf_names(&tree, &["X"]),
            vec!["X_b.txt", "X_a.txt", "X_c.txt"]
        );
    }

    #[test]
    fn test_out_of_range_index_falls_back() {
        let records = batch(&["A_1.txt"]);
        let spec = ClassificationSpec::from_indices(vec![5]);
        let tree = build_tree(&records, &spec);
        assert_eq!(tree.child_labels(), vec![UNCLASSIFIED_LABEL]);
        assert_eq!(leaf_names(&tree, &[UNCLASSIFIED_LABEL]), vec!["A_1.txt"]);
    }

    #[test]
    fn test_empty_token_falls_back() {
        let records = batch(&["__x.txt"]);
        let spec = ClassificationSpec::from_indices(vec![1]);
        let tree = build_tree(&records, &spec);
        assert_eq!(tree.child_labels(), vec![UNCLASSIFIED_LABEL]);
    }

    #[test]
    fn test_missing_field_index_entry_falls_back() {
        let records = batch(&["A_2024_report.pdf"]);
        let spec = ClassificationSpec::new(2, vec![0]);
        let tree = build_tree(&records, &spec);
        assert_eq!(tree.child_labels(), vec!["A"]);
        assert_eq!(
            leaf_names(&tree, &["A", UNCLASSIFIED_LABEL]),
            vec!["A_2024_report.pdf"]
        );
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let records = batch(&["B_2_x.txt", "A_1_y.txt", "B_1_z.txt", "A_2_w.txt"]);
        let spec = ClassificationSpec::from_indices(vec![0, 1]);
        let first = build_tree(&records, &spec);
        let second = build_tree(&records, &spec);
        assert_eq!(
            render::render_tree(&first),
            render::render_tree(&second)
        );
        assert_eq!(first.child_labels(), second.child_labels());
    }
}
