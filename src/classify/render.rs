//! Text projection of a classification tree.
//!
//! Pure read-only preview; callable any number of times on the same tree.

use super::ClassificationNode;

/// Render the tree as an indented folder listing.
///
/// Interior entries print as `label/`; leaf entries summarize their file
/// count and display names. Indentation is two spaces per depth.
pub fn render_tree(root: &ClassificationNode) -> String {
    let mut out = String::new();
    render_children(root, 0, &mut out);
    out
}

fn render_children(node: &ClassificationNode, depth: usize, out: &mut String) {
    let ClassificationNode::Interior { children } = node else {
        return;
    };
    let indent = "  ".repeat(depth);
    for (label, child) in children {
        match child {
            ClassificationNode::Leaf { files } => {
                let names: Vec<&str> = files.iter().map(|f| f.display_name.as_str()).collect();
                out.push_str(&format!(
                    "{indent}{label}/ ({} files: {})\n",
                    files.len(),
                    names.join(", ")
                ));
            }
            ClassificationNode::Interior { .. } => {
                out.push_str(&format!("{indent}{label}/\n"));
                render_children(child, depth + 1, out);
            }
        }
    }
}
