//! Format inspect, validation, preview, and pack results as text.

use crate::record::FileRecord;
use crate::validate::BatchValidation;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Format the tokenized batch as a table of name, tokens, and extension.
pub fn format_inspect_text(records: &[FileRecord], delimiter: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Files")));
    if records.is_empty() {
        out.push_str("No files found.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Tokens", "Extension"]);
    for record in records {
        table.add_row(vec![
            record.display_name.clone(),
            record.tokens.join(" | "),
            record.extension.clone(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!(
        "Total: {} files, delimiter {:?}.\n",
        records.len(),
        delimiter
    ));
    out
}

/// Human-readable validation verdict.
pub fn format_validation_text(validation: &BatchValidation) -> String {
    match validation {
        BatchValidation::Empty => "No files in batch; nothing to validate.".to_string(),
        BatchValidation::Consistent { token_count } => format!(
            "Validation passed: every file splits into {} tokens.",
            token_count
        ),
        BatchValidation::Inconsistent { counts } => format!(
            "Validation failed: token counts differ across the batch ({}).",
            counts
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Preview heading plus the rendered tree.
pub fn format_preview_text(rendered: &str) -> String {
    format!(
        "{}\n\n{}",
        format_section_heading("Classification structure"),
        rendered
    )
}

/// Pack completion summary.
pub fn format_pack_text(output: &str, file_count: usize, archive_bytes: usize) -> String {
    format!(
        "Packed {} files into {} ({} bytes).",
        file_count, output, archive_bytes
    )
}
