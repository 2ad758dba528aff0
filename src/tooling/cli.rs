//! Shelve CLI
//!
//! Ingests a directory of files as the batch, then inspects, validates,
//! previews, or packs it. The directory walk is the CLI's upload surface;
//! any other `FileSource` provider can drive the same engine.

use crate::archive::zip::ZipSink;
use crate::archive::DEFAULT_ARCHIVE_NAME;
use crate::classify::{ClassificationNode, ClassificationSpec};
use crate::error::EngineError;
use crate::record::{DiskSource, FileRecord, FileSource};
use crate::session::ClassifySession;
use crate::telemetry::{HttpSink, LogSink, TelemetrySink};
use crate::tooling::format::{
    format_inspect_text, format_pack_text, format_preview_text, format_validation_text,
};
use crate::validate::BatchValidation;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use walkdir::WalkDir;

/// Shelve CLI - token-based filename classification and archiving
#[derive(Parser)]
#[command(name = "shelve")]
#[command(about = "Classify files by filename tokens and pack them into a nested zip")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Token delimiter used to split filenames
    #[arg(long, default_value = "_")]
    pub delimiter: String,

    /// Recurse into subdirectories when collecting input files
    #[arg(long)]
    pub recursive: bool,

    /// Telemetry collector endpoint (omit to log events locally)
    #[arg(long)]
    pub telemetry_endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the batch with each file's token split
    Inspect {
        /// Input directory
        dir: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check that every file splits into the same token count
    Validate {
        /// Input directory
        dir: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Build the classification tree and print its structure
    Preview {
        /// Input directory
        dir: PathBuf,
        /// Token index per hierarchy level, comma separated (e.g. 0,1)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<usize>,
        /// Number of hierarchy levels (defaults to the field count)
        #[arg(long)]
        levels: Option<usize>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Classify the batch and pack it into a zip archive
    Pack {
        /// Input directory
        dir: PathBuf,
        /// Token index per hierarchy level, comma separated (e.g. 0,1)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<usize>,
        /// Number of hierarchy levels (defaults to the field count)
        #[arg(long)]
        levels: Option<usize>,
        /// Output archive path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Prompt for the level count and field indices
        #[arg(long)]
        interactive: bool,
    },
}

#[derive(Serialize)]
struct InspectOutput {
    delimiter: String,
    total: usize,
    files: Vec<FileRecord>,
}

#[derive(Serialize)]
struct ValidateOutput {
    valid: bool,
    #[serde(flatten)]
    outcome: BatchValidation,
}

#[derive(Serialize)]
struct PreviewOutput {
    level_count: usize,
    field_indices: Vec<usize>,
    tree: ClassificationNode,
}

#[derive(Serialize)]
struct PackOutput {
    output: String,
    file_count: usize,
    archive_bytes: usize,
}

/// CLI context holding the batch configuration.
pub struct CliContext {
    delimiter: String,
    recursive: bool,
    telemetry: Arc<dyn TelemetrySink>,
}

impl CliContext {
    /// Create a new CLI context.
    ///
    /// Must run inside a tokio runtime when a telemetry endpoint is given;
    /// delivery tasks are spawned onto it.
    pub fn new(delimiter: String, recursive: bool, telemetry_endpoint: Option<&str>) -> Self {
        let telemetry: Arc<dyn TelemetrySink> = match telemetry_endpoint {
            Some(endpoint) => Arc::new(HttpSink::new(endpoint)),
            None => Arc::new(LogSink),
        };
        Self {
            delimiter,
            recursive,
            telemetry,
        }
    }

    /// Execute a CLI command.
    pub async fn execute(&self, command: &Commands) -> Result<String, EngineError> {
        match command {
            Commands::Inspect { dir, format } => {
                let session = self.session_for(dir)?;
                let output = InspectOutput {
                    delimiter: self.delimiter.clone(),
                    total: session.records().len(),
                    files: session.records().to_vec(),
                };
                if format == "json" {
                    to_json(&output)
                } else {
                    Ok(format_inspect_text(session.records(), &self.delimiter))
                }
            }
            Commands::Validate { dir, format } => {
                let session = self.session_for(dir)?;
                let outcome = session.validate();
                if format == "json" {
                    to_json(&ValidateOutput {
                        valid: outcome.is_consistent(),
                        outcome,
                    })
                } else {
                    Ok(format_validation_text(&outcome))
                }
            }
            Commands::Preview {
                dir,
                fields,
                levels,
                format,
            } => {
                let mut session = self.session_for(dir)?;
                let spec = resolve_spec(fields, *levels)?;
                session.classify(&spec)?;
                if format == "json" {
                    let tree = session
                        .tree()
                        .ok_or(EngineError::MissingTree)?
                        .clone();
                    to_json(&PreviewOutput {
                        level_count: spec.level_count,
                        field_indices: spec.field_indices.clone(),
                        tree,
                    })
                } else {
                    Ok(format_preview_text(&session.render()?))
                }
            }
            Commands::Pack {
                dir,
                fields,
                levels,
                output,
                interactive,
            } => {
                let mut session = self.session_for(dir)?;
                let spec = if *interactive {
                    prompt_spec(session.records())?
                } else {
                    resolve_spec(fields, *levels)?
                };
                session.classify(&spec)?;

                let mut sink = ZipSink::new();
                let blob = session.pack(&mut sink).await?;

                let out_path = output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_NAME));
                tokio::fs::write(&out_path, &blob).await?;
                info!(path = %out_path.display(), bytes = blob.len(), "archive written");
                Ok(format_pack_text(
                    &out_path.display().to_string(),
                    session.records().len(),
                    blob.len(),
                ))
            }
        }
    }

    /// Walk the input directory and ingest its files as the batch.
    fn session_for(&self, dir: &Path) -> Result<ClassifySession, EngineError> {
        let sources = self.collect_sources(dir)?;
        let mut session =
            ClassifySession::with_telemetry(self.delimiter.clone(), Arc::clone(&self.telemetry));
        session.ingest(sources);
        Ok(session)
    }

    /// Collect regular files in sorted name order for reproducible runs.
    fn collect_sources(&self, dir: &Path) -> Result<Vec<Arc<dyn FileSource>>, EngineError> {
        let root = dunce::canonicalize(dir).map_err(|e| {
            EngineError::Config(format!("input directory {}: {}", dir.display(), e))
        })?;
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut sources: Vec<Arc<dyn FileSource>> = Vec::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                EngineError::Config(format!("failed to walk {}: {}", root.display(), e))
            })?;
            if entry.file_type().is_file() {
                sources.push(Arc::new(DiskSource::new(entry.into_path())));
            }
        }
        Ok(sources)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, EngineError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| EngineError::Config(format!("failed to encode output: {}", e)))
}

/// Build a spec from the flag values.
///
/// The level count defaults to the number of given fields; an explicit
/// count beyond the field list degrades those levels to the fallback
/// label, same as at classification time.
fn resolve_spec(fields: &[usize], levels: Option<usize>) -> Result<ClassificationSpec, EngineError> {
    if fields.is_empty() {
        return Err(EngineError::Config(
            "no field indices given; use --fields (e.g. --fields 0,1) or --interactive".to_string(),
        ));
    }
    let level_count = levels.unwrap_or(fields.len());
    if level_count == 0 {
        return Err(EngineError::Config(
            "level count must be at least 1".to_string(),
        ));
    }
    Ok(ClassificationSpec::new(level_count, fields.to_vec()))
}

/// Prompt for the level count and one field index per level.
fn prompt_spec(records: &[FileRecord]) -> Result<ClassificationSpec, EngineError> {
    use dialoguer::Input;

    let first = records.first().ok_or(EngineError::EmptyBatch)?;
    let available: Vec<String> = first
        .tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| format!("{}:{}", idx, token))
        .collect();
    println!("Available fields: {}", available.join(", "));

    let level_count: usize = Input::new()
        .with_prompt("Hierarchy levels (1-5)")
        .default(1)
        .validate_with(|input: &usize| {
            if (1..=5).contains(input) {
                Ok(())
            } else {
                Err("level count must be between 1 and 5")
            }
        })
        .interact_text()
        .map_err(|e| EngineError::Config(format!("failed to get user input: {}", e)))?;

    let mut field_indices = Vec::with_capacity(level_count);
    for level in 0..level_count {
        let index: usize = Input::new()
            .with_prompt(format!("Token index for level {}", level + 1))
            .default(0)
            .interact_text()
            .map_err(|e| EngineError::Config(format!("failed to get user input: {}", e)))?;
        field_indices.push(index);
    }

    Ok(ClassificationSpec::new(level_count, field_indices))
}
