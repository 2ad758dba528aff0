//! Headless classification session.
//!
//! Carries the state the original step flow kept in its UI: the active
//! delimiter, the tokenized batch, and the last committed classification
//! tree. Each operation validates its own inputs, reports its own failure,
//! and on success replaces the relevant snapshot atomically; an error in
//! one operation never disturbs the model from prior successful steps.

use crate::archive::{materialize, ArchiveSink, ProgressCounter};
use crate::classify::{build_tree, ClassificationNode, ClassificationSpec};
use crate::error::EngineError;
use crate::record::{FileRecord, FileSource};
use crate::telemetry::{NoopSink, TelemetryEvent, TelemetrySink};
use crate::tokenize::tokenize_batch;
use crate::validate::{validate_batch, BatchValidation};
use std::sync::Arc;
use tracing::info;

pub struct ClassifySession {
    delimiter: String,
    sources: Vec<Arc<dyn FileSource>>,
    records: Vec<FileRecord>,
    tree: Option<Arc<ClassificationNode>>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl ClassifySession {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self::with_telemetry(delimiter, Arc::new(NoopSink))
    }

    pub fn with_telemetry(delimiter: impl Into<String>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            delimiter: delimiter.into(),
            sources: Vec::new(),
            records: Vec::new(),
            tree: None,
            telemetry,
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn tree(&self) -> Option<&ClassificationNode> {
        self.tree.as_deref()
    }

    /// Replace the batch with freshly tokenized records.
    ///
    /// Any previously committed tree is discarded; it described the old
    /// batch.
    pub fn ingest(&mut self, sources: Vec<Arc<dyn FileSource>>) -> usize {
        self.records = tokenize_batch(&sources, &self.delimiter);
        self.sources = sources;
        self.tree = None;
        self.telemetry.record(TelemetryEvent::FileUpload {
            file_count: self.records.len(),
        });
        info!(file_count = self.records.len(), "batch ingested");
        self.records.len()
    }

    /// Change the delimiter and rebuild every record from the retained
    /// sources. Records are immutable; they are recomputed, not patched.
    pub fn set_delimiter(&mut self, delimiter: impl Into<String>) {
        self.delimiter = delimiter.into();
        self.records = tokenize_batch(&self.sources, &self.delimiter);
        self.tree = None;
    }

    /// Check token-count consistency across the batch.
    pub fn validate(&self) -> BatchValidation {
        let validation = validate_batch(&self.records);
        if let BatchValidation::Inconsistent { counts } = &validation {
            self.telemetry.record(TelemetryEvent::Error {
                context: "separator_validation".to_string(),
                detail: format!("token counts {counts:?}"),
            });
        }
        validation
    }

    /// Build and commit a classification tree for the current batch.
    ///
    /// Requires a non-empty, consistent batch; on failure the previously
    /// committed tree (if any) is left in place.
    pub fn classify(
        &mut self,
        spec: &ClassificationSpec,
    ) -> Result<Arc<ClassificationNode>, EngineError> {
        match self.validate() {
            BatchValidation::Empty => return Err(EngineError::EmptyBatch),
            BatchValidation::Inconsistent { counts } => {
                return Err(EngineError::InconsistentTokens(counts));
            }
            BatchValidation::Consistent { .. } => {}
        }
        let tree = Arc::new(build_tree(&self.records, spec));
        self.telemetry.record(TelemetryEvent::FileClassification {
            first_level_labels: tree.child_labels().iter().map(|s| s.to_string()).collect(),
            level_count: spec.level_count,
        });
        info!(
            levels = spec.level_count,
            groups = tree.child_labels().len(),
            "classification committed"
        );
        self.tree = Some(Arc::clone(&tree));
        Ok(tree)
    }

    /// Render the committed tree as an indented preview.
    pub fn render(&self) -> Result<String, EngineError> {
        let tree = self.tree().ok_or(EngineError::MissingTree)?;
        Ok(crate::classify::render::render_tree(tree))
    }

    /// Materialize the committed tree into the sink and return the blob.
    ///
    /// Runs to completion or failure; there is no mid-archive
    /// cancellation. Failure aborts the attempt, resets progress, emits a
    /// single error event, and leaves the committed model intact.
    pub async fn pack<S: ArchiveSink + Send>(
        &self,
        sink: &mut S,
    ) -> Result<Vec<u8>, EngineError> {
        let tree = self.tree.clone().ok_or(EngineError::MissingTree)?;
        let progress = ProgressCounter::new(self.records.len() as u64);
        match materialize(&tree, sink, &progress).await {
            Ok(blob) => {
                self.telemetry.record(TelemetryEvent::FileDownload {
                    file_count: self.records.len(),
                });
                info!(
                    file_count = self.records.len(),
                    bytes = blob.len(),
                    "archive materialized"
                );
                Ok(blob)
            }
            Err(e) => {
                self.telemetry.record(TelemetryEvent::Error {
                    context: "download_error".to_string(),
                    detail: e.to_string(),
                });
                Err(EngineError::Archive(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::zip::ZipSink;
    use crate::record::MemorySource;
    use crate::telemetry::MemorySink;

    fn sources(names: &[&str]) -> Vec<Arc<dyn FileSource>> {
        names
            .iter()
            .map(|n| Arc::new(MemorySource::new(*n, b"data".to_vec())) as Arc<dyn FileSource>)
            .collect()
    }

    #[test]
    fn test_ingest_replaces_batch_and_clears_tree() {
        let mut session = ClassifySession::new("_");
        session.ingest(sources(&["A_1.txt"]));
        session
            .classify(&ClassificationSpec::from_indices(vec![0]))
            .unwrap();
        assert!(session.tree().is_some());

        session.ingest(sources(&["B_2.txt"]));
        assert!(session.tree().is_none());
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].tokens, vec!["B", "2"]);
    }

    #[test]
    fn test_set_delimiter_rebuilds_records_from_sources() {
        let mut session = ClassifySession::new("_");
        session.ingest(sources(&["A-1_x.txt"]));
        assert_eq!(session.records()[0].tokens, vec!["A-1", "x"]);

        session.set_delimiter("-");
        assert_eq!(session.records()[0].tokens, vec!["A", "1_x"]);
    }

    #[test]
    fn test_classify_rejects_inconsistent_batch_and_keeps_prior_tree() {
        let mut session = ClassifySession::new("_");
        session.ingest(sources(&["A_1.txt", "B_2.txt"]));
        session
            .classify(&ClassificationSpec::from_indices(vec![0]))
            .unwrap();

        session.ingest(sources(&["A_1.txt", "B_1_x.txt"]));
        let err = session
            .classify(&ClassificationSpec::from_indices(vec![0]))
            .unwrap_err();
        assert!(matches!(err, EngineError::InconsistentTokens(_)));
    }

    #[test]
    fn test_classify_empty_batch_is_missing_input() {
        let mut session = ClassifySession::new("_");
        let err = session
            .classify(&ClassificationSpec::from_indices(vec![0]))
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyBatch));
    }

    #[test]
    fn test_telemetry_events_fire_in_step_order() {
        let sink = Arc::new(MemorySink::new());
        let mut session = ClassifySession::with_telemetry("_", sink.clone());
        session.ingest(sources(&["A_1.txt", "B_1.txt"]));
        session
            .classify(&ClassificationSpec::from_indices(vec![0]))
            .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], TelemetryEvent::FileUpload { file_count: 2 });
        assert_eq!(
            events[1],
            TelemetryEvent::FileClassification {
                first_level_labels: vec!["A".to_string(), "B".to_string()],
                level_count: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_pack_before_classify_is_an_error() {
        let mut session = ClassifySession::new("_");
        session.ingest(sources(&["A_1.txt"]));
        let mut sink = ZipSink::new();
        let err = session.pack(&mut sink).await.unwrap_err();
        assert!(matches!(err, EngineError::MissingTree));
    }

    #[tokio::test]
    async fn test_pack_emits_download_event() {
        let sink = Arc::new(MemorySink::new());
        let mut session = ClassifySession::with_telemetry("_", sink.clone());
        session.ingest(sources(&["A_1.txt"]));
        session
            .classify(&ClassificationSpec::from_indices(vec![0]))
            .unwrap();
        let mut zip_sink = ZipSink::new();
        let blob = session.pack(&mut zip_sink).await.unwrap();
        assert!(!blob.is_empty());
        assert!(sink
            .events()
            .contains(&TelemetryEvent::FileDownload { file_count: 1 }));
    }
}
