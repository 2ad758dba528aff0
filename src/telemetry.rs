//! Occurrence telemetry.
//!
//! Four named events are emitted to an external collector: upload count,
//! classification result, download count, and error context. Emission is
//! fire-and-forget and never required for correctness; a sink that drops
//! every event is a valid collector.

use parking_lot::Mutex;
use serde::Serialize;

/// One occurrence notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    FileUpload {
        file_count: usize,
    },
    FileClassification {
        first_level_labels: Vec<String>,
        level_count: usize,
    },
    FileDownload {
        file_count: usize,
    },
    Error {
        context: String,
        detail: String,
    },
}

/// Collector boundary. Implementations must not block the caller.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: TelemetryEvent);
}

/// Drops every event.
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Emits events to the tracing subscriber at debug level.
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn record(&self, event: TelemetryEvent) {
        tracing::debug!(event = ?event, "telemetry");
    }
}

/// Buffers events in memory; used by tests and embedding callers that
/// want to inspect what was emitted.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }
}

impl TelemetrySink for MemorySink {
    fn record(&self, event: TelemetryEvent) {
        self.events.lock().push(event);
    }
}

/// Posts events to an HTTP collector endpoint, best effort.
///
/// Each event is serialized as JSON and sent from a spawned task; delivery
/// failures are logged and otherwise ignored.
pub struct HttpSink {
    endpoint: String,
    client: reqwest::Client,
    handle: tokio::runtime::Handle,
}

impl HttpSink {
    /// Must be called from within a tokio runtime.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            handle: tokio::runtime::Handle::current(),
        }
    }
}

impl TelemetrySink for HttpSink {
    fn record(&self, event: TelemetryEvent) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let payload = serde_json::json!({
            "emitted_at": chrono::Utc::now().to_rfc3339(),
            "payload": event,
        });
        self.handle.spawn(async move {
            if let Err(e) = client.post(&endpoint).json(&payload).send().await {
                tracing::debug!(error = %e, "telemetry delivery failed");
            }
        });
    }
}
