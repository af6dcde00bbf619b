//! Telemetry events and sinks for the batch creation pipeline.
//!
//! Events stay local: the stderr sink writes JSON lines for debugging and
//! nothing is transmitted anywhere.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by hubdeck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// One issue was created.
    IssueCreated {
        /// Repository full name.
        repository: String,
        /// Zero-based position of the item in the batch.
        index: usize,
        /// Number GitHub assigned.
        number: u64,
    },
    /// The batch stopped at a failing item.
    BatchHalted {
        /// Repository full name.
        repository: String,
        /// Zero-based position of the failing item.
        index: usize,
        /// Items created before the failure.
        created: usize,
        /// Rendered cause.
        error: String,
    },
    /// Every item in the batch was created.
    BatchCompleted {
        /// Repository full name.
        repository: String,
        /// Items created.
        created: usize,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Sink that keeps events in memory for assertions.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingTelemetrySink {
    events: std::sync::Mutex<Vec<TelemetryEvent>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingTelemetrySink {
    /// Removes and returns every recorded event.
    #[must_use]
    pub fn take(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl TelemetrySink for RecordingTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}
