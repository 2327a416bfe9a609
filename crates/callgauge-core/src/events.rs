//! Pipeline progress events and the observer seam
//!
//! The pipeline reports progress through an injected [`EventSink`] instead
//! of writing to the console, keeping observability decoupled from the
//! returned report.

use std::time::Duration;

/// Terminal outcome of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Full-fidelity report from the primary tier
    Success,
    /// Summary-only report from the fallback tier
    Degraded,
    /// Terminal error report from the safety net
    Failed,
}

/// Progress event emitted at pipeline phase boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Request accepted for analysis
    Validated { transcript_chars: usize },
    /// One primary-tier oracle attempt is starting
    PrimaryAttempt { attempt: u32, max_attempts: u32 },
    /// Backoff sleep before the next primary attempt
    BackoffWait { delay: Duration },
    /// Primary capacity exhausted; switching to the backup oracle
    FallbackEngaged,
    /// A report has been assembled and is about to be returned
    Assembled { outcome: AnalysisOutcome },
}

/// Observer for pipeline progress
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &PipelineEvent);
}

/// Sink that discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &PipelineEvent) {}
}
