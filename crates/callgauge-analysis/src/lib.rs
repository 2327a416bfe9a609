//! Two-tier call-analysis pipeline
//!
//! Turns a call transcript into a structured quality report by calling a
//! rate-limited generative oracle. A bounded-retry primary tier degrades to
//! a summary-only fallback tier on sustained capacity exhaustion, and an
//! outer safety net guarantees a fully populated report on every path.

mod analyzer;
mod fallback;
mod orchestrator;
mod parse;
mod primary;
mod prompts;

pub use analyzer::{error_report, CallAnalyzer, MAX_ANALYSIS_CHARS, TRANSCRIPT_ACCURACY_UNMEASURED};
pub use fallback::{DEGRADED_METRIC_LABEL, DEGRADED_SUMMARY_PREFIX};
pub use orchestrator::{
    CallJob, CallOrchestrator, CallSource, JobPhase, StatusSink, StatusUpdate, Transcriber,
};
pub use prompts::{build_fallback_prompt, build_primary_prompt, SCORING_METRICS};

// Re-export core types
pub use callgauge_core::{Error, Result};
