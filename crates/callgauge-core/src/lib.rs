//! Core traits and types for CallGauge
//!
//! This crate defines the fundamental traits and types used across the
//! call-analysis system: the generative oracle abstraction, the error
//! taxonomy and retry classifier, the report data model, transcript
//! preprocessing, and the pipeline event seam. Everything here is oracle-
//! and transport-agnostic, making the analysis tiers test-friendly.

pub mod error;
pub mod events;
pub mod oracle;
pub mod report;
pub mod transcript;

pub use error::{classify, is_rate_limit_signal, Error, ErrorClass, Result};
pub use events::{AnalysisOutcome, EventSink, NullSink, PipelineEvent};
pub use oracle::{GenerationConfig, GenerationResult, Oracle, RetryConfig};
pub use report::{
    clamp_score, AnalysisReport, AnalysisRequest, CallCategorisation, ConversionReadiness,
    DegradedSummary, ImprovementSituation, MetricScore, Product, MIN_TRANSCRIPT_CHARS,
};
pub use transcript::{truncate, TRUNCATION_MARKER};
