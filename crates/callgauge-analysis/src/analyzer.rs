//! Call analyzer: the two-tier pipeline behind a non-throwing boundary
//!
//! `analyze` is a total function. Validation failures, non-transient oracle
//! errors, and fallback failures all converge on a single recovery point
//! that produces a terminal error report; the caller never sees an `Err`.

use std::sync::Arc;
use tracing::warn;

use callgauge_core::{
    truncate, AnalysisOutcome, AnalysisReport, AnalysisRequest, CallCategorisation,
    ConversionReadiness, Error, EventSink, GenerationConfig, MetricScore, NullSink, Oracle,
    PipelineEvent, Result, RetryConfig,
};

use crate::fallback::run_fallback;
use crate::primary::{run_primary, PrimaryOutcome};
use crate::prompts::{build_fallback_prompt, build_primary_prompt};

/// Character budget for the transcript sent to the oracles
pub const MAX_ANALYSIS_CHARS: usize = 30_000;

/// Accuracy descriptor attached when the transcript was supplied by the caller
pub const TRANSCRIPT_ACCURACY_UNMEASURED: &str = "Not measured: transcript supplied by caller";

/// Bound on how much failure text is rendered into a terminal report
const MAX_FAILURE_CHARS: usize = 240;

/// Two-tier call analyzer
///
/// Generic over both oracle seats so tests can script each tier
/// independently. Requests are independent: the analyzer holds no mutable
/// state, and a backoff wait suspends only the request that is waiting.
pub struct CallAnalyzer<P: Oracle, F: Oracle> {
    primary: P,
    fallback: F,
    retry: RetryConfig,
    primary_generation: GenerationConfig,
    fallback_generation: GenerationConfig,
    sink: Arc<dyn EventSink>,
    max_transcript_chars: usize,
}

impl<P: Oracle, F: Oracle> CallAnalyzer<P, F> {
    /// Create an analyzer with default retry and generation settings
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
            retry: RetryConfig::default(),
            primary_generation: GenerationConfig::default(),
            fallback_generation: GenerationConfig::default(),
            sink: Arc::new(NullSink),
            max_transcript_chars: MAX_ANALYSIS_CHARS,
        }
    }

    /// Override the retry policy of the primary tier
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Override the per-tier generation parameters
    pub fn with_generation_configs(
        mut self,
        primary: GenerationConfig,
        fallback: GenerationConfig,
    ) -> Self {
        self.primary_generation = primary;
        self.fallback_generation = fallback;
        self
    }

    /// Attach a progress observer
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Override the transcript character budget
    pub fn with_max_transcript_chars(mut self, max_chars: usize) -> Self {
        self.max_transcript_chars = max_chars;
        self
    }

    /// Analyse one call. Always returns a fully populated report; degraded
    /// and failed outcomes are encoded in `callCategorisation` and the
    /// summary text, never raised.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        let (report, outcome) = match self.run_pipeline(request).await {
            Ok((report, outcome)) => (report, outcome),
            Err(err) => {
                warn!(error = %err, "analysis pipeline failed, assembling terminal report");
                (error_report(&err), AnalysisOutcome::Failed)
            }
        };

        self.sink.emit(&PipelineEvent::Assembled { outcome });

        // Unconditional, and the only place transcript fields are written
        attach_transcript(report, &request.transcript_override)
    }

    async fn run_pipeline(
        &self,
        request: &AnalysisRequest,
    ) -> Result<(AnalysisReport, AnalysisOutcome)> {
        request.validate()?;
        let trimmed = request.transcript_override.trim();
        self.sink.emit(&PipelineEvent::Validated {
            transcript_chars: trimmed.chars().count(),
        });

        let transcript = truncate(trimmed, self.max_transcript_chars);

        let prompt = build_primary_prompt(request, &transcript);
        let outcome = run_primary(
            &self.primary,
            &prompt,
            &self.primary_generation,
            &self.retry,
            self.sink.as_ref(),
        )
        .await?;

        match outcome {
            PrimaryOutcome::Report(report) => Ok((report, AnalysisOutcome::Success)),
            PrimaryOutcome::Exhausted => {
                let prompt = build_fallback_prompt(request, &transcript);
                let report = run_fallback(
                    &self.fallback,
                    &prompt,
                    &self.fallback_generation,
                    self.sink.as_ref(),
                )
                .await?;
                Ok((report, AnalysisOutcome::Degraded))
            }
        }
    }
}

/// Terminal report produced when no tier could analyse the call
pub fn error_report(err: &Error) -> AnalysisReport {
    let message = bounded_message(err);

    AnalysisReport {
        overall_score: 0.0,
        call_categorisation: CallCategorisation::Error,
        summary: format!("Analysis failed: {message}"),
        strengths: Vec::new(),
        areas_for_improvement: vec![
            "Analysis could not be completed; re-run once the failure below is resolved."
                .to_string(),
        ],
        red_flags: vec![format!("System failure during analysis: {message}")],
        metric_scores: vec![MetricScore {
            metric: "System Error".to_string(),
            score: 1.0,
            feedback: message,
        }],
        improvement_situations: Vec::new(),
        suggested_disposition: "Retry analysis".to_string(),
        conversion_readiness: ConversionReadiness::Low,
        transcript: String::new(),
        transcript_accuracy: String::new(),
    }
}

fn bounded_message(err: &Error) -> String {
    let text = err.to_string();
    if text.chars().count() <= MAX_FAILURE_CHARS {
        return text;
    }
    let mut bounded: String = text.chars().take(MAX_FAILURE_CHARS).collect();
    bounded.push('…');
    bounded
}

fn attach_transcript(mut report: AnalysisReport, transcript: &str) -> AnalysisReport {
    report.transcript = transcript.to_string();
    report.transcript_accuracy = TRANSCRIPT_ACCURACY_UNMEASURED.to_string();
    report
}
