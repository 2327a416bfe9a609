//! Fallback analysis tier: single-shot summary against the backup oracle
//!
//! Engaged only after the primary tier exhausts its retry budget on
//! sustained rate limiting. The tier does not retry; a failure here is
//! terminal for the pipeline and reaches the safety net.

use tracing::{debug, warn};

use callgauge_core::{
    clamp_score, AnalysisReport, CallCategorisation, ConversionReadiness, DegradedSummary, Error,
    EventSink, GenerationConfig, MetricScore, Oracle, PipelineEvent, Result,
};

use crate::parse::extract_json_object;

/// Disclosure prepended to every degraded summary
pub const DEGRADED_SUMMARY_PREFIX: &str =
    "[Degraded analysis: the primary scoring engine was unavailable] ";

/// Label of the single synthesized metric entry on a degraded report
pub const DEGRADED_METRIC_LABEL: &str = "Degraded Summary Analysis";

/// Run the single-shot fallback and synthesize a full report from it
pub(crate) async fn run_fallback<O: Oracle>(
    oracle: &O,
    prompt: &str,
    generation: &GenerationConfig,
    sink: &dyn EventSink,
) -> Result<AnalysisReport> {
    sink.emit(&PipelineEvent::FallbackEngaged);

    let result = oracle
        .generate(prompt, generation)
        .await
        .map_err(|e| Error::Fallback(e.to_string()))?;

    let summary = parse_summary(&result.text)?;
    debug!(model = %result.model_id, score = summary.overall_score, "fallback analysis succeeded");

    Ok(report_from_summary(summary))
}

/// Decode the backup oracle's reduced-schema answer
fn parse_summary(text: &str) -> Result<DegradedSummary> {
    let raw = extract_json_object(text).map_err(|e| Error::Fallback(e.to_string()))?;
    let summary: DegradedSummary = serde_json::from_str(raw)
        .map_err(|e| Error::Fallback(format!("fallback output did not match schema: {e}")))?;

    if summary.summary.trim().is_empty() {
        warn!("fallback oracle returned an empty summary");
        return Err(Error::Fallback(
            "fallback oracle returned an empty summary".to_string(),
        ));
    }

    Ok(summary)
}

/// Expand a degraded summary into the full report shape.
///
/// The coarse three-bucket categorisation applies, the summary carries the
/// unavailability disclosure, and a single labeled metric entry stands in
/// for the per-dimension scores the light model cannot produce.
pub(crate) fn report_from_summary(summary: DegradedSummary) -> AnalysisReport {
    let score = clamp_score(summary.overall_score);

    AnalysisReport {
        overall_score: score,
        call_categorisation: CallCategorisation::from_score_coarse(score),
        summary: format!("{DEGRADED_SUMMARY_PREFIX}{}", summary.summary),
        strengths: summary.strengths,
        areas_for_improvement: summary.areas_for_improvement,
        red_flags: Vec::new(),
        metric_scores: vec![MetricScore {
            metric: DEGRADED_METRIC_LABEL.to_string(),
            score,
            feedback: "Summary-only analysis produced by the backup engine; per-metric \
                       scoring was not available."
                .to_string(),
        }],
        improvement_situations: Vec::new(),
        suggested_disposition: "Review manually: degraded analysis".to_string(),
        conversion_readiness: if score >= 3.5 {
            ConversionReadiness::Medium
        } else {
            ConversionReadiness::Low
        },
        transcript: String::new(),
        transcript_accuracy: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: f64) -> DegradedSummary {
        DegradedSummary {
            summary: "Short productive call, pricing objection unresolved.".to_string(),
            strengths: vec!["Clear explanation of tiers".to_string()],
            areas_for_improvement: vec!["Address pricing earlier".to_string()],
            overall_score: score,
        }
    }

    #[test]
    fn test_degraded_report_carries_disclosure_and_single_metric() {
        let report = report_from_summary(summary(4.0));
        assert!(report.summary.starts_with(DEGRADED_SUMMARY_PREFIX));
        assert_eq!(report.metric_scores.len(), 1);
        assert_eq!(report.metric_scores[0].metric, DEGRADED_METRIC_LABEL);
        assert_eq!(report.call_categorisation, CallCategorisation::Good);
        assert_eq!(report.conversion_readiness, ConversionReadiness::Medium);
    }

    #[test]
    fn test_degraded_report_coarse_buckets() {
        assert_eq!(
            report_from_summary(summary(2.5)).call_categorisation,
            CallCategorisation::Average
        );
        assert_eq!(
            report_from_summary(summary(1.0)).call_categorisation,
            CallCategorisation::NeedsImprovement
        );
        // Out-of-range scores clamp before bucketing
        assert_eq!(
            report_from_summary(summary(11.0)).call_categorisation,
            CallCategorisation::Good
        );
    }

    #[test]
    fn test_empty_summary_is_fatal_for_the_tier() {
        let raw = r#"{"summary": "   ", "overallScore": 3.0}"#;
        let err = parse_summary(raw).unwrap_err();
        assert!(matches!(err, Error::Fallback(_)));
    }

    #[test]
    fn test_non_json_fallback_output_is_fatal() {
        let err = parse_summary("Sorry, I cannot rate this call.").unwrap_err();
        assert!(matches!(err, Error::Fallback(_)));
    }
}
