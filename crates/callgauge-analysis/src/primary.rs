//! Primary analysis tier: bounded retry against the deep oracle

use tokio::time::sleep;
use tracing::{debug, warn};

use callgauge_core::{
    classify, AnalysisReport, Error, ErrorClass, EventSink, GenerationConfig, Oracle,
    PipelineEvent, Result, RetryConfig,
};

use crate::parse::extract_json_object;

/// How the primary tier finished
pub(crate) enum PrimaryOutcome {
    /// Full-fidelity report, transcript fields not yet attached
    Report(AnalysisReport),
    /// Rate limited through the final attempt; the fallback tier takes over
    Exhausted,
}

/// Run the bounded retry loop against the deep oracle.
///
/// Only capacity exhaustion is retried; a failure classified `Other` at any
/// attempt propagates immediately with no further attempts and no fallback.
pub(crate) async fn run_primary<O: Oracle>(
    oracle: &O,
    prompt: &str,
    generation: &GenerationConfig,
    retry: &RetryConfig,
    sink: &dyn EventSink,
) -> Result<PrimaryOutcome> {
    for attempt in 1..=retry.max_attempts {
        sink.emit(&PipelineEvent::PrimaryAttempt {
            attempt,
            max_attempts: retry.max_attempts,
        });

        match oracle.generate(prompt, generation).await {
            Ok(result) => {
                debug!(attempt, model = %result.model_id, "primary analysis succeeded");
                return Ok(PrimaryOutcome::Report(parse_report(&result.text)?));
            }
            Err(err) => match classify(&err) {
                ErrorClass::Other => return Err(err),
                ErrorClass::RateLimited if attempt < retry.max_attempts => {
                    let delay = retry.delay_for_attempt(attempt);
                    debug!(attempt, ?delay, "primary oracle rate limited, backing off");
                    sink.emit(&PipelineEvent::BackoffWait { delay });
                    sleep(delay).await;
                }
                ErrorClass::RateLimited => {
                    warn!(
                        attempts = retry.max_attempts,
                        "primary oracle capacity exhausted, degrading"
                    );
                    return Ok(PrimaryOutcome::Exhausted);
                }
            },
        }
    }

    // max_attempts of zero means the tier was configured out entirely
    Ok(PrimaryOutcome::Exhausted)
}

/// Decode the deep oracle's answer into a normalised report.
///
/// Malformed output is an `Other`-class failure and escalates without retry.
fn parse_report(text: &str) -> Result<AnalysisReport> {
    let raw = extract_json_object(text)?;
    let report: AnalysisReport = serde_json::from_str(raw)
        .map_err(|e| Error::Serialization(format!("oracle output did not match schema: {e}")))?;
    Ok(report.normalise())
}

#[cfg(test)]
mod tests {
    use super::*;
    use callgauge_core::CallCategorisation;

    #[test]
    fn test_parse_report_normalises_scores() {
        let raw = r#"```json
        {"overallScore": 9.9, "callCategorisation": "Poor", "summary": "great call",
         "metricScores": [{"metric": "Opening & Rapport", "score": -2, "feedback": "x"}]}
        ```"#;
        let report = parse_report(raw).unwrap();
        assert_eq!(report.overall_score, 5.0);
        assert_eq!(report.call_categorisation, CallCategorisation::Excellent);
        assert_eq!(report.metric_scores[0].score, 0.0);
    }

    #[test]
    fn test_parse_report_rejects_prose() {
        let err = parse_report("The call went well overall.").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_parse_report_rejects_wrong_shape() {
        let err = parse_report(r#"{"score": "four"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
