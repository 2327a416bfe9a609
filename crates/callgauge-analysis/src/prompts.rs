//! Prompt construction for the scoring oracles
//!
//! The pipeline only cares about the output schema and timing of these
//! prompts; the rubric wording lives here so both tiers stay in sync with
//! the report data model.

use callgauge_core::AnalysisRequest;

/// Dimensions scored by the full analysis
pub const SCORING_METRICS: [&str; 8] = [
    "Opening & Rapport",
    "Needs Discovery",
    "Product Knowledge",
    "Pitch Relevance",
    "Objection Handling",
    "Compliance & Disclosure",
    "Closing & Call To Action",
    "Call Control & Listening",
];

/// Build the full-schema scoring prompt for the primary tier
pub fn build_primary_prompt(request: &AnalysisRequest, transcript: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a telesales quality coach. Analyse the call transcript below and \
         return ONLY a JSON object, no prose, with exactly these fields:\n\
         overallScore (number 0-5), callCategorisation (one of Excellent, Good, Average, \
         NeedsImprovement, Poor), summary (string), strengths (array of strings), \
         areasForImprovement (array of strings), redFlags (array of strings), \
         metricScores (array of {metric, score 0-5, feedback}), \
         improvementSituations (array of {situation, approachUsed, suggestedApproach, \
         expectedImpact}), suggestedDisposition (string), \
         conversionReadiness (Low, Medium or High).\n\n",
    );

    prompt.push_str("Score each of these metrics:\n");
    for metric in SCORING_METRICS {
        prompt.push_str("- ");
        prompt.push_str(metric);
        prompt.push('\n');
    }

    prompt.push_str("\nProduct: ");
    prompt.push_str(request.product.display_name());
    prompt.push('\n');
    prompt.push_str(request.product.prompt_context());
    prompt.push('\n');

    if let Some(ref context) = request.product_context {
        prompt.push_str("\nAdditional product context:\n");
        prompt.push_str(context);
        prompt.push('\n');
    }

    if let Some(ref agent) = request.agent_name {
        prompt.push_str("\nAgent on the call: ");
        prompt.push_str(agent);
        prompt.push('\n');
    }

    prompt.push_str("\nTranscript:\n");
    prompt.push_str(transcript);
    prompt.push_str("\n\nJSON:");

    prompt
}

/// Build the reduced summary prompt for the fallback tier
pub fn build_fallback_prompt(request: &AnalysisRequest, transcript: &str) -> String {
    format!(
        "You are a telesales quality coach. Briefly assess the call transcript below. \
         Return ONLY a JSON object with exactly these fields: summary (string, 2-3 \
         sentences), strengths (array of strings), areasForImprovement (array of \
         strings), overallScore (number 0-5).\n\n\
         Product: {}\n\n\
         Transcript:\n{}\n\nJSON:",
        request.product.display_name(),
        transcript
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use callgauge_core::Product;

    #[test]
    fn test_primary_prompt_covers_schema_and_metrics() {
        let request = AnalysisRequest::new(Product::HealthInsurance, "Agent: Hello ...")
            .with_agent_name("Dana")
            .with_product_context("Campaign: winter renewal push");
        let prompt = build_primary_prompt(&request, "Agent: Hello ...");

        assert!(prompt.contains("overallScore"));
        assert!(prompt.contains("conversionReadiness"));
        assert!(prompt.contains("Health Insurance"));
        assert!(prompt.contains("Dana"));
        assert!(prompt.contains("winter renewal push"));
        for metric in SCORING_METRICS {
            assert!(prompt.contains(metric), "missing metric: {metric}");
        }
    }

    #[test]
    fn test_fallback_prompt_uses_reduced_schema() {
        let request = AnalysisRequest::new(Product::Broadband, "Agent: Hello ...");
        let prompt = build_fallback_prompt(&request, "Agent: Hello ...");

        assert!(prompt.contains("summary"));
        assert!(prompt.contains("overallScore"));
        assert!(!prompt.contains("metricScores"));
        assert!(!prompt.contains("improvementSituations"));
    }
}
