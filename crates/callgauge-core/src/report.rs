//! Analysis request and report data model
//!
//! The report schema is an external JSON contract (camelCase field names).
//! Every field of [`AnalysisReport`] is always populated; callers branch on
//! [`CallCategorisation`] and the summary text to detect degraded or failed
//! analyses, never on missing fields.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Minimum transcript length (chars, after trimming) accepted for analysis
pub const MIN_TRANSCRIPT_CHARS: usize = 10;

/// Product lines handled by the telesales floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Product {
    Broadband,
    MobilePlan,
    HealthInsurance,
    LifeInsurance,
    CreditCard,
}

impl Product {
    /// Get the display name for this product
    pub fn display_name(&self) -> &'static str {
        match self {
            Product::Broadband => "Home Broadband",
            Product::MobilePlan => "Mobile Plan",
            Product::HealthInsurance => "Health Insurance",
            Product::LifeInsurance => "Life Insurance",
            Product::CreditCard => "Credit Card",
        }
    }

    /// Get all supported products
    pub fn all() -> Vec<Product> {
        vec![
            Product::Broadband,
            Product::MobilePlan,
            Product::HealthInsurance,
            Product::LifeInsurance,
            Product::CreditCard,
        ]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Product> {
        match s.to_lowercase().as_str() {
            "broadband" | "internet" => Some(Product::Broadband),
            "mobile-plan" | "mobile" | "sim" => Some(Product::MobilePlan),
            "health-insurance" | "health" => Some(Product::HealthInsurance),
            "life-insurance" | "life" => Some(Product::LifeInsurance),
            "credit-card" | "card" => Some(Product::CreditCard),
            _ => None,
        }
    }

    /// Product-specific guidance injected into scoring prompts
    pub fn prompt_context(&self) -> &'static str {
        match self {
            Product::Broadband => {
                "Home broadband sales calls should cover speed tiers, contract length, \
                 installation windows, and router options. Watch for unverified speed claims."
            }
            Product::MobilePlan => {
                "Mobile plan calls should cover data allowances, roaming, device bundling, \
                 and number porting. Watch for unclear out-of-bundle pricing."
            }
            Product::HealthInsurance => {
                "Health insurance calls must cover waiting periods, exclusions, and premium \
                 review terms. Regulated product: disclosure wording matters."
            }
            Product::LifeInsurance => {
                "Life insurance calls must cover sum assured, term length, beneficiary \
                 nomination, and medical underwriting. Regulated product: disclosure wording matters."
            }
            Product::CreditCard => {
                "Credit card calls must cover APR, annual fees, and minimum repayment terms. \
                 Regulated product: affordability language is mandatory."
            }
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One call-analysis invocation, immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    pub transcript_override: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_context: Option<String>,
}

impl AnalysisRequest {
    /// Create a request for a caller-supplied transcript
    pub fn new(product: Product, transcript: impl Into<String>) -> Self {
        Self {
            product,
            agent_name: None,
            transcript_override: transcript.into(),
            product_context: None,
        }
    }

    /// Set the agent name shown in the report
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self
    }

    /// Add extra product context for the scoring prompt
    pub fn with_product_context(mut self, context: impl Into<String>) -> Self {
        self.product_context = Some(context.into());
        self
    }

    /// Reject requests whose transcript is too short to score
    pub fn validate(&self) -> Result<()> {
        let chars = self.transcript_override.trim().chars().count();
        if chars < MIN_TRANSCRIPT_CHARS {
            return Err(Error::Validation(format!(
                "transcript must be at least {MIN_TRANSCRIPT_CHARS} characters after trimming, got {chars}"
            )));
        }
        Ok(())
    }
}

/// Quality bucket assigned to an analysed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallCategorisation {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
    Poor,
    /// Analysis itself failed; scores carry no signal
    Error,
}

impl CallCategorisation {
    /// Five-bucket threshold mapping used for full-fidelity reports
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            CallCategorisation::Excellent
        } else if score >= 3.5 {
            CallCategorisation::Good
        } else if score >= 2.5 {
            CallCategorisation::Average
        } else if score >= 1.5 {
            CallCategorisation::NeedsImprovement
        } else {
            CallCategorisation::Poor
        }
    }

    /// Coarse three-bucket mapping used for degraded summaries
    ///
    /// A summary-only pass never claims Excellent or Poor.
    pub fn from_score_coarse(score: f64) -> Self {
        if score >= 3.5 {
            CallCategorisation::Good
        } else if score >= 2.0 {
            CallCategorisation::Average
        } else {
            CallCategorisation::NeedsImprovement
        }
    }
}

/// How ready the prospect sounded to convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversionReadiness {
    #[default]
    Low,
    Medium,
    High,
}

/// Score and feedback for one scoring dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScore {
    pub metric: String,
    pub score: f64,
    pub feedback: String,
}

/// A call moment where a different approach would have landed better
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementSituation {
    pub situation: String,
    pub approach_used: String,
    pub suggested_approach: String,
    pub expected_impact: String,
}

/// Full call-quality report returned to callers
///
/// Array fields default to empty on deserialization so a sparse oracle
/// answer still decodes; the pipeline guarantees they are present (possibly
/// empty) on every report it returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub overall_score: f64,
    pub call_categorisation: CallCategorisation,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub metric_scores: Vec<MetricScore>,
    #[serde(default)]
    pub improvement_situations: Vec<ImprovementSituation>,
    #[serde(default)]
    pub suggested_disposition: String,
    #[serde(default)]
    pub conversion_readiness: ConversionReadiness,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub transcript_accuracy: String,
}

impl AnalysisReport {
    /// Clamp scores into range and realign the categorisation with the
    /// overall score.
    ///
    /// Applied to oracle-produced reports only; terminal error reports keep
    /// their `Error` categorisation.
    pub fn normalise(mut self) -> Self {
        self.overall_score = clamp_score(self.overall_score);
        self.call_categorisation = CallCategorisation::from_score(self.overall_score);
        for metric in &mut self.metric_scores {
            metric.score = clamp_score(metric.score);
        }
        if self.suggested_disposition.trim().is_empty() {
            self.suggested_disposition = "No disposition suggested".to_string();
        }
        self
    }
}

/// Reduced schema produced by the fallback oracle, never exposed to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegradedSummary {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    pub overall_score: f64,
}

/// Clamp a score into the valid [0, 5] range
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() { 0.0 } else { score.clamp(0.0, 5.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorisation_thresholds() {
        assert_eq!(CallCategorisation::from_score(5.0), CallCategorisation::Excellent);
        assert_eq!(CallCategorisation::from_score(4.5), CallCategorisation::Excellent);
        assert_eq!(CallCategorisation::from_score(4.49), CallCategorisation::Good);
        assert_eq!(CallCategorisation::from_score(3.5), CallCategorisation::Good);
        assert_eq!(CallCategorisation::from_score(3.0), CallCategorisation::Average);
        assert_eq!(CallCategorisation::from_score(2.5), CallCategorisation::Average);
        assert_eq!(CallCategorisation::from_score(2.0), CallCategorisation::NeedsImprovement);
        assert_eq!(CallCategorisation::from_score(1.5), CallCategorisation::NeedsImprovement);
        assert_eq!(CallCategorisation::from_score(1.0), CallCategorisation::Poor);
        assert_eq!(CallCategorisation::from_score(0.0), CallCategorisation::Poor);
    }

    #[test]
    fn test_coarse_categorisation_buckets() {
        assert_eq!(CallCategorisation::from_score_coarse(5.0), CallCategorisation::Good);
        assert_eq!(CallCategorisation::from_score_coarse(3.5), CallCategorisation::Good);
        assert_eq!(CallCategorisation::from_score_coarse(2.0), CallCategorisation::Average);
        assert_eq!(
            CallCategorisation::from_score_coarse(1.9),
            CallCategorisation::NeedsImprovement
        );
        assert_eq!(
            CallCategorisation::from_score_coarse(0.0),
            CallCategorisation::NeedsImprovement
        );
    }

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(7.2), 5.0);
        assert_eq!(clamp_score(-1.0), 0.0);
        assert_eq!(clamp_score(3.3), 3.3);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_validation_rejects_short_transcript() {
        let request = AnalysisRequest::new(Product::Broadband, "hello");
        assert!(matches!(request.validate(), Err(Error::Validation(_))));

        // Whitespace padding does not help
        let request = AnalysisRequest::new(Product::Broadband, "   hi    \n\n   ");
        assert!(matches!(request.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_validation_accepts_minimum_transcript() {
        let request = AnalysisRequest::new(Product::Broadband, "0123456789");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_product_from_str() {
        assert_eq!(Product::from_str("broadband"), Some(Product::Broadband));
        assert_eq!(Product::from_str("MOBILE"), Some(Product::MobilePlan));
        assert_eq!(Product::from_str("health-insurance"), Some(Product::HealthInsurance));
        assert_eq!(Product::from_str("life"), Some(Product::LifeInsurance));
        assert_eq!(Product::from_str("card"), Some(Product::CreditCard));
        assert_eq!(Product::from_str("timeshare"), None);
    }

    #[test]
    fn test_product_all_have_context() {
        for product in Product::all() {
            assert!(!product.prompt_context().is_empty());
            assert!(!product.display_name().is_empty());
        }
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = AnalysisReport {
            overall_score: 4.0,
            call_categorisation: CallCategorisation::Good,
            summary: "Solid discovery, weak close".to_string(),
            strengths: vec!["Rapport".to_string()],
            areas_for_improvement: vec!["Closing".to_string()],
            red_flags: Vec::new(),
            metric_scores: vec![MetricScore {
                metric: "Opening & Rapport".to_string(),
                score: 4.5,
                feedback: "Warm, personalised opening".to_string(),
            }],
            improvement_situations: Vec::new(),
            suggested_disposition: "Send follow-up quote".to_string(),
            conversion_readiness: ConversionReadiness::Medium,
            transcript: "Agent: Hello...".to_string(),
            transcript_accuracy: "Not measured".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("overallScore").is_some());
        assert!(json.get("callCategorisation").is_some());
        assert!(json.get("areasForImprovement").is_some());
        assert!(json.get("redFlags").is_some());
        assert!(json.get("metricScores").is_some());
        assert!(json.get("improvementSituations").is_some());
        assert!(json.get("suggestedDisposition").is_some());
        assert!(json.get("conversionReadiness").is_some());
        assert!(json.get("transcriptAccuracy").is_some());
        assert_eq!(json["callCategorisation"], "Good");
    }

    #[test]
    fn test_report_deserializes_sparse_oracle_output() {
        let raw = r#"{
            "overallScore": 6.1,
            "callCategorisation": "Average",
            "summary": "ok"
        }"#;
        let report: AnalysisReport = serde_json::from_str(raw).unwrap();
        let report = report.normalise();
        assert_eq!(report.overall_score, 5.0);
        assert_eq!(report.call_categorisation, CallCategorisation::Excellent);
        assert!(report.strengths.is_empty());
        assert!(report.metric_scores.is_empty());
        assert_eq!(report.conversion_readiness, ConversionReadiness::Low);
        assert_eq!(report.suggested_disposition, "No disposition suggested");
    }

    #[test]
    fn test_normalise_realigns_categorisation() {
        let raw = r#"{"overallScore": 1.2, "callCategorisation": "Excellent", "summary": "x"}"#;
        let report: AnalysisReport = serde_json::from_str(raw).unwrap();
        let report = report.normalise();
        assert_eq!(report.call_categorisation, CallCategorisation::Poor);
    }

    #[test]
    fn test_degraded_summary_deserializes_without_arrays() {
        let raw = r#"{"summary": "short call", "overallScore": 2.5}"#;
        let summary: DegradedSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.overall_score, 2.5);
        assert!(summary.strengths.is_empty());
        assert!(summary.areas_for_improvement.is_empty());
    }
}
