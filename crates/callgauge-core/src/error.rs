//! Error taxonomy and retry classification
//!
//! Failures are typed at the adapter boundary so the analysis tiers never
//! inspect error text. [`classify`] is the single decision point for whether
//! a failed oracle call is worth retrying.

use thiserror::Error;

/// Result alias used across the CallGauge crates
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the call-analysis pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Request rejected before any oracle call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Oracle signalled capacity or quota exhaustion
    #[error("Oracle capacity exhausted: {0}")]
    RateLimited(String),

    /// Oracle call exceeded its time budget
    #[error("Oracle request timed out: {0}")]
    Timeout(String),

    /// Oracle failed for a non-capacity reason (bad request, malformed output)
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Transport-level failure reaching the oracle endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials rejected by the oracle endpoint
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Oracle output could not be decoded into the expected schema
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing or inconsistent client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The degraded fallback tier produced no usable result
    #[error("Fallback analysis failed: {0}")]
    Fallback(String),
}

/// Retry classification for a failed oracle call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient capacity exhaustion; waiting or degrading may help
    RateLimited,
    /// Everything else; retrying will not fix it
    Other,
}

/// Classify a failure for the retry loop.
///
/// This is the only thing that decides whether retry or fallback is
/// attempted. Timeouts count as capacity exhaustion: a saturated endpoint
/// and a slow endpoint are handled the same way.
pub fn classify(error: &Error) -> ErrorClass {
    match error {
        Error::RateLimited(_) | Error::Timeout(_) => ErrorClass::RateLimited,
        _ => ErrorClass::Other,
    }
}

/// Capacity-exhaustion markers recognised in provider error bodies.
///
/// Adapters use this once, when mapping a raw provider failure into
/// [`Error::RateLimited`]; nothing downstream looks at error text again.
const RATE_LIMIT_MARKERS: [&str; 5] = [
    "429",
    "rate limit",
    "too many requests",
    "quota",
    "capacity",
];

/// Whether a raw provider error body signals capacity exhaustion
pub fn is_rate_limit_signal(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RATE_LIMIT_MARKERS.iter().any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_classifies_as_retryable() {
        let err = Error::RateLimited("429 quota exceeded".to_string());
        assert_eq!(classify(&err), ErrorClass::RateLimited);
    }

    #[test]
    fn test_timeout_classifies_as_retryable() {
        let err = Error::Timeout("request timed out after 60s".to_string());
        assert_eq!(classify(&err), ErrorClass::RateLimited);
    }

    #[test]
    fn test_non_capacity_failures_classify_as_other() {
        let errors = vec![
            Error::Validation("transcript too short".to_string()),
            Error::Oracle("schema violation".to_string()),
            Error::Network("connection refused".to_string()),
            Error::Authentication("invalid api key".to_string()),
            Error::Serialization("unexpected token".to_string()),
            Error::Configuration("missing project id".to_string()),
            Error::Fallback("empty summary".to_string()),
        ];
        for err in errors {
            assert_eq!(classify(&err), ErrorClass::Other, "misclassified: {err}");
        }
    }

    #[test]
    fn test_rate_limit_signal_markers() {
        assert!(is_rate_limit_signal("HTTP 429 Too Many Requests"));
        assert!(is_rate_limit_signal("Quota exceeded for this plan"));
        assert!(is_rate_limit_signal("model capacity reached, retry later"));
        assert!(!is_rate_limit_signal("invalid model id"));
        assert!(!is_rate_limit_signal("unauthorized"));
    }
}
