//! Orchestrator surface: transcription collaborator and status notifications
//!
//! The orchestrator sequences transcribe → score → notify around the
//! analyzer. Transcription and status persistence are external
//! collaborators reached through traits; the analyzer itself never
//! notifies anyone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use callgauge_core::{AnalysisReport, AnalysisRequest, CallCategorisation, Oracle, Product, Result};

use crate::analyzer::{error_report, CallAnalyzer};

/// Speech-to-text collaborator
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Produce a transcript for a stored call recording
    async fn transcribe(&self, recording_ref: &str) -> Result<String>;
}

/// Processing phase reported to the status store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobPhase {
    Transcribing,
    Scoring,
    Complete,
    Failed,
}

/// One status notification, persisted outside this crate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub job_id: Uuid,
    pub phase: JobPhase,
    pub detail: String,
    pub at: DateTime<Utc>,
}

/// Status/activity store collaborator
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn notify(&self, update: StatusUpdate);
}

/// Where the call audio or text comes from
#[derive(Debug, Clone)]
pub enum CallSource {
    /// Recording reference to transcribe before scoring
    Recording(String),
    /// Caller-supplied transcript; transcription is skipped
    Transcript(String),
}

/// One call to process end to end
#[derive(Debug, Clone)]
pub struct CallJob {
    pub id: Uuid,
    pub product: Product,
    pub agent_name: Option<String>,
    pub product_context: Option<String>,
    pub source: CallSource,
}

impl CallJob {
    /// Create a job for a caller-supplied transcript
    pub fn from_transcript(product: Product, transcript: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            product,
            agent_name: None,
            product_context: None,
            source: CallSource::Transcript(transcript.into()),
        }
    }

    /// Create a job for a stored recording
    pub fn from_recording(product: Product, recording_ref: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            product,
            agent_name: None,
            product_context: None,
            source: CallSource::Recording(recording_ref.into()),
        }
    }
}

/// Sequences transcription, analysis, and status notification for one job
pub struct CallOrchestrator<T: Transcriber, P: Oracle, F: Oracle> {
    transcriber: T,
    analyzer: CallAnalyzer<P, F>,
    status: Arc<dyn StatusSink>,
}

impl<T: Transcriber, P: Oracle, F: Oracle> CallOrchestrator<T, P, F> {
    pub fn new(transcriber: T, analyzer: CallAnalyzer<P, F>, status: Arc<dyn StatusSink>) -> Self {
        Self {
            transcriber,
            analyzer,
            status,
        }
    }

    /// Process one job end to end.
    ///
    /// Always returns a report; degraded and failed analyses are encoded in
    /// the report itself, mirrored into a `Failed` status notification.
    pub async fn process(&self, job: &CallJob) -> AnalysisReport {
        let transcript = match &job.source {
            CallSource::Transcript(text) => text.clone(),
            CallSource::Recording(reference) => {
                self.notify(job.id, JobPhase::Transcribing, "Transcribing call recording")
                    .await;
                match self.transcriber.transcribe(reference).await {
                    Ok(text) => text,
                    Err(err) => {
                        self.notify(job.id, JobPhase::Failed, &format!("Transcription failed: {err}"))
                            .await;
                        let mut report = error_report(&err);
                        report.transcript_accuracy =
                            "Not measured: transcription unavailable".to_string();
                        return report;
                    }
                }
            }
        };

        self.notify(job.id, JobPhase::Scoring, "Scoring call transcript")
            .await;

        let mut request = AnalysisRequest::new(job.product, transcript);
        request.agent_name = job.agent_name.clone();
        request.product_context = job.product_context.clone();

        let report = self.analyzer.analyze(&request).await;

        match report.call_categorisation {
            CallCategorisation::Error => {
                self.notify(job.id, JobPhase::Failed, "Analysis completed with errors")
                    .await;
            }
            _ => {
                info!(job_id = %job.id, score = report.overall_score, "call analysis complete");
                self.notify(job.id, JobPhase::Complete, "Analysis complete").await;
            }
        }

        report
    }

    async fn notify(&self, job_id: Uuid, phase: JobPhase, detail: &str) {
        self.status
            .notify(StatusUpdate {
                job_id,
                phase,
                detail: detail.to_string(),
                at: Utc::now(),
            })
            .await;
    }
}
