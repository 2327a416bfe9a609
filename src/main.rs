use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use callgauge_analysis::CallAnalyzer;
use callgauge_core::{
    AnalysisOutcome, AnalysisReport, AnalysisRequest, CallCategorisation, EventSink, PipelineEvent,
    Product,
};
use callgauge_watsonx::{OracleTier, WatsonxClient};

#[derive(Parser)]
#[command(name = "callgauge")]
#[command(about = "AI call-quality analysis for telesales teams", long_about = None)]
struct Cli {
    /// Path to a transcript text file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Inline transcript text
    #[arg(short, long)]
    transcript: Option<String>,

    /// Product line discussed on the call (broadband, mobile, health, life, card)
    #[arg(short, long, default_value = "broadband")]
    product: String,

    /// Agent name shown in the report
    #[arg(short, long)]
    agent: Option<String>,

    /// Extra product context passed to the scoring prompt
    #[arg(long)]
    context: Option<String>,

    /// Print the raw JSON report instead of the console rendering
    #[arg(long)]
    json: bool,
}

/// Event sink that mirrors pipeline progress onto the console
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Validated { transcript_chars } => {
                println!("{} transcript accepted ({transcript_chars} chars)", "✅".green());
            }
            PipelineEvent::PrimaryAttempt { attempt, max_attempts } => {
                println!("{} scoring call (attempt {attempt}/{max_attempts})", "🔍".blue());
            }
            PipelineEvent::BackoffWait { delay } => {
                println!("{} engine busy, waiting {delay:?}", "⏳".yellow());
            }
            PipelineEvent::FallbackEngaged => {
                println!("{} primary engine unavailable, using backup", "⚠️ ".yellow());
            }
            PipelineEvent::Assembled { outcome } => {
                let label = match outcome {
                    AnalysisOutcome::Success => "analysis complete".green(),
                    AnalysisOutcome::Degraded => "degraded analysis complete".yellow(),
                    AnalysisOutcome::Failed => "analysis failed".red(),
                };
                println!("{} {label}", "📋".blue());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let transcript = match (&cli.file, &cli.transcript) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transcript file {}", path.display()))?,
        (None, Some(text)) => text.clone(),
        (None, None) => {
            return Err(anyhow!("provide a transcript with --file or --transcript"));
        }
    };

    let product = Product::from_str(&cli.product)
        .ok_or_else(|| anyhow!("unknown product '{}'", cli.product))?;

    let mut request = AnalysisRequest::new(product, transcript);
    request.agent_name = cli.agent.clone();
    request.product_context = cli.context.clone();

    // Two independently configured oracle tiers
    let mut deep = WatsonxClient::from_env(OracleTier::Deep)?;
    deep.connect().await?;
    let mut light = WatsonxClient::from_env(OracleTier::Light)?;
    light.connect().await?;

    let analyzer = CallAnalyzer::new(deep, light)
        .with_generation_configs(
            OracleTier::Deep.generation_config(),
            OracleTier::Light.generation_config(),
        )
        .with_event_sink(Arc::new(ConsoleSink));

    let report = analyzer.analyze(&request).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }

    Ok(())
}

fn categorisation_label(report: &AnalysisReport) -> ColoredString {
    match report.call_categorisation {
        CallCategorisation::Excellent => "Excellent".green().bold(),
        CallCategorisation::Good => "Good".green(),
        CallCategorisation::Average => "Average".yellow(),
        CallCategorisation::NeedsImprovement => "Needs Improvement".yellow(),
        CallCategorisation::Poor => "Poor".red(),
        CallCategorisation::Error => "Error".red().bold(),
    }
}

fn render_report(report: &AnalysisReport) {
    println!();
    println!(
        "{} {:.1}/5  ({})",
        "Overall:".bold(),
        report.overall_score,
        categorisation_label(report)
    );
    println!();
    println!("{}", report.summary);

    if !report.metric_scores.is_empty() {
        println!();
        println!("{}", "Metric scores".bold());
        for metric in &report.metric_scores {
            println!("  {:<28} {:.1}/5  {}", metric.metric, metric.score, metric.feedback.dimmed());
        }
    }

    if !report.strengths.is_empty() {
        println!();
        println!("{}", "Strengths".bold());
        for item in &report.strengths {
            println!("  {} {item}", "•".green());
        }
    }

    if !report.areas_for_improvement.is_empty() {
        println!();
        println!("{}", "Areas for improvement".bold());
        for item in &report.areas_for_improvement {
            println!("  {} {item}", "•".yellow());
        }
    }

    if !report.red_flags.is_empty() {
        println!();
        println!("{}", "Red flags".bold());
        for item in &report.red_flags {
            println!("  {} {item}", "•".red());
        }
    }

    if !report.improvement_situations.is_empty() {
        println!();
        println!("{}", "Coaching moments".bold());
        for situation in &report.improvement_situations {
            println!("  {} {}", "▸".blue(), situation.situation);
            println!("    used:      {}", situation.approach_used);
            println!("    suggested: {}", situation.suggested_approach);
            println!("    impact:    {}", situation.expected_impact.dimmed());
        }
    }

    println!();
    println!(
        "{} {}   {} {:?}",
        "Disposition:".bold(),
        report.suggested_disposition,
        "Conversion readiness:".bold(),
        report.conversion_readiness
    );
}
