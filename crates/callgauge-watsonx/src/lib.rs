//! watsonx.ai integration for CallGauge
//!
//! Two independently configured oracle tiers share one client type: a deep
//! tier for full scoring and a light tier the pipeline degrades to when the
//! deep tier is out of capacity.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::{OracleTier, WatsonxClient};
pub use config::WatsonxConfig;

// Re-export core types
pub use callgauge_core::{Error, Oracle, Result};
