//! Council agents.
//!
//! The three pipeline stages (Risk Analyst, Recovery Architect, Strategy
//! Agent), the climate, economic and policy specialists, and the Ollama
//! client used for optional commentary.

pub mod climate;
pub mod council;
pub mod economic;
pub mod llm;
pub mod policy;
pub mod prompts;
pub mod recovery_architect;
pub mod risk_analyst;
pub mod strategy;

pub use council::AgentCouncil;
pub use llm::{AgentConfig, LlmClient};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
