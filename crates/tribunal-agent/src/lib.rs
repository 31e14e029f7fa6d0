pub mod gemini;
mod http;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tribunal_core::{
    config::{AiProvider, Config},
    generation::ProviderSet,
};

pub use gemini::GeminiProvider;
pub use ollama::OllamaBackend;
pub use openai::OpenAiProvider;

/// Request knobs shared by the API adapters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl GenerationOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.ai_timeout_s,
        }
    }
}

/// Assemble the generation tiers for `forced` (or the configured preference).
///
/// - `rule_based`: no tiers; agents reason with heuristics only.
/// - `gemini`: Gemini as primary, OpenAI as secondary when its key is set.
/// - `openai`: OpenAI only.
/// - `local`: the Ollama model, plus `PRETRAINED_MODEL` on the same server.
///
/// A tier whose credentials are missing is skipped with a warning; an empty
/// result simply means rule-based reasoning.
pub fn build_providers(config: &Config, forced: Option<AiProvider>) -> Result<ProviderSet> {
    let preferred = forced.unwrap_or(config.ai_provider);
    let options = GenerationOptions::from_config(config);
    let mut set = ProviderSet::rule_based();

    match preferred {
        AiProvider::RuleBased => {},
        AiProvider::Gemini => {
            if config.gemini_api_key.is_empty() {
                warn!("GEMINI_API_KEY not set, skipping gemini");
            } else {
                let p = GeminiProvider::new(&config.gemini_api_key, &config.gemini_model, options)?;
                set = set.with_api("gemini", Arc::new(p));
            }
            if !config.openai_api_key.is_empty() {
                let p = OpenAiProvider::new(&config.openai_api_key, &config.openai_model, options)?;
                set = set.with_api("openai", Arc::new(p));
            }
        },
        AiProvider::OpenAi => {
            if config.openai_api_key.is_empty() {
                warn!("OPENAI_API_KEY not set, skipping openai");
            } else {
                let p = OpenAiProvider::new(&config.openai_api_key, &config.openai_model, options)?;
                set = set.with_api("openai", Arc::new(p));
            }
        },
        AiProvider::Local => {
            if config.ollama_url.is_empty() {
                warn!("OLLAMA_URL not set, skipping local model");
            } else {
                let local = OllamaBackend::new(&config.ollama_url, &config.local_model, options.timeout_secs)?;
                set = set.with_local(Arc::new(local));
                if !config.pretrained_model.is_empty() {
                    let pretrained =
                        OllamaBackend::new(&config.ollama_url, &config.pretrained_model, options.timeout_secs)?;
                    set = set.with_pretrained(Arc::new(pretrained));
                }
            }
        },
    }

    if set.is_empty() && preferred != AiProvider::RuleBased {
        warn!(provider = %preferred, "no usable provider, falling back to rule-based reasoning");
    }
    info!(provider = %preferred, tiers = ?set, "generation tiers ready");
    Ok(set)
}
