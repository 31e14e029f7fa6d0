use std::{collections::HashMap, fmt};

use anyhow::Result;

use crate::{error::CourtError, trial::TrialSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    OpenAi,
    Local,
    RuleBased,
}

impl AiProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Local => "local",
            Self::RuleBased => "rule_based",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "openai" | "chatgpt" => Some(Self::OpenAi),
            "local" | "ollama" => Some(Self::Local),
            "rule_based" | "rule-based" | "none" => Some(Self::RuleBased),
            _ => None,
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration, read from the process environment with a
/// `.env` file in the working directory as fallback.
#[derive(Debug, Clone)]
pub struct Config {
    // Simulation
    /// Round number from which the judge may close the arguments early.
    pub min_rounds: u32,
    pub early_verdict: bool,
    pub evidence_analysis: bool,

    // AI
    pub ai_provider: AiProvider,
    pub gemini_model: String,
    pub openai_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub ai_timeout_s: u64,
    pub gemini_api_key: String,
    pub openai_api_key: String,
    /// Empty disables the local model tier.
    pub ollama_url: String,
    pub local_model: String,
    /// Empty disables the pretrained model tier.
    pub pretrained_model: String,

    // Output
    pub show_thinking: bool,
    pub show_evidence: bool,
    pub colored_output: bool,
    pub save_reports: bool,
    pub report_dir: String,
    /// Optional JSON case database merged over the built-in cases.
    pub cases_file: String,
}

fn parse_dotenv() -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return map;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let v = v.trim().trim_matches('"');
            map.insert(k.trim().to_string(), v.to_string());
        }
    }
    map
}

fn get(key: &str, vars: &HashMap<String, String>) -> Option<String> {
    vars.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn get_str(key: &str, vars: &HashMap<String, String>, default: &str) -> String {
    get(key, vars).unwrap_or_else(|| default.to_string())
}

fn get_bool(key: &str, vars: &HashMap<String, String>, default: bool) -> bool {
    match get(key, vars).map(|v| v.to_lowercase()).as_deref() {
        Some("true") | Some("1") | Some("yes") => true,
        Some("false") | Some("0") | Some("no") => false,
        Some(_) => default,
        None => default,
    }
}

fn get_u32(key: &str, vars: &HashMap<String, String>, default: u32) -> u32 {
    get(key, vars).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn get_u64(key: &str, vars: &HashMap<String, String>, default: u64) -> u64 {
    get(key, vars).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn get_f64(key: &str, vars: &HashMap<String, String>, default: f64) -> f64 {
    get(key, vars).and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    /// Environment variables take precedence over `.env` entries.
    pub fn from_env() -> Result<Self> {
        let mut vars = parse_dotenv();
        vars.extend(std::env::vars());
        Ok(Self::from_vars(&vars)?)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, CourtError> {
        let provider = get_str("AI_PROVIDER", vars, "gemini");
        let ai_provider = AiProvider::parse(&provider)
            .ok_or_else(|| CourtError::Config(format!("unknown AI_PROVIDER: {provider}")))?;

        Ok(Self {
            min_rounds: get_u32("SIM_MIN_ROUNDS", vars, 6),
            early_verdict: get_bool("SIM_EARLY_VERDICT", vars, true),
            evidence_analysis: get_bool("SIM_EVIDENCE_ANALYSIS", vars, true),

            ai_provider,
            gemini_model: get_str("GEMINI_MODEL", vars, "gemini-pro"),
            openai_model: get_str("OPENAI_MODEL", vars, "gpt-3.5-turbo"),
            max_tokens: get_u32("AI_MAX_TOKENS", vars, 1000),
            temperature: get_f64("AI_TEMPERATURE", vars, 0.7),
            ai_timeout_s: get_u64("AI_TIMEOUT", vars, 60),
            gemini_api_key: get_str("GEMINI_API_KEY", vars, ""),
            openai_api_key: get_str("OPENAI_API_KEY", vars, ""),
            ollama_url: get_str("OLLAMA_URL", vars, ""),
            local_model: get_str("LOCAL_MODEL", vars, "llama3"),
            pretrained_model: get_str("PRETRAINED_MODEL", vars, ""),

            show_thinking: get_bool("SHOW_THINKING", vars, true),
            show_evidence: get_bool("SHOW_EVIDENCE", vars, true),
            colored_output: get_bool("COLORED_OUTPUT", vars, true),
            save_reports: get_bool("SAVE_REPORTS", vars, true),
            report_dir: get_str("REPORT_DIR", vars, "reports"),
            cases_file: get_str("CASES_FILE", vars, ""),
        })
    }

    /// Providers that could actually be used with the current credentials.
    pub fn available_providers(&self) -> Vec<AiProvider> {
        let mut out = Vec::new();
        if !self.gemini_api_key.is_empty() {
            out.push(AiProvider::Gemini);
        }
        if !self.openai_api_key.is_empty() {
            out.push(AiProvider::OpenAi);
        }
        if !self.ollama_url.is_empty() {
            out.push(AiProvider::Local);
        }
        out.push(AiProvider::RuleBased);
        out
    }

    /// Human-readable problems; empty when the configuration is usable as is.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.min_rounds < 1 {
            issues.push("SIM_MIN_ROUNDS must be at least 1".to_string());
        }
        if self.max_tokens < 100 {
            issues.push("AI_MAX_TOKENS must be at least 100".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push("AI_TEMPERATURE must be between 0.0 and 2.0".to_string());
        }
        if !self.available_providers().contains(&self.ai_provider) {
            issues.push(format!(
                "preferred provider {} is not available (missing credentials)",
                self.ai_provider
            ));
        }
        issues
    }

    pub fn trial_settings(&self) -> TrialSettings {
        TrialSettings {
            early_verdict: self.early_verdict,
            early_verdict_floor: self.min_rounds,
            evidence_analysis: self.evidence_analysis,
        }
    }
}
