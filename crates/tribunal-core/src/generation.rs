//! Ordered fallback over the configured generation tiers.
//!
//! local model → pretrained model → primary API → secondary API → nothing.
//! A tier that errors is logged and skipped; a tier that answers with an
//! empty thought counts as no answer. Callers fall back to their own
//! deterministic heuristics when this returns `None`.

use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    agent::{Capability, Generation, ModelBackend, ModelRequest, TextProvider},
    prompt,
    types::{CaseRecord, Role},
};

pub const PRIMARY_PROVIDER: &str = "gemini";
pub const SECONDARY_PROVIDERS: &[&str] = &["chatgpt", "OpenAI", "openai"];

/// Every generation source an agent may consult.
#[derive(Clone, Default)]
pub struct ProviderSet {
    pub local: Option<Arc<dyn ModelBackend>>,
    pub pretrained: Option<Arc<dyn ModelBackend>>,
    /// API clients keyed by alias ("gemini", "openai", ...).
    pub apis: HashMap<String, Arc<dyn TextProvider>>,
}

impl ProviderSet {
    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn with_api(mut self, alias: impl Into<String>, provider: Arc<dyn TextProvider>) -> Self {
        self.apis.insert(alias.into(), provider);
        self
    }

    pub fn with_local(mut self, backend: Arc<dyn ModelBackend>) -> Self {
        self.local = Some(backend);
        self
    }

    pub fn with_pretrained(mut self, backend: Arc<dyn ModelBackend>) -> Self {
        self.pretrained = Some(backend);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_none() && self.pretrained.is_none() && self.apis.is_empty()
    }

    fn primary(&self) -> Option<&Arc<dyn TextProvider>> {
        self.apis.get(PRIMARY_PROVIDER)
    }

    fn secondary(&self) -> Option<(&'static str, &Arc<dyn TextProvider>)> {
        SECONDARY_PROVIDERS
            .iter()
            .find_map(|alias| self.apis.get(*alias).map(|p| (*alias, p)))
    }
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut apis: Vec<&String> = self.apis.keys().collect();
        apis.sort();
        f.debug_struct("ProviderSet")
            .field("local", &self.local.as_ref().map(|b| b.name().to_string()))
            .field("pretrained", &self.pretrained.as_ref().map(|b| b.name().to_string()))
            .field("apis", &apis)
            .finish()
    }
}

/// Per-agent handle on the fallback chain.
#[derive(Clone)]
pub struct Generator {
    providers: ProviderSet,
    role: Role,
    agent: String,
}

impl Generator {
    pub fn new(providers: ProviderSet, role: Role, agent: impl Into<String>) -> Self {
        Self {
            providers,
            role,
            agent: agent.into(),
        }
    }

    pub async fn generate(
        &self,
        case: &CaseRecord,
        prompt: &str,
        capability: Capability,
    ) -> Option<Generation> {
        let method = capability.as_str();
        if self.providers.is_empty() {
            debug!(agent = %self.agent, method, "no generation tiers configured");
            return None;
        }

        let req = ModelRequest {
            role: self.role,
            agent: &self.agent,
            case,
            prompt,
        };

        for (tier, backend) in [
            ("local", self.providers.local.as_ref()),
            ("pretrained", self.providers.pretrained.as_ref()),
        ] {
            let Some(backend) = backend else { continue };
            info!(agent = %self.agent, method, tier, backend = backend.name(), "attempting model backend");
            let result = match capability {
                Capability::Argument => backend.generate_argument(&req).await,
                Capability::Judgment => backend.generate_judgment(&req).await,
                Capability::Verdict => backend.generate_verdict(&req).await,
            };
            match result {
                Ok(Some(g)) if !g.thought.trim().is_empty() => {
                    info!(agent = %self.agent, method, tier, "model backend succeeded");
                    return Some(g);
                },
                Ok(Some(_)) => warn!(agent = %self.agent, method, tier, "model backend returned empty output"),
                Ok(None) => debug!(agent = %self.agent, method, tier, "capability not offered"),
                Err(e) => warn!(agent = %self.agent, method, tier, "model backend failed: {e:#}"),
            }
        }

        if let Some(provider) = self.providers.primary() {
            info!(agent = %self.agent, method, provider = provider.name(), "attempting primary provider");
            // verdict prompts carry their own JSON contract and are decoded by the judge
            let structured = capability != Capability::Verdict;
            let request = if structured {
                prompt::enhanced_prompt(self.role, prompt)
            } else {
                prompt.to_string()
            };
            match provider.generate(&request).await {
                Ok(raw) => {
                    let g = if structured { decode_structured(raw) } else { raw };
                    if !g.thought.trim().is_empty() {
                        info!(agent = %self.agent, method, "primary provider succeeded");
                        return Some(g);
                    }
                    warn!(agent = %self.agent, method, "primary provider returned empty output");
                },
                Err(e) => warn!(agent = %self.agent, method, "primary provider failed: {e:#}"),
            }
        }

        if let Some((alias, provider)) = self.providers.secondary() {
            info!(agent = %self.agent, method, alias, "attempting secondary provider");
            match provider.generate(prompt).await {
                Ok(g) if !g.thought.trim().is_empty() => {
                    info!(agent = %self.agent, method, alias, "secondary provider succeeded");
                    return Some(g);
                },
                Ok(_) => warn!(agent = %self.agent, method, alias, "secondary provider returned empty output"),
                Err(e) => warn!(agent = %self.agent, method, alias, "secondary provider failed: {e:#}"),
            }
        }

        warn!(agent = %self.agent, method, "all generation tiers failed, using heuristics");
        None
    }
}

/// Strips a surrounding markdown code fence, if any.
pub(crate) fn strip_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub(crate) fn json_field(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Two-path decode of a primary-provider argument or judgment: a JSON object
/// in the thought text wins field by field, anything else is taken raw.
fn decode_structured(raw: Generation) -> Generation {
    let body = strip_fence(&raw.thought);
    if !body.starts_with('{') {
        return raw;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(v) if v.is_object() => Generation {
            thought: json_field(&v, "thought").unwrap_or(raw.thought),
            evidence: json_field(&v, "evidence").or(raw.evidence),
            section: json_field(&v, "section").or(raw.section),
        },
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_reply_is_unpacked() {
        let raw = Generation::text(
            r#"{"thought": "The gloves tie the accused to the poison.", "evidence": "gloves.pdf", "section": 302}"#,
        );
        let g = decode_structured(raw);
        assert_eq!(g.thought, "The gloves tie the accused to the poison.");
        assert_eq!(g.evidence.as_deref(), Some("gloves.pdf"));
        assert_eq!(g.section.as_deref(), Some("302"));
    }

    #[test]
    fn malformed_json_falls_back_to_raw() {
        let raw = Generation::text("{not json at all");
        let g = decode_structured(raw.clone());
        assert_eq!(g, raw);
    }

    #[test]
    fn fenced_json_is_accepted() {
        let raw = Generation::text("```json\n{\"thought\": \"fenced\"}\n```");
        assert_eq!(decode_structured(raw).thought, "fenced");
    }

    #[test]
    fn missing_fields_keep_raw_values() {
        let raw = Generation {
            thought: r#"{"evidence": "a.pdf"}"#.into(),
            evidence: None,
            section: Some("379".into()),
        };
        let g = decode_structured(raw);
        assert_eq!(g.thought, r#"{"evidence": "a.pdf"}"#);
        assert_eq!(g.evidence.as_deref(), Some("a.pdf"));
        assert_eq!(g.section.as_deref(), Some("379"));
    }
}
