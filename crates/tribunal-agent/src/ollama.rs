use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;
use tribunal_core::{
    agent::{Capability, Generation, ModelBackend, ModelRequest},
    Role,
};

use crate::http;

/// Calls a locally-hosted Ollama model via its native chat API.
///
/// Serves both the local and the pretrained tier; the two differ only in the
/// model they name. Case material never leaves the machine.
pub struct OllamaBackend {
    client: reqwest::Client,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::client(timeout_secs)?,
            base_url: base_url.into(),
            model: model.into(),
            timeout_secs,
        })
    }

    async fn chat(&self, req: &ModelRequest<'_>, capability: Capability) -> Result<Option<Generation>> {
        let request_body = OllamaChatRequest {
            model: &self.model,
            messages: vec![
                OllamaMessage {
                    role: "system",
                    content: system_prompt(req, capability),
                },
                OllamaMessage {
                    role: "user",
                    content: req.prompt.to_string(),
                },
            ],
            stream: false,
        };

        info!(
            agent = %req.agent,
            method = capability.as_str(),
            model = %self.model,
            base_url = %self.base_url,
            "calling ollama chat API"
        );

        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let request = self.client.post(&url).json(&request_body);
        let parsed: OllamaChatResponse = http::send_json(request, "ollama", self.timeout_secs).await?;

        let output = parsed.message.content.trim().to_string();
        info!(agent = %req.agent, output_len = output.len(), "ollama response received");
        Ok(Some(Generation::text(output)))
    }
}

fn system_prompt(req: &ModelRequest<'_>, capability: Capability) -> String {
    let duty = match (capability, req.role) {
        (Capability::Verdict, _) => {
            "Render the final verdict. Reply with a JSON object holding verdict, reasoning, sentence and sections."
        },
        (_, Role::Judge) => "Weigh both sides impartially and comment on the evidence and the law.",
        (_, Role::Prosecutor) => "Argue that the evidence proves the charge beyond reasonable doubt.",
        (_, Role::Defense) => "Protect the accused by exposing doubt, gaps and procedural defects.",
    };
    format!(
        "You are {}, the {} in an Indian criminal trial of {}. {} Cite IPC sections and exhibits by name.",
        req.agent,
        req.role.title(),
        req.case.title,
        duty
    )
}

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

#[async_trait]
impl ModelBackend for OllamaBackend {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_argument(&self, req: &ModelRequest<'_>) -> Result<Option<Generation>> {
        self.chat(req, Capability::Argument).await
    }

    async fn generate_judgment(&self, req: &ModelRequest<'_>) -> Result<Option<Generation>> {
        self.chat(req, Capability::Judgment).await
    }

    async fn generate_verdict(&self, req: &ModelRequest<'_>) -> Result<Option<Generation>> {
        self.chat(req, Capability::Verdict).await
    }
}
