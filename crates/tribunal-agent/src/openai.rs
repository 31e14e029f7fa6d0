use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;
use tribunal_core::agent::{Generation, TextProvider};

use crate::{http, GenerationOptions};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI chat completions client.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    options: GenerationOptions,
}

impl OpenAiProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        options: GenerationOptions,
    ) -> Result<Self> {
        Ok(Self {
            client: http::client(options.timeout_secs)?,
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
            options,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        info!(model = %self.model, prompt_len = prompt.len(), "calling openai chat completions");
        let request = self.client.post(&url).bearer_auth(&self.api_key).json(&body);
        let parsed: ChatResponse = http::send_json(request, "openai", self.options.timeout_secs).await?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("openai returned no choices"))?;
        info!(model = %self.model, output_len = text.len(), "openai response received");
        Ok(Generation::text(text))
    }
}
