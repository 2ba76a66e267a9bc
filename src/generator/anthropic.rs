//! Anthropic Messages API adapter

use super::{prompts, ComponentGenerator, GenerationRequest};
use crate::error::GenerationError;
use crate::models::{AiscriptConfig, Credentials};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicGenerator {
    endpoint: String,
    model: String,
    max_tokens: u32,
    credentials: Credentials,
    client: Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicGenerator {
    pub fn new(config: &AiscriptConfig, credentials: Credentials) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: format!("{}/v1/messages", config.api_base.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            credentials,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ComponentGenerator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let prompt = prompts::component_prompt(request);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        tracing::debug!(
            "Requesting {} ({}) from {}",
            request.component_name,
            request.dialect,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", self.credentials.api_key())
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_text(&text)
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}

/// Pull the source text out of a Messages API response body
fn extract_text(body: &str) -> Result<String, GenerationError> {
    let parsed: MessagesResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let text = parsed
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| GenerationError::Malformed("no text content block".to_string()))?;

    if text.trim().is_empty() {
        return Err(GenerationError::Empty);
    }

    Ok(text)
}
