//! Ollama chat client used for agent commentary.
//!
//! The council's numbers are computed deterministically; the LLM only
//! narrates them. Requests are single, non-streaming `/api/chat` calls
//! with bounded retries.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the LLM client.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
    /// Extra attempts after the first failure
    pub retries: usize,
    /// Delay before the first retry; doubles on each further retry
    pub retry_backoff_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: "llama3.2:latest".to_string(),
            temperature: 0.7,
            timeout_seconds: 300,
            retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl From<&crate::config::ModelConfig> for AgentConfig {
    fn from(config: &crate::config::ModelConfig) -> Self {
        Self {
            ollama_url: config.ollama_url.clone(),
            model_name: config.name.clone(),
            temperature: config.temperature,
            timeout_seconds: config.timeout_seconds,
            retries: config.retries,
            ..Default::default()
        }
    }
}

/// Message in the chat history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

/// Ollama model listing response.
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

/// Client for an Ollama server.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: AgentConfig,
    http_client: reqwest::Client,
}

impl LlmClient {
    /// Create a new client.
    pub fn new(config: AgentConfig) -> Result<Self> {
        info!(
            "Initializing LLM client with model {} at {}",
            config.model_name, config.ollama_url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Name of the model used for completions.
    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.ollama_url.trim_end_matches('/'), path)
    }

    /// Send a system + user prompt and return the assistant's reply.
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = OllamaChatRequest {
            model: self.config.model_name.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        let mut attempt = 0;
        loop {
            match self.send_chat(&request).await {
                Ok(content) => return Ok(content),
                Err(e) if attempt < self.config.retries => {
                    let delay = self.config.retry_backoff_ms.saturating_mul(1u64 << attempt.min(10));
                    warn!(
                        "LLM request failed (attempt {}/{}): {}. Retrying in {}ms",
                        attempt + 1,
                        self.config.retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_chat(&self, request: &OllamaChatRequest) -> Result<String> {
        let url = self.endpoint("/api/chat");
        debug!("Sending chat request to {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.describe_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Ollama API error {}: {}", status, body));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(chat_response.message.content)
    }

    /// List the models available on the server.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = self.endpoint("/api/tags");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.describe_error(e))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Ollama API error {}", response.status()));
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .context("Failed to parse Ollama model list")?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    fn describe_error(&self, e: reqwest::Error) -> anyhow::Error {
        if e.is_timeout() {
            anyhow::anyhow!("Request timed out after {}s", self.config.timeout_seconds)
        } else if e.is_connect() {
            anyhow::anyhow!(
                "Cannot connect to Ollama at {}. Is Ollama running?",
                self.config.ollama_url
            )
        } else {
            anyhow::anyhow!("Failed to send request: {}", e)
        }
    }
}
