//! Ollama `/api/generate` client (non-streaming).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{LanguageModel, LlmError};
use crate::config::LlmConfig;

/// Longest slice of an error body kept in [`LlmError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        let endpoint = format!("{}/api/generate", config.host.trim_end_matches('/'));
        tracing::info!(endpoint = %endpoint, model = %config.model, "ollama client ready");

        Ok(Self {
            http,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Names of the models the server has pulled (`GET /api/tags`).
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = self.endpoint.replace("/api/generate", "/api/tags");
        let response = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let tags: TagsResponse =
            serde_json::from_slice(&bytes).map_err(|e| LlmError::Decode(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: max_output_tokens,
                temperature: self.temperature,
            },
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            max_output_tokens,
            "sending generate request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let parsed: GenerateResponse =
            serde_json::from_slice(&bytes).map_err(|e| LlmError::Decode(e.to_string()))?;

        let text = parsed.response.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        tracing::info!(model = %self.model, chars = text.len(), "generated completion");
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

impl OllamaClient {
    fn classify(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Transport(err)
        }
    }
}
