//! Language-model collaborator.
//!
//! Provides the [`LanguageModel`] trait (single request/response completion)
//! and an Ollama implementation. The client is created via [`create_client`]
//! from configuration.

pub mod ollama;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// Errors from one completion request.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model returned an empty completion")]
    EmptyResponse,

    #[error("could not decode model response: {0}")]
    Decode(String),
}

/// Stateless text generation.
///
/// Calls are slow (seconds to minutes) and may fail; implementations must not
/// retry or substitute content on failure.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<String, LlmError>;

    /// Model identifier, for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Create a language-model client from config.
///
/// Currently only `"ollama"` is supported.
pub fn create_client(config: &crate::config::LlmConfig) -> Result<Arc<dyn LanguageModel>> {
    match config.provider.as_str() {
        "ollama" => {
            let client = ollama::OllamaClient::new(config)?;
            Ok(Arc::new(client))
        }
        other => anyhow::bail!("unknown llm provider: {other}. Supported: ollama"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    #[test]
    fn unknown_provider_is_rejected() {
        let config = LlmConfig {
            provider: "gpt-in-a-box".into(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("unknown llm provider"));
    }

    #[test]
    fn ollama_provider_builds() {
        let client = create_client(&LlmConfig::default()).unwrap();
        assert_eq!(client.name(), "llama3.1:8b");
    }
}
