//! Client for the Albert chat-completions API.
//!
//! Albert is the French public-sector LLM service. It exposes an
//! OpenAI-compatible `/v1/chat/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::provider::LlmProvider;
use crate::transcript::render_transcript;
use crate::types::{CompletionRequest, CompletionResponse, LlmConfig, Message, TokenUsage};

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://albert.api.etalab.gouv.fr";

/// Path appended to the endpoint.
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Output token limit used when none is configured.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Settings for [`AlbertProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbertConfig {
    /// API base URL; [`DEFAULT_ENDPOINT`] when absent or empty.
    pub endpoint: Option<String>,
    /// Bearer token.
    pub api_key: Option<String>,
    /// Organisation publishing the model (`AgentPublic`).
    pub model_provider: String,
    /// Model name; a `provider/name` value keeps only `name`.
    pub model_name: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Output token limit.
    pub max_output_tokens: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Provider tag reported to callers.
    pub custom_llm_provider: String,
}

impl Default for AlbertConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model_provider: "AgentPublic".to_string(),
            model_name: "llama3-instruct-8b".to_string(),
            temperature: 0.0,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: 60,
            custom_llm_provider: "albert".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: String,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    top_p: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

/// [`LlmProvider`] backed by the Albert API.
#[derive(Debug, Clone)]
pub struct AlbertProvider {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model_provider: String,
    model_name: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout_secs: u64,
    custom_llm_provider: String,
}

impl AlbertProvider {
    /// Creates a provider from its settings.
    pub fn new(config: AlbertConfig) -> Result<Self> {
        let endpoint = match config.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => endpoint.to_string(),
            _ => {
                tracing::info!(endpoint = DEFAULT_ENDPOINT, "Setting default endpoint");
                DEFAULT_ENDPOINT.to_string()
            }
        };
        let url = format!("{}{CHAT_COMPLETIONS_PATH}", endpoint.trim_end_matches('/'));

        let model_name = match config.model_name.split('/').nth(1) {
            Some(name) => name.to_string(),
            None => config.model_name.clone(),
        };
        if model_name.trim().is_empty() {
            return Err(Error::config("Albert model name must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            api_key: config.api_key.filter(|key| !key.is_empty()),
            model_provider: config.model_provider,
            model_name,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout_secs: config.timeout_secs,
            custom_llm_provider: config.custom_llm_provider,
        })
    }

    /// Full chat-completions URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Value of the `model` field sent to the API.
    pub fn model_id(&self) -> String {
        format!("{}/{}", self.model_provider, self.model_name)
    }

    /// Provider tag reported to callers.
    pub fn custom_llm_provider(&self) -> &str {
        &self.custom_llm_provider
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                endpoint: self.url.clone(),
                seconds: self.timeout_secs,
            }
        } else {
            Error::Http(err)
        }
    }
}

#[async_trait]
impl LlmProvider for AlbertProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let messages = request.wire_messages();
        if messages.is_empty() {
            return Err(Error::validation_field("messages", "must not be empty"));
        }

        let body = ChatRequest {
            model: self.model_id(),
            messages: &messages,
            temperature: request.temperature.unwrap_or(self.temperature),
            max_tokens: request.max_tokens.unwrap_or(self.max_output_tokens),
            top_p: 1,
            stream: false,
        };

        let mut builder = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();

        tracing::info!(transcript = %render_transcript(&messages), "Albert message");
        tracing::info!(request = %serde_json::to_string(&body)?, "Albert request data");
        tracing::info!(status = status.as_u16(), "Albert response status");

        if !status.is_success() {
            return Err(status_error(status.as_u16(), response.text().await));
        }

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        let parsed: ChatResponse = serde_json::from_str(&text)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::llm("Albert response contained no choices"))?
            .message
            .and_then(|m| m.content)
            .unwrap_or_default();

        let tokens_used = parsed
            .usage
            .map(|u| TokenUsage {
                input: u.prompt_tokens,
                output: u.completion_tokens,
            })
            .unwrap_or_default();

        tracing::debug!(tokens = tokens_used.total(), "Albert completion received");

        Ok(CompletionResponse {
            content,
            tokens_used,
            model: parsed.model.unwrap_or_else(|| self.model_id()),
        })
    }

    fn config(&self) -> LlmConfig {
        LlmConfig {
            model_provider: self.model_provider.clone(),
            model_name: self.model_name.clone(),
            temperature: self.temperature,
            api_key: self.api_key.clone(),
        }
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    fn log_model_configs(&self) {
        tracing::debug!(url = %self.url, "Albert LLM at");
    }
}

/// Error for a non-2xx reply. An unreadable body is logged and left empty.
fn status_error(status: u16, body: reqwest::Result<String>) -> Error {
    let body = body.unwrap_or_else(|e| {
        tracing::debug!(status, error = %e, "Could not read Albert error body");
        String::new()
    });
    Error::Status { status, body }
}
