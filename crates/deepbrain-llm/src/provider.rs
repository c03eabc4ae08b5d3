//! The provider trait implemented by every LLM backend.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::types::{CompletionRequest, CompletionResponse, LlmConfig};

/// A chat-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Runs a completion and waits for the whole answer.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Streams the answer.
    ///
    /// The default implementation yields the whole completion as a single
    /// chunk, for backends without server-side streaming.
    fn stream(&self, request: CompletionRequest) -> BoxStream<'_, Result<String>> {
        futures::stream::once(async move { self.complete(request).await.map(|r| r.content) })
            .boxed()
    }

    /// Current provider settings.
    fn config(&self) -> LlmConfig;

    /// Whether calls need an API key.
    fn requires_api_key(&self) -> bool {
        false
    }

    /// Log the provider settings at debug level.
    fn log_model_configs(&self) {
        let config = self.config();
        tracing::debug!(
            provider = %config.model_provider,
            model = %config.model_name,
            temperature = config.temperature,
            "LLM configuration"
        );
    }
}
