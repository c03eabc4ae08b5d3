//! Retry decorator for providers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};

use crate::error::{Error, Result};
use crate::provider::LlmProvider;
use crate::types::{CompletionRequest, CompletionResponse, LlmConfig};

/// Wraps a provider and retries transient failures with exponential backoff.
///
/// Only errors for which [`Error::is_retryable`] holds are retried.
pub struct RetryWrapper {
    inner: Arc<dyn LlmProvider>,
    max_retries: usize,
    min_delay: Duration,
    max_delay: Duration,
}

impl RetryWrapper {
    /// Wraps `inner` with three retries starting at 500 ms.
    pub fn new(inner: Arc<dyn LlmProvider>) -> Self {
        Self {
            inner,
            max_retries: 3,
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Sets the number of retries after the first attempt.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the first backoff delay.
    pub fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
    }
}

#[async_trait]
impl LlmProvider for RetryWrapper {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        (|| self.inner.complete(request.clone()))
            .retry(self.backoff())
            .when(Error::is_retryable)
            .notify(|err: &Error, delay: Duration| {
                tracing::warn!(
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "LLM call failed, retrying"
                );
            })
            .await
    }

    fn config(&self) -> LlmConfig {
        self.inner.config()
    }

    fn requires_api_key(&self) -> bool {
        self.inner.requires_api_key()
    }

    fn log_model_configs(&self) {
        self.inner.log_model_configs();
    }
}
