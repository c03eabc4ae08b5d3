//! Canned-response provider for tests and offline runs.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::provider::LlmProvider;
use crate::types::{CompletionRequest, CompletionResponse, LlmConfig, TokenUsage};

/// Returns canned responses in order, repeating the last one.
#[derive(Debug, Default)]
pub struct MockLlmProvider {
    responses: Vec<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmProvider {
    /// Creates a mock answering with `responses` in order.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock that always gives the same answer.
    pub fn with_response(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Number of completed calls.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let content = self
            .responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .ok_or_else(|| Error::llm("MockLlmProvider has no responses configured"))?;

        let input = request
            .wire_messages()
            .iter()
            .map(|m| m.content.split_whitespace().count() as u64)
            .sum();

        self.requests
            .lock()
            .map_err(|_| Error::llm("MockLlmProvider request log poisoned"))?
            .push(request);

        Ok(CompletionResponse {
            tokens_used: TokenUsage {
                input,
                output: content.split_whitespace().count() as u64,
            },
            content,
            model: "mock".to_string(),
        })
    }

    fn config(&self) -> LlmConfig {
        LlmConfig {
            model_provider: "mock".to_string(),
            model_name: "mock".to_string(),
            temperature: 0.0,
            api_key: None,
        }
    }
}
