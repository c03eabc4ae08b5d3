//! LLM providers for DeepBrain.
//!
//! - [`LlmProvider`]: the completion trait every backend implements
//! - [`AlbertProvider`]: client for the Albert chat-completions API
//! - [`RetryWrapper`]: exponential-backoff decorator
//! - [`MockLlmProvider`]: canned responses for tests
//! - [`transcript`]: `System:`/`Human:` transcript codec

pub mod albert;
pub mod error;
pub mod mock;
pub mod provider;
pub mod retry;
pub mod transcript;
pub mod types;

pub use albert::{AlbertConfig, AlbertProvider};
pub use error::{Error, Result};
pub use mock::MockLlmProvider;
pub use provider::LlmProvider;
pub use retry::RetryWrapper;
pub use types::{CompletionRequest, CompletionResponse, LlmConfig, Message, Role, TokenUsage};
