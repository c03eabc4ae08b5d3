//! Conversational search for DeepBrain.
//!
//! [`SearchAssistant`] answers questions about French public data by
//! retrieving documents through a [`deepbrain_fts::SearchBackend`] and asking
//! a [`deepbrain_llm::LlmProvider`] to answer from the excerpts, citing them.
//!
//! ```rust,ignore
//! use deepbrain_chat::{ChatConfig, Conversation, SearchAssistant};
//!
//! let assistant = SearchAssistant::new(llm, search, ChatConfig::default());
//! let mut conversation = Conversation::new();
//! let answer = assistant
//!     .ask(&mut conversation, "Ma commune est-elle exposée aux inondations ?")
//!     .await?;
//! for citation in &answer.citations {
//!     println!("{} - {}", citation.title, citation.link);
//! }
//! ```

pub mod assistant;
pub mod conversation;
pub mod error;
pub mod prompt;

pub use assistant::{AssistantAnswer, ChatConfig, SearchAssistant};
pub use conversation::{Citation, Conversation, ConversationId, Turn};
pub use error::{Error, Result};
