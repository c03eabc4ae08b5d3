//! Retrieval-augmented question answering.
//!
//! Each question is answered in three steps: retrieve matching documents,
//! build a prompt holding the recent turns and numbered excerpts, then ask
//! the language model.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use deepbrain_fts::{SearchBackend, SearchParams};
use deepbrain_llm::{CompletionRequest, LlmProvider};

use crate::conversation::{Citation, Conversation, ConversationId, Turn};
use crate::error::{Error, Result};
use crate::prompt::{Context, DEFAULT_SYSTEM_PROMPT, history_messages, question_message};

/// Assistant settings, under `[chat]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Search results given to the model
    pub context_documents: usize,
    /// Character budget for the excerpts
    pub max_context_chars: usize,
    /// Previous turns replayed to the model
    pub history_turns: usize,
    /// Instructions for the model
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_documents: 4,
            max_context_chars: 6000,
            history_turns: 3,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// An answer and the documents behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantAnswer {
    /// Conversation the answer belongs to
    pub conversation_id: ConversationId,
    /// Model output
    pub answer: String,
    /// Documents given as context, without duplicates
    pub citations: Vec<Citation>,
    /// Whether retrieval returned anything
    pub grounded: bool,
}

/// Answers questions from search results.
#[derive(Clone)]
pub struct SearchAssistant {
    llm: Arc<dyn LlmProvider>,
    search: Arc<dyn SearchBackend>,
    config: ChatConfig,
}

impl SearchAssistant {
    /// Creates an assistant.
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        search: Arc<dyn SearchBackend>,
        config: ChatConfig,
    ) -> Self {
        Self {
            llm,
            search,
            config,
        }
    }

    /// Assistant settings.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Answers `question` within `conversation` and records the turn.
    ///
    /// Nothing is recorded when retrieval or the model fails.
    pub async fn ask(
        &self,
        conversation: &mut Conversation,
        question: &str,
    ) -> Result<AssistantAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::validation("Question must not be empty"));
        }

        let conversation_id = conversation.id();
        tracing::info!(
            conversation_id = %conversation_id,
            turn = conversation.len() + 1,
            "Answering question"
        );

        let context = self.retrieve(question).await?;
        let grounded = !context.citations.is_empty();

        let mut messages = history_messages(conversation.recent(self.config.history_turns));
        messages.push(question_message(&context, question));
        let request =
            CompletionRequest::new(messages).with_system_prompt(self.config.system_prompt.clone());

        let response = self.llm.complete(request).await?;
        tracing::info!(
            conversation_id = %conversation_id,
            tokens = response.tokens_used.total(),
            citations = context.citations.len(),
            grounded,
            "Answer generated"
        );

        conversation.push(Turn {
            question: question.to_string(),
            answer: response.content.clone(),
            citations: context.citations.clone(),
            asked_at: Utc::now(),
        });

        Ok(AssistantAnswer {
            conversation_id,
            answer: response.content,
            citations: context.citations,
            grounded,
        })
    }

    async fn retrieve(&self, question: &str) -> Result<Context> {
        if self.config.context_documents == 0 {
            return Ok(Context::default());
        }

        let results = self
            .search
            .search(SearchParams {
                query: question.to_string(),
                limit: Some(self.config.context_documents),
                ..Default::default()
            })
            .await?;

        tracing::debug!(
            backend = %results.backend,
            hits = results.total,
            "Retrieved context"
        );

        Ok(Context::from_results(
            &results.items,
            self.config.max_context_chars,
        ))
    }
}

impl std::fmt::Debug for SearchAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAssistant")
            .field("search", &self.search.name())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use deepbrain_fts::{SearchConfig, SearchDocument, SimpleSearch};
    use deepbrain_llm::{MockLlmProvider, Role};

    fn search() -> Arc<dyn SearchBackend> {
        let docs = vec![
            SearchDocument::builder()
                .id("https://www.georisques.gouv.fr/risques/inondations")
                .title("Inondations")
                .content("Une commune sur trois est exposée au risque inondation.")
                .source("georisques")
                .build(),
        ];
        Arc::new(SimpleSearch::new(&SearchConfig::default()).with_documents(docs))
    }

    #[test]
    fn test_chat_config_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.context_documents, 4);
        assert_eq!(config.max_context_chars, 6000);
        assert_eq!(config.history_turns, 3);
        assert!(config.system_prompt.contains("je ne sais pas"));
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let llm = Arc::new(MockLlmProvider::with_response("x"));
        let assistant = SearchAssistant::new(llm.clone(), search(), ChatConfig::default());
        let mut conversation = Conversation::new();

        let err = assistant.ask(&mut conversation, "   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(llm.call_count(), 0);
        assert!(conversation.is_empty());
    }

    #[tokio::test]
    async fn test_grounded_answer() {
        let llm = Arc::new(MockLlmProvider::with_response("Une commune sur trois [1]."));
        let assistant = SearchAssistant::new(llm.clone(), search(), ChatConfig::default());
        let mut conversation = Conversation::new();

        let answer = assistant
            .ask(&mut conversation, "inondation")
            .await
            .unwrap();
        assert!(answer.grounded);
        assert_eq!(answer.conversation_id, conversation.id());
        assert_eq!(answer.citations.len(), 1);
        assert_eq!(conversation.len(), 1);

        let request = llm.last_request().unwrap();
        assert_eq!(request.system_prompt.as_deref(), Some(DEFAULT_SYSTEM_PROMPT));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert!(request.messages[0].content.contains("[1] Inondations"));
    }

    #[tokio::test]
    async fn test_zero_context_documents_skips_search() {
        let llm = Arc::new(MockLlmProvider::with_response("Je ne sais pas."));
        let config = ChatConfig {
            context_documents: 0,
            ..Default::default()
        };
        let assistant = SearchAssistant::new(llm, search(), config);
        let answer = assistant
            .ask(&mut Conversation::new(), "inondation")
            .await
            .unwrap();
        assert!(!answer.grounded);
        assert!(answer.citations.is_empty());
    }
}
