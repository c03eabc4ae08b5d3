//! Single-question behavior of the assistant.

use std::sync::Arc;

use deepbrain_chat::prompt::NO_CONTEXT;
use deepbrain_chat::{ChatConfig, Conversation, Error};
use deepbrain_llm::{MockLlmProvider, Role};

use crate::common::{BrokenSearch, TestHarness};

#[tokio::test]
async fn test_answer_cites_retrieved_page() {
    let harness = TestHarness::with_responses(&["Une commune sur trois est concernée [1]."]);
    let assistant = harness.assistant(ChatConfig::default());
    let mut conversation = Conversation::new();

    let answer = assistant
        .ask(&mut conversation, "Quels sont les risques d'inondation ?")
        .await
        .expect("question should be answered");

    assert!(answer.grounded);
    assert_eq!(answer.answer, "Une commune sur trois est concernée [1].");
    assert_eq!(answer.citations.len(), 1);
    assert_eq!(
        answer.citations[0].link,
        "https://www.georisques.gouv.fr/risques/inondations"
    );
    assert_eq!(answer.citations[0].source, "georisques");

    let request = harness.llm.last_request().unwrap();
    let prompt = &request.messages.last().unwrap().content;
    assert!(prompt.starts_with("Extraits :\n[1] Inondations"));
    assert!(prompt.ends_with("Question : Quels sont les risques d'inondation ?"));
}

#[tokio::test]
async fn test_unanswerable_question_is_not_grounded() {
    let harness = TestHarness::with_responses(&["Je ne sais pas."]);
    let assistant = harness.assistant(ChatConfig::default());

    let answer = assistant
        .ask(&mut Conversation::new(), "volcans actifs")
        .await
        .unwrap();

    assert!(!answer.grounded);
    assert!(answer.citations.is_empty());
    let request = harness.llm.last_request().unwrap();
    assert!(request.messages[0].content.contains(NO_CONTEXT));
}

#[tokio::test]
async fn test_context_limited_to_configured_documents() {
    let harness = TestHarness::new();
    let config = ChatConfig {
        context_documents: 1,
        ..Default::default()
    };
    let assistant = harness.assistant(config);

    let answer = assistant
        .ask(&mut Conversation::new(), "argiles inondation prévention")
        .await
        .unwrap();

    assert_eq!(answer.citations.len(), 1);
    let request = harness.llm.last_request().unwrap();
    assert!(!request.messages[0].content.contains("[2]"));
}

#[tokio::test]
async fn test_custom_system_prompt() {
    let harness = TestHarness::new();
    let config = ChatConfig {
        system_prompt: "Réponds en une phrase.".to_string(),
        ..Default::default()
    };
    harness
        .assistant(config)
        .ask(&mut Conversation::new(), "argiles")
        .await
        .unwrap();

    let request = harness.llm.last_request().unwrap();
    assert_eq!(request.system_prompt.as_deref(), Some("Réponds en une phrase."));
    assert_eq!(request.wire_messages()[0].role, Role::System);
}

#[tokio::test]
async fn test_search_failure_is_reported() {
    let harness = TestHarness::new().with_search(Arc::new(BrokenSearch));
    let assistant = harness.assistant(ChatConfig::default());
    let mut conversation = Conversation::new();

    let err = assistant
        .ask(&mut conversation, "inondation")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Search(_)));
    assert_eq!(harness.llm.call_count(), 0);
    assert!(conversation.is_empty());
}

#[tokio::test]
async fn test_llm_failure_leaves_conversation_untouched() {
    let harness = TestHarness::with_llm(Arc::new(MockLlmProvider::new(Vec::new())));
    let assistant = harness.assistant(ChatConfig::default());
    let mut conversation = Conversation::new();

    let err = assistant
        .ask(&mut conversation, "inondation")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Llm(_)));
    assert!(err.is_retryable());
    assert!(conversation.is_empty());
}
