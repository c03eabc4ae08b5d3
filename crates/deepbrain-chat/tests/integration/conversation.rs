//! Multi-turn behavior: history replay and resets.

use deepbrain_chat::{ChatConfig, Conversation};
use deepbrain_llm::Role;

use crate::common::TestHarness;

#[tokio::test]
async fn test_previous_turns_are_replayed() {
    let harness = TestHarness::with_responses(&["Réponse 1", "Réponse 2"]);
    let assistant = harness.assistant(ChatConfig::default());
    let mut conversation = Conversation::new();

    assistant
        .ask(&mut conversation, "Qu'est-ce qu'un PPRI ?")
        .await
        .unwrap();
    let second = assistant
        .ask(&mut conversation, "Et pour les argiles ?")
        .await
        .unwrap();

    assert_eq!(second.answer, "Réponse 2");
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation.turns()[0].answer, "Réponse 1");

    let request = harness.llm.last_request().unwrap();
    let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    assert_eq!(request.messages[0].content, "Qu'est-ce qu'un PPRI ?");
    assert_eq!(request.messages[1].content, "Réponse 1");
}

#[tokio::test]
async fn test_history_window() {
    let harness = TestHarness::new();
    let config = ChatConfig {
        history_turns: 1,
        ..Default::default()
    };
    let assistant = harness.assistant(config);
    let mut conversation = Conversation::new();

    for question in ["inondation", "argiles", "PPRI"] {
        assistant.ask(&mut conversation, question).await.unwrap();
    }

    let request = harness.llm.last_request().unwrap();
    assert_eq!(request.messages.len(), 3);
    assert_eq!(request.messages[0].content, "argiles");
    assert_eq!(harness.llm.call_count(), 3);
}

#[tokio::test]
async fn test_reset_starts_fresh() {
    let harness = TestHarness::new();
    let assistant = harness.assistant(ChatConfig::default());
    let mut conversation = Conversation::new();

    let first = assistant.ask(&mut conversation, "inondation").await.unwrap();
    conversation.reset();
    let second = assistant.ask(&mut conversation, "argiles").await.unwrap();

    assert_ne!(first.conversation_id, second.conversation_id);
    assert_eq!(second.conversation_id, conversation.id());
    let request = harness.llm.last_request().unwrap();
    assert_eq!(request.messages.len(), 1);
}

#[tokio::test]
async fn test_independent_conversations() {
    let harness = TestHarness::default();
    let assistant = harness.assistant(ChatConfig::default());
    let mut a = Conversation::new();
    let mut b = Conversation::new();

    assistant.ask(&mut a, "inondation").await.unwrap();
    assistant.ask(&mut b, "argiles").await.unwrap();

    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_ne!(a.id(), b.id());
}
