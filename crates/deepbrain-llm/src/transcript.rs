//! Plain-text chat transcripts.
//!
//! Upstream prompt builders produce a single string where blocks start with
//! `System:` or `Human:`. The Albert API wants a list of role-tagged
//! messages, so the transcript is split back into blocks here.

use crate::types::{Message, Role};

const SYSTEM_PREFIX: &str = "System:";
const HUMAN_PREFIX: &str = "Human:";
const AI_PREFIX: &str = "AI:";
const DO_NOT_RESPOND: &str = "Do not respond";

/// Split a transcript into messages.
///
/// - a line starting with `System:` opens a system block, `Human:` a user block
///   (the marker and one following space are dropped);
/// - the exact line `Do not respond` switches the current block to the user
///   role and stays in its content;
/// - any other line is appended to the current block;
/// - text before the first marker belongs to the first block.
///
/// Blocks are trimmed. A transcript without any marker yields no message.
///
/// ```
/// use deepbrain_llm::transcript::parse_transcript;
/// use deepbrain_llm::Role;
///
/// let messages = parse_transcript("System: Be brief.\nHuman: Hello\nthere");
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[1].role, Role::User);
/// assert_eq!(messages[1].content, "Hello\nthere");
/// ```
pub fn parse_transcript(transcript: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut role: Option<Role> = None;
    let mut content = String::new();

    for line in transcript.split('\n') {
        let marker = if let Some(rest) = line.strip_prefix(SYSTEM_PREFIX) {
            Some((Role::System, rest))
        } else {
            line.strip_prefix(HUMAN_PREFIX).map(|rest| (Role::User, rest))
        };

        match marker {
            Some((next_role, rest)) => {
                if let Some(current) = role {
                    messages.push(Message::new(current, content.trim()));
                    content.clear();
                }
                role = Some(next_role);
                content.push_str(rest.strip_prefix(' ').unwrap_or(rest));
                content.push('\n');
            }
            None if line == DO_NOT_RESPOND => {
                role = Some(Role::User);
                content.push_str(line);
                content.push('\n');
            }
            None => {
                content.push_str(line);
                content.push('\n');
            }
        }
    }

    if let Some(current) = role {
        messages.push(Message::new(current, content.trim()));
    }
    messages
}

/// Render messages as a transcript, one prefixed block per message.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| {
            let prefix = match message.role {
                Role::System => SYSTEM_PREFIX,
                Role::User => HUMAN_PREFIX,
                Role::Assistant => AI_PREFIX,
            };
            format!("{prefix} {}", message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
