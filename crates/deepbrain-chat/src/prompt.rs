//! Prompt assembly for grounded answers.

use deepbrain_fts::SearchResult;
use deepbrain_llm::Message;

use crate::conversation::{Citation, Turn};

/// Default instructions given to the model.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Tu es DeepBrain, un assistant qui aide les citoyens \
à trouver des informations dans les données publiques françaises (Géorisques, documents \
d'urbanisme). Réponds en français, uniquement à partir des extraits fournis. Cite tes sources \
avec leur numéro entre crochets, par exemple [1]. Si les extraits ne permettent pas de \
répondre, réponds « je ne sais pas ».";

/// Message sent in place of excerpts when retrieval found nothing.
pub const NO_CONTEXT: &str = "Aucun document pertinent n'a été trouvé.";

/// Numbered excerpts plus the citations they were taken from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// Text block given to the model
    pub text: String,
    /// One entry per distinct link, in excerpt order
    pub citations: Vec<Citation>,
}

impl Context {
    /// Formats results as `[n] title (link)` headers followed by snippets.
    ///
    /// The text stops at `max_chars` characters. Results that no longer fit
    /// are dropped and do not appear in the citations.
    pub fn from_results(results: &[SearchResult], max_chars: usize) -> Self {
        let mut context = Self::default();
        let mut used = 0usize;

        for (i, result) in results.iter().enumerate() {
            let mut excerpt = format!("[{}] {} ({})", i + 1, result.title, result.link);
            if let Some(snippet) = result.snippet.as_deref().filter(|s| !s.trim().is_empty()) {
                excerpt.push('\n');
                excerpt.push_str(snippet.trim());
            }

            let separator = if context.text.is_empty() { 0 } else { 2 };
            let remaining = max_chars.saturating_sub(used + separator);
            if remaining == 0 {
                break;
            }

            let excerpt_len = excerpt.chars().count();
            let excerpt = if excerpt_len > remaining {
                excerpt.chars().take(remaining).collect::<String>()
            } else {
                excerpt
            };

            if separator > 0 {
                context.text.push_str("\n\n");
            }
            used += separator + excerpt.chars().count();
            context.text.push_str(&excerpt);

            if !context.citations.iter().any(|c| c.link == result.link) {
                context.citations.push(Citation {
                    title: result.title.clone(),
                    link: result.link.clone(),
                    source: result.source.clone(),
                });
            }

            if excerpt_len > remaining {
                break;
            }
        }

        context
    }

    /// Whether any excerpt made it in.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Previous turns as alternating user and assistant messages.
pub fn history_messages(turns: &[Turn]) -> Vec<Message> {
    turns
        .iter()
        .flat_map(|turn| {
            [
                Message::user(turn.question.clone()),
                Message::assistant(turn.answer.clone()),
            ]
        })
        .collect()
}

/// The final user message: excerpts, then the question.
pub fn question_message(context: &Context, question: &str) -> Message {
    let excerpts = if context.is_empty() {
        NO_CONTEXT
    } else {
        context.text.as_str()
    };
    Message::user(format!("Extraits :\n{excerpts}\n\nQuestion : {question}"))
}
