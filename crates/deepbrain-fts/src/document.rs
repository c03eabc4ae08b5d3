//! Search document representation.
//!
//! `SearchDocument` is the flattened, indexable form of a connector
//! [`Document`]: one title, one body, one link.
//!
//! ```rust
//! use deepbrain_fts::SearchDocument;
//!
//! let doc = SearchDocument::builder()
//!     .id("https://www.georisques.gouv.fr/risques/inondations")
//!     .title("Inondations")
//!     .content("Le risque inondation concerne une commune sur trois.")
//!     .source("georisques")
//!     .build();
//! assert!(doc.relevance("inondation") > 0.0);
//! ```

use deepbrain_core::Document;
use serde::{Deserialize, Serialize};

/// A document to be indexed and searched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Unique document identifier.
    pub id: String,
    /// Where the document can be read.
    pub link: String,
    /// Document title (boosted 3.0x in search).
    pub title: String,
    /// Main content body (boosted 1.0x in search).
    pub content: String,
    /// Portal name (`georisques`, `plu`, `web`).
    pub source: String,
    /// MIME type when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// RFC 3339 fetch timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
}

impl From<&Document> for SearchDocument {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            link: doc.primary_link().unwrap_or(&doc.id).to_string(),
            title: doc.semantic_identifier.clone(),
            content: doc.full_text(),
            source: doc.source.as_str().to_string(),
            content_type: doc.metadata.get("content_type").cloned(),
            fetched_at: Some(doc.fetched_at.to_rfc3339()),
        }
    }
}

impl SearchDocument {
    /// Create a new document builder.
    pub fn builder() -> SearchDocumentBuilder {
        SearchDocumentBuilder::default()
    }

    /// Calculate relevance score for a query.
    ///
    /// Each query term scores by the fields it appears in (case-insensitive
    /// substring match), averaged over the terms:
    /// - Title match: 3.0
    /// - Content match: 1.0
    /// - Source match: 0.5
    pub fn relevance(&self, query: &str) -> f32 {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() || query.trim() == "*" {
            return 1.0;
        }

        let title = self.title.to_lowercase();
        let content = self.content.to_lowercase();
        let source = self.source.to_lowercase();

        let total: f32 = terms
            .iter()
            .map(|term| {
                let mut score = 0.0;
                if title.contains(term.as_str()) {
                    score += 3.0;
                }
                if content.contains(term.as_str()) {
                    score += 1.0;
                }
                if source.contains(term.as_str()) {
                    score += 0.5;
                }
                score
            })
            .sum();

        total / terms.len() as f32
    }

    /// Extract a snippet of about `max_length` characters around the first
    /// query term found in the content.
    ///
    /// Falls back to the start of the content, and to `None` when the
    /// content is empty.
    pub fn extract_snippet(&self, query: &str, max_length: usize) -> Option<String> {
        if self.content.trim().is_empty() {
            return None;
        }

        let found = query
            .split_whitespace()
            .filter(|term| *term != "*")
            .find_map(|term| find_snippet(&self.content, &term.to_lowercase(), max_length));

        found.or_else(|| Some(truncate_chars(&self.content, max_length)))
    }

    /// Check if document matches source filter.
    pub fn matches_source(&self, source: &str) -> bool {
        self.source.eq_ignore_ascii_case(source)
    }
}

/// Byte offset of the first case-insensitive occurrence of `needle_lower`.
fn find_case_insensitive(text: &str, needle_lower: &str) -> Option<usize> {
    let needle_chars = needle_lower.chars().count();
    if needle_chars == 0 {
        return None;
    }
    text.char_indices().map(|(i, _)| i).find(|&i| {
        text[i..]
            .chars()
            .take(needle_chars)
            .collect::<String>()
            .to_lowercase()
            == needle_lower
    })
}

/// Find a snippet of text centered around a query match.
fn find_snippet(text: &str, query_lower: &str, max_length: usize) -> Option<String> {
    let pos = find_case_insensitive(text, query_lower)?;

    // Start a quarter of the window before the match, on a word boundary.
    let context = max_length / 4;
    let before: Vec<(usize, char)> = text[..pos].char_indices().collect();
    let start_char = before.len().saturating_sub(context);
    let start = if start_char > 0 {
        let raw = before.get(start_char).map(|(i, _)| *i).unwrap_or(pos);
        text[..raw]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(p, c)| p + c.len_utf8())
            .unwrap_or(raw)
    } else {
        0
    };

    let end = text[start..]
        .char_indices()
        .nth(max_length)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len());
    let end = if end < text.len() {
        text[end..]
            .find(char::is_whitespace)
            .map(|p| end + p)
            .unwrap_or(text.len())
    } else {
        end
    };

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(text[start..end].trim());
    if end < text.len() {
        snippet.push_str("...");
    }

    Some(snippet.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// First `max_chars` characters, with an ellipsis when cut.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Builder for SearchDocument.
#[derive(Debug, Default)]
pub struct SearchDocumentBuilder {
    doc: SearchDocument,
}

impl SearchDocumentBuilder {
    /// Set the document ID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.doc.id = id.into();
        self
    }

    /// Set the link.
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.doc.link = link.into();
        self
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.doc.title = title.into();
        self
    }

    /// Set the content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.doc.content = content.into();
        self
    }

    /// Set the source.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.doc.source = source.into();
        self
    }

    /// Set the content type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.doc.content_type = Some(content_type.into());
        self
    }

    /// Set the fetch timestamp.
    pub fn fetched_at(mut self, fetched_at: impl Into<String>) -> Self {
        self.doc.fetched_at = Some(fetched_at.into());
        self
    }

    /// Build the document. The link defaults to the ID.
    pub fn build(mut self) -> SearchDocument {
        if self.doc.link.is_empty() {
            self.doc.link = self.doc.id.clone();
        }
        self.doc
    }
}

// ============================================================================
// Tests
// ============================================================================
