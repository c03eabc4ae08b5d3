//! Common types for the FTS module.
//!
//! These types are used across all search backends and are always available
//! regardless of feature flags.

use serde::{Deserialize, Serialize};

/// Search query mode.
///
/// Controls how multiple search terms are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Smart mode: AND for 1-2 terms, OR for 3+.
    #[default]
    Smart,
    /// All terms must match (AND).
    And,
    /// Any term can match (OR).
    Or,
}

impl QueryMode {
    /// Resolve `Smart` to `And` or `Or` for a query with `term_count` terms.
    pub fn resolve(self, term_count: usize) -> QueryMode {
        match self {
            QueryMode::Smart if term_count <= 2 => QueryMode::And,
            QueryMode::Smart => QueryMode::Or,
            other => other,
        }
    }
}

/// Search configuration.
///
/// Lives under `[search]` in the DeepBrain config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Backend type: "tantivy" or "simple".
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Path to the search index directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<String>,

    /// Default query mode.
    #[serde(default)]
    pub query_mode: QueryMode,

    /// Enable fuzzy matching.
    #[serde(default)]
    pub fuzzy_enabled: bool,

    /// Fuzzy edit distance (1 or 2).
    #[serde(default = "default_fuzzy_distance")]
    pub fuzzy_distance: u8,

    /// Enable stopword filtering.
    #[serde(default = "default_true")]
    pub stopwords_enabled: bool,

    /// Custom stopwords to add.
    #[serde(default)]
    pub custom_stopwords: Vec<String>,

    /// Words to preserve (not filter as stopwords).
    #[serde(default)]
    pub allowlist: Vec<String>,

    /// Default result limit.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Snippet length in characters.
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,
}

fn default_backend() -> String {
    "tantivy".to_string()
}

fn default_fuzzy_distance() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

fn default_limit() -> usize {
    10
}

fn default_snippet_length() -> usize {
    200
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            index_path: None,
            query_mode: QueryMode::default(),
            fuzzy_enabled: false,
            fuzzy_distance: default_fuzzy_distance(),
            stopwords_enabled: default_true(),
            custom_stopwords: Vec::new(),
            allowlist: Vec::new(),
            default_limit: default_limit(),
            snippet_length: default_snippet_length(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
