//! Search backend trait and factory.
//!
//! This module defines the `SearchBackend` trait that all search implementations
//! must satisfy, plus types for search parameters and results.
//!
//! # Backends
//!
//! - `TantivySearch`: Full-text search with Tantivy (requires `fts-tantivy` feature)
//! - `SimpleSearch`: Linear scan over in-memory documents
//!
//! # Example
//!
//! ```rust,ignore
//! use deepbrain_fts::{create_search_backend, load_snapshot, SearchConfig, SearchParams};
//!
//! let config = SearchConfig::default();
//! let backend = create_search_backend(&config, load_snapshot(&index_path)?).await?;
//!
//! let params = SearchParams {
//!     query: "plan de prévention inondation".to_string(),
//!     limit: Some(5),
//!     ..Default::default()
//! };
//!
//! let results = backend.search(params).await?;
//! println!("Found {} results", results.total);
//! ```

use async_trait::async_trait;
use deepbrain_core::Result;
use serde::{Deserialize, Serialize};

use crate::document::SearchDocument;
use crate::stopwords::StopwordFilter;
use crate::types::{QueryMode, SearchConfig};

/// Parameters for a search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Search query string.
    pub query: String,

    /// Maximum results to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Filter by source portal (`georisques`, `plu`, `web`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Query mode override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_mode: Option<QueryMode>,

    /// Snippet length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_length: Option<usize>,
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Unique document identifier.
    pub id: String,

    /// Document title.
    pub title: String,

    /// Where the document can be read.
    pub link: String,

    /// Source portal.
    pub source: String,

    /// Search snippet with query context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Relevance score (higher is better). Scales differ between backends.
    pub relevance: f32,

    /// MIME type when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Collection of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Search result items.
    pub items: Vec<SearchResult>,

    /// Total number of matching documents (may be > items.len() if limited).
    pub total: usize,

    /// Backend that executed the search.
    pub backend: String,
}

impl SearchResults {
    /// Create empty results.
    pub fn empty(backend: &str) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            backend: backend.to_string(),
        }
    }
}

/// Abstract search backend trait.
///
/// Implementations provide different search strategies:
/// - `TantivySearch`: BM25 scoring, French stemming, fuzzy matching
/// - `SimpleSearch`: Linear scan with substring matching
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a search query.
    ///
    /// Returns results ordered by relevance (highest first).
    async fn search(&self, params: SearchParams) -> Result<SearchResults>;

    /// Get the backend name for diagnostics.
    fn name(&self) -> &str;

    /// Check if the backend is ready to handle queries.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Create a search backend based on configuration.
///
/// Selection logic:
/// 1. `backend = "tantivy"`, `fts-tantivy` enabled and an index exists at
///    `index_path` → `TantivySearch`
/// 2. Otherwise → `SimpleSearch` over `fallback_docs`
pub async fn create_search_backend(
    config: &SearchConfig,
    fallback_docs: Vec<SearchDocument>,
) -> Result<Box<dyn SearchBackend>> {
    #[cfg(feature = "fts-tantivy")]
    if config.backend == "tantivy" {
        if let Some(ref index_path) = config.index_path {
            let path = std::path::Path::new(index_path);
            if crate::tantivy_search::TantivySearch::index_exists(path) {
                match crate::tantivy_search::TantivySearch::new(config) {
                    Ok(backend) => return Ok(Box::new(backend)),
                    Err(e) => {
                        log::warn!(
                            "Failed to open Tantivy index: {e}, falling back to simple search"
                        );
                    }
                }
            }
        }
    }

    log::debug!(
        "Using simple search over {} documents",
        fallback_docs.len()
    );
    Ok(Box::new(
        SimpleSearch::new(config).with_documents(fallback_docs),
    ))
}

/// Simple linear-scan search backend.
///
/// Used when Tantivy is disabled or no index has been built yet.
///
/// # Limitations
///
/// - O(n) search time
/// - No stemming or fuzzy matching
/// - Substring matching only
pub struct SimpleSearch {
    config: SearchConfig,
    documents: Vec<SearchDocument>,
    stopwords: StopwordFilter,
}

impl SimpleSearch {
    /// Create a new simple search backend with no documents.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            config: config.clone(),
            documents: Vec::new(),
            stopwords: StopwordFilter::new(config),
        }
    }

    /// Replace the searchable documents.
    pub fn with_documents(mut self, documents: Vec<SearchDocument>) -> Self {
        self.documents = documents;
        self
    }

    /// Number of searchable documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether there is nothing to search.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matches_all_terms(doc: &SearchDocument, terms: &[String]) -> bool {
        terms.iter().all(|term| doc.relevance(term) > 0.0)
    }
}

#[async_trait]
impl SearchBackend for SimpleSearch {
    async fn search(&self, params: SearchParams) -> Result<SearchResults> {
        let limit = params.limit.unwrap_or(self.config.default_limit);
        let snippet_length = params.snippet_length.unwrap_or(self.config.snippet_length);
        let query = self.stopwords.filter(params.query.trim());
        let match_all = query.is_empty() || query == "*";

        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let mode = params
            .query_mode
            .unwrap_or(self.config.query_mode)
            .resolve(terms.len());

        log::debug!(
            "SimpleSearch: query='{}', mode={:?}, limit={}, source={:?}",
            query,
            mode,
            limit,
            params.source
        );

        let mut scored: Vec<(&SearchDocument, f32)> = self
            .documents
            .iter()
            .filter(|doc| {
                params
                    .source
                    .as_deref()
                    .is_none_or(|source| doc.matches_source(source))
            })
            .filter_map(|doc| {
                if match_all {
                    return Some((doc, 1.0));
                }
                if mode == QueryMode::And && !Self::matches_all_terms(doc, &terms) {
                    return None;
                }
                let relevance = doc.relevance(&query);
                (relevance > 0.0).then_some((doc, relevance))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        let total = scored.len();

        let items = scored
            .into_iter()
            .take(limit)
            .map(|(doc, relevance)| SearchResult {
                id: doc.id.clone(),
                title: doc.title.clone(),
                link: doc.link.clone(),
                source: doc.source.clone(),
                snippet: doc.extract_snippet(&query, snippet_length),
                relevance,
                content_type: doc.content_type.clone(),
            })
            .collect();

        Ok(SearchResults {
            items,
            total,
            backend: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "simple"
    }
}

impl std::fmt::Debug for SimpleSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleSearch")
            .field("config.backend", &self.config.backend)
            .field("documents", &self.documents.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
