//! Tantivy search backend implementation.
//!
//! Provides `TantivySearch`, the full-featured search backend using Tantivy.
//! This module is only available with the `fts-tantivy` feature.

use std::path::Path;

use async_trait::async_trait;
use deepbrain_core::{Error, Result};
use tantivy::collector::{Count, TopDocs};
use tantivy::schema::Value;
use tantivy::snippet::SnippetGenerator;
use tantivy::{Index, IndexReader, TantivyDocument};

use crate::backend::{SearchBackend, SearchParams, SearchResult, SearchResults};
use crate::document::truncate_chars;
use crate::query::QueryBuilder;
use crate::schema::SearchSchema;
use crate::stopwords::StopwordFilter;
use crate::types::SearchConfig;

/// Tantivy-based search backend.
///
/// Provides full-text search with BM25 scoring, French stemming, fuzzy
/// matching and source filtering.
pub struct TantivySearch {
    index: Index,
    reader: IndexReader,
    schema: SearchSchema,
    config: SearchConfig,
    stopwords: StopwordFilter,
}

impl TantivySearch {
    /// Create a new TantivySearch from configuration.
    ///
    /// Opens the index at `config.index_path`.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let index_path = config
            .index_path
            .as_deref()
            .ok_or_else(|| Error::config("search.index_path is not set"))?;
        Self::open(Path::new(index_path), config)
    }

    /// Open an existing Tantivy index.
    pub fn open(index_path: &Path, config: &SearchConfig) -> Result<Self> {
        if !Self::index_exists(index_path) {
            return Err(Error::not_found(
                index_path.to_string_lossy(),
                "search index",
            ));
        }

        let index = Index::open_in_dir(index_path)
            .map_err(|e| Error::operation(format!("Failed to open index: {e}")))?;
        Self::from_index(index, config)
    }

    /// Wrap an already opened index (on disk or in RAM).
    pub fn from_index(index: Index, config: &SearchConfig) -> Result<Self> {
        SearchSchema::register_tokenizers(&index);
        let schema = SearchSchema::from_schema(index.schema())?;
        let reader = index
            .reader()
            .map_err(|e| Error::operation(format!("Failed to create index reader: {e}")))?;

        Ok(Self {
            index,
            reader,
            schema,
            config: config.clone(),
            stopwords: StopwordFilter::new(config),
        })
    }

    /// Check if an index exists at the given path.
    pub fn index_exists(index_path: &Path) -> bool {
        index_path.join("meta.json").exists()
    }

    fn stored_text(&self, doc: &TantivyDocument, field: tantivy::schema::Field) -> Option<String> {
        doc.get_first(field)
            .and_then(|value| value.as_str())
            .map(str::to_string)
    }
}

#[async_trait]
impl SearchBackend for TantivySearch {
    async fn search(&self, params: SearchParams) -> Result<SearchResults> {
        let limit = params.limit.unwrap_or(self.config.default_limit);
        if limit == 0 {
            return Ok(SearchResults::empty(self.name()));
        }
        let snippet_length = params.snippet_length.unwrap_or(self.config.snippet_length);
        let query_text = self.stopwords.filter(params.query.trim());

        let builder = QueryBuilder::new(params.query_mode.unwrap_or(self.config.query_mode))
            .with_fuzzy(self.config.fuzzy_enabled, self.config.fuzzy_distance);
        let query = builder.build(
            &self.index,
            &self.schema,
            &query_text,
            params.source.as_deref(),
        );

        self.reader
            .reload()
            .map_err(|e| Error::operation(format!("Failed to reload index reader: {e}")))?;
        let searcher = self.reader.searcher();

        let (top_docs, total) = searcher
            .search(query.as_ref(), &(TopDocs::with_limit(limit), Count))
            .map_err(|e| Error::operation(format!("Search failed: {e}")))?;

        let mut snippets = SnippetGenerator::create(&searcher, query.as_ref(), self.schema.content)
            .map_err(|e| Error::operation(format!("Failed to create snippet generator: {e}")))?;
        snippets.set_max_num_chars(snippet_length);

        log::debug!(
            "TantivySearch: query='{}', hits={}, limit={}",
            query_text,
            total,
            limit
        );

        let mut items = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| Error::operation(format!("Failed to load document: {e}")))?;

            let id = self.stored_text(&doc, self.schema.id).unwrap_or_default();
            let content = self.stored_text(&doc, self.schema.content).unwrap_or_default();

            let snippet = snippets.snippet_from_doc(&doc);
            let snippet = if !snippet.is_empty() {
                Some(snippet.fragment().split_whitespace().collect::<Vec<_>>().join(" "))
            } else if !content.trim().is_empty() {
                Some(truncate_chars(&content, snippet_length))
            } else {
                None
            };

            items.push(SearchResult {
                link: self
                    .stored_text(&doc, self.schema.link)
                    .unwrap_or_else(|| id.clone()),
                title: self.stored_text(&doc, self.schema.title).unwrap_or_default(),
                source: self.stored_text(&doc, self.schema.source).unwrap_or_default(),
                content_type: self.stored_text(&doc, self.schema.content_type),
                snippet,
                relevance: score,
                id,
            });
        }

        Ok(SearchResults {
            items,
            total,
            backend: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "tantivy"
    }
}

impl std::fmt::Debug for TantivySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivySearch")
            .field("schema", &self.schema)
            .field("stopwords", &self.stopwords)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::SearchDocument;
    use crate::indexer::Indexer;

    fn in_memory(config: &SearchConfig) -> TantivySearch {
        let schema = SearchSchema::build();
        let mut indexer = Indexer::new_in_memory(&schema).unwrap();
        let docs = [
            SearchDocument::builder()
                .id("https://www.georisques.gouv.fr/risques/inondations")
                .title("Inondations")
                .content(
                    "Une commune sur trois est exposée au risque inondation. \
                     Les crues lentes et les submersions marines sont surveillées.",
                )
                .source("georisques")
                .build(),
            SearchDocument::builder()
                .id("https://www.georisques.gouv.fr/risques/seismes")
                .title("Séismes")
                .content("Le zonage sismique réglementaire divise la France en cinq zones.")
                .source("georisques")
                .build(),
            SearchDocument::builder()
                .id("https://www.georisques.gouv.fr/docs/ppri-nice.pdf")
                .title("ppri-nice.pdf")
                .source("georisques")
                .content_type("application/pdf")
                .build(),
        ];
        for doc in &docs {
            indexer.add_document(doc).unwrap();
        }
        indexer.commit().unwrap();
        TantivySearch::from_index(indexer.index().clone(), config).unwrap()
    }

    fn query(q: &str) -> SearchParams {
        SearchParams {
            query: q.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_stemmed_and_accent_folded() {
        let backend = in_memory(&SearchConfig::default());
        let results = backend.search(query("seisme")).await.unwrap();
        assert_eq!(results.backend, "tantivy");
        assert_eq!(results.total, 1);
        assert_eq!(results.items[0].title, "Séismes");
        assert!(results.items[0].relevance > 0.0);
    }

    #[tokio::test]
    async fn test_search_question_with_stopwords() {
        let backend = in_memory(&SearchConfig::default());
        let results = backend
            .search(query("Quels sont les risques d'inondations ?"))
            .await
            .unwrap();
        assert!(results.total >= 1);
        assert_eq!(
            results.items[0].id,
            "https://www.georisques.gouv.fr/risques/inondations"
        );
        let snippet = results.items[0].snippet.as_deref().unwrap();
        assert!(snippet.contains("inondation"));
    }

    #[tokio::test]
    async fn test_pdf_document_has_no_snippet() {
        let backend = in_memory(&SearchConfig::default());
        let results = backend.search(query("ppri")).await.unwrap();
        assert_eq!(results.total, 1);
        let pdf = &results.items[0];
        assert!(pdf.snippet.is_none());
        assert_eq!(pdf.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(pdf.link, pdf.id);
    }

    #[tokio::test]
    async fn test_limit_and_total() {
        let backend = in_memory(&SearchConfig::default());
        let params = SearchParams {
            limit: Some(1),
            ..query("*")
        };
        let results = backend.search(params).await.unwrap();
        assert_eq!(results.total, 3);
        assert_eq!(results.items.len(), 1);

        let params = SearchParams {
            limit: Some(0),
            ..query("séisme")
        };
        assert!(backend.search(params).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_source_filter() {
        let backend = in_memory(&SearchConfig::default());
        let params = SearchParams {
            source: Some("plu".to_string()),
            ..query("séisme")
        };
        assert_eq!(backend.search(params).await.unwrap().total, 0);
    }

    #[test]
    fn test_new_requires_index_path() {
        assert!(TantivySearch::new(&SearchConfig::default()).is_err());
    }

    #[test]
    fn test_open_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let err = TantivySearch::open(dir.path(), &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(!TantivySearch::index_exists(dir.path()));
    }
}
