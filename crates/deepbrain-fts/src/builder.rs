//! Batch indexing orchestration.
//!
//! `IndexBuilder` turns crawled [`DocumentBatch`]es into a Tantivy index.
//! This module is only available with the `fts-tantivy` feature.
//!
//! ```rust,ignore
//! use deepbrain_fts::IndexBuilder;
//!
//! let batches = connector.load_from_state().await?;
//! let stats = IndexBuilder::new().build(&batches, &index_path)?;
//! println!("Indexed {} documents", stats.documents_indexed);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use deepbrain_core::{DocumentBatch, Result};

use crate::document::SearchDocument;
use crate::freshness::IndexMetadata;
use crate::indexer::Indexer;
use crate::schema::SearchSchema;
use crate::snapshot::save_snapshot;

/// Statistics about an indexing operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStats {
    /// Number of documents in the index after the build.
    pub documents_indexed: usize,
    /// Number of documents that failed to index.
    pub errors: usize,
    /// Total bytes of title and content processed.
    pub bytes_processed: usize,
    /// Content hash for freshness checking.
    pub content_hash: String,
    /// The index already matched the content and was left untouched.
    pub skipped_fresh: bool,
}

/// Batch index builder.
///
/// Handles freshness tracking, batched commits and the document snapshot.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    batch_size: usize,
    skip_freshness_check: bool,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    /// Create a new index builder.
    pub fn new() -> Self {
        Self {
            batch_size: 100,
            skip_freshness_check: false,
        }
    }

    /// Set the batch size for commits.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Skip freshness check and always rebuild.
    pub fn force_rebuild(mut self) -> Self {
        self.skip_freshness_check = true;
        self
    }

    /// Build an index at `index_path` from crawled batches.
    ///
    /// Documents sharing an id are indexed once, keeping the last one seen.
    /// The existing index is cleared first, so the result holds exactly
    /// the given documents.
    pub fn build(&self, batches: &[DocumentBatch], index_path: &Path) -> Result<IndexStats> {
        let documents = flatten(batches);
        let content_hash = IndexMetadata::compute_hash(&documents);

        if !self.skip_freshness_check {
            if let Ok(Some(metadata)) = IndexMetadata::load(index_path) {
                if metadata.is_fresh(&content_hash) {
                    log::info!("Index is fresh, skipping rebuild");
                    return Ok(IndexStats {
                        documents_indexed: metadata.document_count,
                        content_hash,
                        skipped_fresh: true,
                        ..Default::default()
                    });
                }
            }
        }

        log::info!(
            "Building index at {} from {} documents",
            index_path.display(),
            documents.len()
        );

        let schema = SearchSchema::build();
        let mut indexer = Indexer::new(index_path, &schema)?;
        indexer.clear()?;

        let mut stats = IndexStats {
            content_hash: content_hash.clone(),
            ..Default::default()
        };
        let mut batch_count = 0;

        for doc in &documents {
            stats.bytes_processed += doc.title.len() + doc.content.len();

            if let Err(e) = indexer.add_document(doc) {
                log::warn!("Failed to index {}: {}", doc.id, e);
                stats.errors += 1;
                continue;
            }

            stats.documents_indexed += 1;
            batch_count += 1;

            if batch_count >= self.batch_size {
                indexer.commit()?;
                batch_count = 0;
            }
        }

        if batch_count > 0 {
            indexer.commit()?;
        }

        save_snapshot(index_path, &documents)?;
        IndexMetadata::new(content_hash, stats.documents_indexed).save(index_path)?;

        log::info!(
            "Indexed {} documents ({} bytes, {} errors)",
            stats.documents_indexed,
            stats.bytes_processed,
            stats.errors
        );

        Ok(stats)
    }
}

/// Convert batches to search documents, deduplicated by id.
fn flatten(batches: &[DocumentBatch]) -> Vec<SearchDocument> {
    let mut by_id: BTreeMap<String, SearchDocument> = BTreeMap::new();
    for doc in batches.iter().flatten() {
        let search_doc = SearchDocument::from(doc);
        by_id.insert(search_doc.id.clone(), search_doc);
    }
    by_id.into_values().collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use deepbrain_core::{Document, DocumentSource, Section};

    fn page(url: &str, title: &str, text: &str) -> Document {
        Document::new(
            url,
            vec![Section::new(url, text)],
            DocumentSource::Georisques,
            title,
        )
    }

    fn batches() -> Vec<DocumentBatch> {
        vec![
            vec![
                page("https://g.fr/", "Accueil", "Mieux connaître les risques"),
                page("https://g.fr/seismes", "Séismes", "Zonage sismique"),
            ],
            vec![page("https://g.fr/inondations", "Inondations", "Crues")],
        ]
    }

    #[test]
    fn test_flatten_deduplicates() {
        let mut input = batches();
        input.push(vec![page("https://g.fr/", "Accueil v2", "Nouveau texte")]);

        let docs = flatten(&input);
        assert_eq!(docs.len(), 3);
        let home = docs.iter().find(|d| d.id == "https://g.fr/").unwrap();
        assert_eq!(home.title, "Accueil v2");
    }

    #[test]
    fn test_build_then_skip_when_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let builder = IndexBuilder::new().with_batch_size(2);

        let stats = builder.build(&batches(), dir.path()).unwrap();
        assert_eq!(stats.documents_indexed, 3);
        assert_eq!(stats.errors, 0);
        assert!(!stats.skipped_fresh);
        assert!(stats.bytes_processed > 0);

        let again = builder.build(&batches(), dir.path()).unwrap();
        assert!(again.skipped_fresh);
        assert_eq!(again.documents_indexed, 3);
        assert_eq!(again.content_hash, stats.content_hash);
    }

    #[test]
    fn test_force_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        IndexBuilder::new().build(&batches(), dir.path()).unwrap();

        let stats = IndexBuilder::new()
            .force_rebuild()
            .build(&batches(), dir.path())
            .unwrap();
        assert!(!stats.skipped_fresh);
        assert_eq!(stats.documents_indexed, 3);
    }

    #[test]
    fn test_rebuild_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        IndexBuilder::new().build(&batches(), dir.path()).unwrap();

        let smaller = vec![vec![page("https://g.fr/", "Accueil", "Autre texte")]];
        let stats = IndexBuilder::new().build(&smaller, dir.path()).unwrap();
        assert_eq!(stats.documents_indexed, 1);

        let metadata = IndexMetadata::load(dir.path()).unwrap().unwrap();
        assert_eq!(metadata.document_count, 1);
        assert_eq!(crate::snapshot::load_snapshot(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let stats = IndexBuilder::new()
            .with_batch_size(0)
            .build(&batches(), dir.path())
            .unwrap();
        assert_eq!(stats.documents_indexed, 3);
    }
}
