//! Index freshness and content hashing.
//!
//! `IndexMetadata` records what an index was built from, so that a crawl
//! returning the same pages does not trigger a rebuild.
//!
//! This module is only available with the `fts-tantivy` feature.
//!
//! # Freshness Strategy
//!
//! The content hash is a blake3 digest of:
//! - Schema version
//! - Every document's id, title and content, sorted by id
//!
//! Fetch timestamps are left out: re-crawling unchanged pages keeps the
//! hash stable.
//!
//! ```rust,ignore
//! use deepbrain_fts::IndexMetadata;
//!
//! let hash = IndexMetadata::compute_hash(&documents);
//! if let Some(metadata) = IndexMetadata::load(&index_path)? {
//!     if metadata.is_fresh(&hash) {
//!         println!("Index is up to date");
//!     }
//! }
//!
//! IndexMetadata::new(hash, documents.len()).save(&index_path)?;
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use deepbrain_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::document::SearchDocument;
use crate::schema::SCHEMA_VERSION;

/// Metadata filename stored in the index directory.
pub const METADATA_FILE: &str = "deepbrain-fts-metadata.json";

/// Metadata about an index, including content hash for freshness checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// blake3 hash of the indexed documents and schema version.
    pub content_hash: String,

    /// Timestamp of last indexing (RFC 3339).
    pub indexed_at: String,

    /// Number of documents in the index.
    pub document_count: usize,

    /// Schema version used for this index.
    pub schema_version: u32,
}

impl IndexMetadata {
    /// Create new metadata with the given hash and document count.
    pub fn new(content_hash: String, document_count: usize) -> Self {
        Self {
            content_hash,
            indexed_at: Utc::now().to_rfc3339(),
            document_count,
            schema_version: SCHEMA_VERSION,
        }
    }

    /// Load metadata from the index directory.
    ///
    /// Returns `Ok(None)` if the metadata file doesn't exist.
    /// Returns `Err` if the file exists but cannot be parsed.
    pub fn load(index_path: &Path) -> Result<Option<Self>> {
        let metadata_path = index_path.join(METADATA_FILE);

        if !metadata_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&metadata_path)
            .map_err(|e| Error::io_with_path(e, &metadata_path))?;

        let metadata: Self = serde_json::from_str(&content)
            .map_err(|e| Error::parse(format!("Invalid metadata JSON: {e}")))?;

        Ok(Some(metadata))
    }

    /// Save metadata to the index directory.
    pub fn save(&self, index_path: &Path) -> Result<()> {
        if !index_path.exists() {
            std::fs::create_dir_all(index_path).map_err(|e| Error::io_with_path(e, index_path))?;
        }

        let metadata_path = index_path.join(METADATA_FILE);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::operation(format!("Failed to serialize metadata: {e}")))?;

        std::fs::write(&metadata_path, content)
            .map_err(|e| Error::io_with_path(e, &metadata_path))?;

        Ok(())
    }

    /// Compute the content hash of a document set.
    ///
    /// Independent of input order.
    pub fn compute_hash(documents: &[SearchDocument]) -> String {
        let mut sorted: Vec<&SearchDocument> = documents.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut hasher = blake3::Hasher::new();
        hasher.update(&SCHEMA_VERSION.to_le_bytes());
        for doc in sorted {
            for part in [&doc.id, &doc.title, &doc.content] {
                hasher.update(part.as_bytes());
                hasher.update(b"\0");
            }
        }

        hasher.finalize().to_hex().to_string()
    }

    /// Check if the index matches `current_hash` under the current schema.
    pub fn is_fresh(&self, current_hash: &str) -> bool {
        if self.schema_version != SCHEMA_VERSION {
            log::info!(
                "Schema version mismatch: stored={}, current={}",
                self.schema_version,
                SCHEMA_VERSION
            );
            return false;
        }

        if self.content_hash != current_hash {
            log::debug!(
                "Content hash mismatch: stored={}, current={}",
                self.content_hash,
                current_hash
            );
            return false;
        }

        true
    }

    /// Get the indexed timestamp as a DateTime.
    pub fn indexed_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.indexed_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn doc(id: &str, content: &str) -> SearchDocument {
        SearchDocument::builder()
            .id(id)
            .title(id)
            .content(content)
            .source("georisques")
            .build()
    }

    #[test]
    fn test_hash_is_order_independent() {
        let a = IndexMetadata::compute_hash(&[doc("a", "x"), doc("b", "y")]);
        let b = IndexMetadata::compute_hash(&[doc("b", "y"), doc("a", "x")]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = IndexMetadata::compute_hash(&[doc("a", "x")]);
        let b = IndexMetadata::compute_hash(&[doc("a", "y")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_field_boundaries() {
        // "ab" + "c" must not collide with "a" + "bc"
        let a = IndexMetadata::compute_hash(&[doc("ab", "c")]);
        let b = IndexMetadata::compute_hash(&[doc("a", "bc")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_ignores_fetch_time() {
        let mut later = doc("a", "x");
        later.fetched_at = Some("2030-01-01T00:00:00+00:00".to_string());
        assert_eq!(
            IndexMetadata::compute_hash(&[doc("a", "x")]),
            IndexMetadata::compute_hash(&[later])
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = IndexMetadata::new("abc".to_string(), 3);
        metadata.save(dir.path()).unwrap();

        let loaded = IndexMetadata::load(dir.path()).unwrap().unwrap();
        assert_eq!(loaded, metadata);
        assert!(loaded.indexed_at_datetime().is_some());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(IndexMetadata::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(METADATA_FILE), "not json").unwrap();
        assert!(IndexMetadata::load(dir.path()).is_err());
    }

    #[test]
    fn test_is_fresh() {
        let metadata = IndexMetadata::new("abc".to_string(), 1);
        assert!(metadata.is_fresh("abc"));
        assert!(!metadata.is_fresh("def"));

        let old = IndexMetadata {
            schema_version: SCHEMA_VERSION + 1,
            ..metadata
        };
        assert!(!old.is_fresh("abc"));
    }
}
