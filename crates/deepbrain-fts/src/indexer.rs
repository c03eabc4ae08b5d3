//! Tantivy index writer wrapper.
//!
//! `Indexer` wraps Tantivy's `IndexWriter`, converts [`SearchDocument`]s and
//! handles the index lifecycle. Documents are keyed by `id`: adding a
//! document whose id is already indexed replaces the previous version once
//! committed.
//!
//! ```rust,ignore
//! use deepbrain_fts::{Indexer, SearchDocument, SearchSchema};
//!
//! let schema = SearchSchema::build();
//! let mut indexer = Indexer::new(&index_path, &schema)?;
//!
//! let doc = SearchDocument::builder()
//!     .id("https://www.georisques.gouv.fr/risques/seismes")
//!     .title("Séismes")
//!     .content("La France dispose d'un zonage sismique...")
//!     .source("georisques")
//!     .build();
//!
//! indexer.add_document(&doc)?;
//! indexer.commit()?;
//! ```

use std::path::Path;

use deepbrain_core::{Error, Result};
use tantivy::{Index, IndexWriter, TantivyDocument, Term};

use crate::document::SearchDocument;
use crate::schema::SearchSchema;

/// Index writer buffer size (50MB).
const WRITER_BUFFER_SIZE: usize = 50_000_000;

/// Tantivy index writer wrapper.
pub struct Indexer {
    index: Index,
    writer: IndexWriter,
    schema: SearchSchema,
}

impl Indexer {
    /// Create or open a Tantivy index at the given path.
    ///
    /// If the directory doesn't hold an index yet, creates a new one.
    /// Field handles of an existing index are taken from its own schema.
    pub fn new(index_path: &Path, schema: &SearchSchema) -> Result<Self> {
        if !index_path.exists() {
            std::fs::create_dir_all(index_path).map_err(|e| Error::io_with_path(e, index_path))?;
        }

        let (index, schema) = if index_path.join("meta.json").exists() {
            let index = Index::open_in_dir(index_path)
                .map_err(|e| Error::operation(format!("Failed to open index: {e}")))?;
            let schema = SearchSchema::from_schema(index.schema())?;
            (index, schema)
        } else {
            let index = Index::create_in_dir(index_path, schema.schema().clone())
                .map_err(|e| Error::operation(format!("Failed to create index: {e}")))?;
            (index, schema.clone())
        };

        Self::with_index(index, schema)
    }

    /// Create an in-memory index (for testing).
    pub fn new_in_memory(schema: &SearchSchema) -> Result<Self> {
        let index = Index::create_in_ram(schema.schema().clone());
        Self::with_index(index, schema.clone())
    }

    fn with_index(index: Index, schema: SearchSchema) -> Result<Self> {
        SearchSchema::register_tokenizers(&index);

        let writer = index
            .writer(WRITER_BUFFER_SIZE)
            .map_err(|e| Error::operation(format!("Failed to create index writer: {e}")))?;

        Ok(Self {
            index,
            writer,
            schema,
        })
    }

    /// Stage a document, replacing any indexed document with the same id.
    ///
    /// The document is not searchable until `commit()` is called.
    pub fn add_document(&mut self, doc: &SearchDocument) -> Result<()> {
        self.writer
            .delete_term(Term::from_field_text(self.schema.id, &doc.id));
        self.writer
            .add_document(self.convert_to_tantivy_doc(doc))
            .map_err(|e| Error::operation(format!("Failed to add document: {e}")))?;
        Ok(())
    }

    /// Commit staged changes to make them searchable.
    pub fn commit(&mut self) -> Result<()> {
        self.writer
            .commit()
            .map_err(|e| Error::operation(format!("Failed to commit index: {e}")))?;
        Ok(())
    }

    /// Clear all documents from the index.
    pub fn clear(&mut self) -> Result<()> {
        self.writer
            .delete_all_documents()
            .map_err(|e| Error::operation(format!("Failed to clear index: {e}")))?;
        self.commit()
    }

    /// Get reference to the underlying Tantivy index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Get the schema.
    pub fn schema(&self) -> &SearchSchema {
        &self.schema
    }

    fn convert_to_tantivy_doc(&self, doc: &SearchDocument) -> TantivyDocument {
        let s = &self.schema;
        let mut tantivy_doc = TantivyDocument::new();

        tantivy_doc.add_text(s.id, &doc.id);
        tantivy_doc.add_text(s.link, &doc.link);
        tantivy_doc.add_text(s.title, &doc.title);
        tantivy_doc.add_text(s.content, &doc.content);
        tantivy_doc.add_text(s.source, &doc.source);
        if let Some(ref content_type) = doc.content_type {
            tantivy_doc.add_text(s.content_type, content_type);
        }
        if let Some(ref fetched_at) = doc.fetched_at {
            tantivy_doc.add_text(s.fetched_at, fetched_at);
        }

        tantivy_doc
    }
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("index", &"<tantivy::Index>")
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

    fn create_test_doc(id: &str, content: &str) -> SearchDocument {
        SearchDocument::builder()
            .id(id)
            .title(format!("Page {id}"))
            .content(content)
            .source("georisques")
            .build()
    }

    fn num_docs(indexer: &Indexer) -> u64 {
        let reader = indexer.index().reader().unwrap();
        reader.reload().unwrap();
        reader.searcher().num_docs()
    }

    #[test]
    fn test_indexer_add_and_commit() {
        let schema = SearchSchema::build();
        let mut indexer = Indexer::new_in_memory(&schema).unwrap();

        indexer.add_document(&create_test_doc("a", "crues")).unwrap();
        indexer.add_document(&create_test_doc("b", "séismes")).unwrap();
        assert_eq!(num_docs(&indexer), 0);

        indexer.commit().unwrap();
        assert_eq!(num_docs(&indexer), 2);
    }

    #[test]
    fn test_indexer_replaces_same_id() {
        let schema = SearchSchema::build();
        let mut indexer = Indexer::new_in_memory(&schema).unwrap();

        indexer.add_document(&create_test_doc("a", "v1")).unwrap();
        indexer.commit().unwrap();
        indexer.add_document(&create_test_doc("a", "v2")).unwrap();
        indexer.commit().unwrap();

        assert_eq!(num_docs(&indexer), 1);
    }

    #[test]
    fn test_indexer_clear() {
        let schema = SearchSchema::build();
        let mut indexer = Indexer::new_in_memory(&schema).unwrap();

        indexer.add_document(&create_test_doc("1", "x")).unwrap();
        indexer.add_document(&create_test_doc("2", "y")).unwrap();
        indexer.commit().unwrap();

        indexer.clear().unwrap();
        assert_eq!(num_docs(&indexer), 0);
    }

    #[test]
    fn test_indexer_optional_fields() {
        let schema = SearchSchema::build();
        let mut indexer = Indexer::new_in_memory(&schema).unwrap();

        let doc = SearchDocument::builder()
            .id("https://www.georisques.gouv.fr/docs/ppri.pdf")
            .title("ppri.pdf")
            .source("georisques")
            .content_type("application/pdf")
            .fetched_at("2024-05-01T10:00:00+00:00")
            .build();
        indexer.add_document(&doc).unwrap();
        indexer.commit().unwrap();
        assert_eq!(num_docs(&indexer), 1);
    }

    #[test]
    fn test_indexer_on_disk_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let schema = SearchSchema::build();

        {
            let mut indexer = Indexer::new(temp_dir.path(), &schema).unwrap();
            indexer.add_document(&create_test_doc("disk-1", "x")).unwrap();
            indexer.commit().unwrap();
            // writer lock released on drop
        }

        let indexer = Indexer::new(temp_dir.path(), &schema).unwrap();
        assert_eq!(num_docs(&indexer), 1);
        assert!(format!("{indexer:?}").contains("Indexer"));
    }

    #[test]
    fn test_indexer_creates_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("index");
        let schema = SearchSchema::build();

        Indexer::new(&path, &schema).unwrap();
        assert!(path.join("meta.json").exists());
    }
}
