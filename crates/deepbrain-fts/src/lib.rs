//! Full-text search over crawled public documents.
//!
//! This crate indexes connector output with Tantivy (feature-gated) and
//! answers keyword queries for the chat assistant and the CLI.
//!
//! # Features
//!
//! - `fts-tantivy`: Enable Tantivy-based full-text search (default)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      deepbrain-fts                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchBackend trait                                        │
//! │  ├── SimpleSearch (linear scan over a document snapshot)    │
//! │  └── TantivySearch (BM25, French stemming)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchSchema (7 fields, fr_stem analyzer)                  │
//! │  SearchDocument (indexed document representation)           │
//! │  QueryBuilder (weighted multi-field queries)                │
//! │  StopwordFilter (French and English)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Indexer (Tantivy index writer)                             │
//! │  IndexBuilder (batch indexing from crawled batches)         │
//! │  IndexMetadata (content hash validation)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Schema
//!
//! | Field | Type | Purpose |
//! |-------|------|---------|
//! | `id` | STRING | Unique identifier (page URL) |
//! | `link` | STORED | Link shown to the user |
//! | `title` | TEXT | Full-text, boosted 3.0x |
//! | `content` | TEXT | Full-text, boosted 1.0x |
//! | `source` | STRING | Portal filter |
//! | `content_type` | STRING | MIME type |
//! | `fetched_at` | STORED | Fetch timestamp |
//!
//! # Example
//!
//! ```rust,ignore
//! use deepbrain_fts::{create_search_backend, load_snapshot, SearchParams};
//!
//! let backend = create_search_backend(&config, load_snapshot(&index_path)?).await?;
//!
//! let params = SearchParams {
//!     query: "retrait-gonflement des argiles".to_string(),
//!     limit: Some(5),
//!     ..Default::default()
//! };
//!
//! for result in backend.search(params).await?.items {
//!     println!("{}: {}", result.title, result.link);
//! }
//! ```

// Core modules (always available)
pub mod backend;
pub mod document;
pub mod snapshot;
pub mod stopwords;
pub mod types;

// Feature-gated Tantivy modules
#[cfg(feature = "fts-tantivy")]
pub mod schema;

#[cfg(feature = "fts-tantivy")]
pub mod query;

#[cfg(feature = "fts-tantivy")]
pub mod indexer;

#[cfg(feature = "fts-tantivy")]
pub mod builder;

#[cfg(feature = "fts-tantivy")]
pub mod freshness;

#[cfg(feature = "fts-tantivy")]
pub mod tantivy_search;

// Re-exports
pub use backend::{
    SearchBackend, SearchParams, SearchResult, SearchResults, SimpleSearch, create_search_backend,
};
pub use document::SearchDocument;
pub use snapshot::{load_snapshot, save_snapshot};
pub use stopwords::StopwordFilter;
pub use types::{QueryMode, SearchConfig};

#[cfg(feature = "fts-tantivy")]
pub use schema::SearchSchema;

#[cfg(feature = "fts-tantivy")]
pub use query::QueryBuilder;

#[cfg(feature = "fts-tantivy")]
pub use indexer::Indexer;

#[cfg(feature = "fts-tantivy")]
pub use builder::{IndexBuilder, IndexStats};

#[cfg(feature = "fts-tantivy")]
pub use freshness::IndexMetadata;

#[cfg(feature = "fts-tantivy")]
pub use tantivy_search::TantivySearch;
