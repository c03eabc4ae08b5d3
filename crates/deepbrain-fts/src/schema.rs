//! Tantivy schema definition for full-text search.
//!
//! # Schema Fields
//!
//! ## Identity Fields
//! - `id`: Unique document identifier, usually the page URL (STRING | STORED)
//! - `link`: Where the document can be read (STORED only)
//!
//! ## Full-Text Fields (searchable with positions for phrase queries)
//! - `title`: Page title or PDF file name (TEXT | STORED), boost 3.0x
//! - `content`: Cleaned page text (TEXT | STORED), boost 1.0x
//!
//! ## Facet Fields (filterable)
//! - `source`: Portal name (STRING | FAST | STORED)
//! - `content_type`: MIME type when known (STRING | STORED)
//!
//! ## Metadata Fields (stored only)
//! - `fetched_at`: RFC 3339 fetch timestamp
//!
//! # Tokenizer
//!
//! Full-text fields use the `fr_stem` analyzer:
//! SimpleTokenizer → LowerCaser → AsciiFoldingFilter → Stemmer(French)
//!
//! Accents are folded before stemming, so "séisme" matches "seismes" and
//! "inondées" matches "inondation" stems.

use deepbrain_core::{Error, Result};
use tantivy::Index;
use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, SchemaBuilder, TextFieldIndexing,
    TextOptions, FAST,
};
use tantivy::tokenizer::{
    AsciiFoldingFilter, Language, LowerCaser, SimpleTokenizer, Stemmer, TextAnalyzer,
};

/// Schema version for cache invalidation.
///
/// Increment this when schema fields change to force index rebuilds.
pub const SCHEMA_VERSION: u32 = 1;

/// Name of the French stemming analyzer.
pub const FR_STEM_TOKENIZER: &str = "fr_stem";

/// Search schema holding field references and the Tantivy schema.
#[derive(Clone)]
pub struct SearchSchema {
    schema: Schema,

    /// Unique document identifier.
    pub id: Field,
    /// Where the document can be read.
    pub link: Field,
    /// Document title (boosted 3.0x in search).
    pub title: Field,
    /// Main content body (boosted 1.0x in search).
    pub content: Field,
    /// Portal name, used for filtering.
    pub source: Field,
    /// MIME type.
    pub content_type: Field,
    /// Fetch timestamp.
    pub fetched_at: Field,
}

impl SearchSchema {
    /// Build the search schema.
    pub fn build() -> Self {
        let mut builder = SchemaBuilder::new();

        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(FR_STEM_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let id = builder.add_text_field("id", STRING | STORED);
        let link = builder.add_text_field("link", STORED);
        let title = builder.add_text_field("title", text_options.clone());
        let content = builder.add_text_field("content", text_options);
        let source = builder.add_text_field("source", STRING | FAST | STORED);
        let content_type = builder.add_text_field("content_type", STRING | STORED);
        let fetched_at = builder.add_text_field("fetched_at", STORED);

        Self {
            schema: builder.build(),
            id,
            link,
            title,
            content,
            source,
            content_type,
            fetched_at,
        }
    }

    /// Bind field handles from an existing index schema.
    ///
    /// Fails when the index was created with another schema layout.
    pub fn from_schema(schema: Schema) -> Result<Self> {
        Self::lookup(schema)
    }

    fn lookup(schema: Schema) -> Result<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| Error::config(format!("Index schema has no '{name}' field")))
        };

        Ok(Self {
            id: field("id")?,
            link: field("link")?,
            title: field("title")?,
            content: field("content")?,
            source: field("source")?,
            content_type: field("content_type")?,
            fetched_at: field("fetched_at")?,
            schema,
        })
    }

    /// Get the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Register custom tokenizers with a Tantivy index.
    ///
    /// Must be called after creating/opening an index to enable stemming.
    pub fn register_tokenizers(index: &Index) {
        let fr_stem = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .filter(AsciiFoldingFilter)
            .filter(Stemmer::new(Language::French))
            .build();

        index.tokenizers().register(FR_STEM_TOKENIZER, fr_stem);
    }

    /// Get full-text fields with their boost weights.
    pub fn full_text_fields(&self) -> Vec<(Field, f32)> {
        vec![(self.title, 3.0), (self.content, 1.0)]
    }

    /// Get all fields.
    pub fn all_fields(&self) -> Vec<Field> {
        vec![
            self.id,
            self.link,
            self.title,
            self.content,
            self.source,
            self.content_type,
            self.fetched_at,
        ]
    }
}

impl std::fmt::Debug for SearchSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSchema")
            .field("field_count", &self.all_fields().len())
            .field("schema_version", &SCHEMA_VERSION)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
