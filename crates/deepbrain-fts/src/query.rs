//! Query building utilities.
//!
//! Provides `QueryBuilder` for constructing weighted multi-field queries.
//! This module is only available with the `fts-tantivy` feature.

use tantivy::Index;
use tantivy::Term;
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::IndexRecordOption;

use crate::schema::SearchSchema;
use crate::types::QueryMode;

/// Characters with a meaning in Tantivy's query language.
const QUERY_SYNTAX: &[char] = &[
    '+', ':', '(', ')', '[', ']', '{', '}', '^', '"', '~', '*', '!', '\\', '/', '\'', '’', '?',
];

/// Builder for constructing search queries.
///
/// Supports weighted multi-field queries with fuzzy matching
/// and various query modes (AND, OR, Smart).
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    mode: QueryMode,
    fuzzy_distance: Option<u8>,
}

impl QueryBuilder {
    /// Create a new query builder.
    pub fn new(mode: QueryMode) -> Self {
        Self {
            mode,
            fuzzy_distance: None,
        }
    }

    /// Enable fuzzy matching on title and content.
    pub fn with_fuzzy(mut self, enabled: bool, distance: u8) -> Self {
        self.fuzzy_distance = enabled.then_some(distance.clamp(1, 2));
        self
    }

    /// Build a query from user input, optionally restricted to one source.
    ///
    /// User input is treated as plain words: query-language operators are
    /// stripped before parsing.
    pub fn build(
        &self,
        index: &Index,
        schema: &SearchSchema,
        query: &str,
        source: Option<&str>,
    ) -> Box<dyn Query> {
        let cleaned = sanitize(query);
        let text_query: Box<dyn Query> = if cleaned.is_empty() {
            Box::new(AllQuery)
        } else {
            self.parse(index, schema, &cleaned)
        };

        match source {
            Some(source) => {
                let filter = TermQuery::new(
                    Term::from_field_text(schema.source, source),
                    IndexRecordOption::Basic,
                );
                Box::new(BooleanQuery::new(vec![
                    (Occur::Must, text_query),
                    (Occur::Must, Box::new(filter)),
                ]))
            }
            None => text_query,
        }
    }

    fn parse(&self, index: &Index, schema: &SearchSchema, cleaned: &str) -> Box<dyn Query> {
        let fields = schema.full_text_fields();
        let mut parser =
            QueryParser::for_index(index, fields.iter().map(|(field, _)| *field).collect());

        for (field, boost) in &fields {
            parser.set_field_boost(*field, *boost);
            if let Some(distance) = self.fuzzy_distance {
                parser.set_field_fuzzy(*field, false, distance, true);
            }
        }

        let term_count = cleaned.split_whitespace().count();
        if self.mode.resolve(term_count) == QueryMode::And {
            parser.set_conjunction_by_default();
        }

        let (query, errors) = parser.parse_query_lenient(cleaned);
        if !errors.is_empty() {
            log::debug!("Lenient query parse of '{cleaned}': {errors:?}");
        }
        query
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(QueryMode::default())
    }
}

/// Replace query-language characters with spaces and drop boolean keywords.
fn sanitize(query: &str) -> String {
    query
        .replace(QUERY_SYNTAX, " ")
        .split_whitespace()
        .map(|word| word.trim_start_matches('-'))
        .filter(|word| !word.is_empty() && !matches!(*word, "AND" | "OR" | "NOT" | "IN"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests
// ============================================================================
