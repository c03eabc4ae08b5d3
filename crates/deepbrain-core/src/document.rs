//! Documents produced by connectors.
//!
//! A connector turns one fetched resource (an HTML page, a PDF) into a
//! [`Document`] made of one or more [`Section`]s. Documents flow to the
//! indexer in [`DocumentBatch`]es.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Open-data portal a document was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    /// georisques.gouv.fr
    Georisques,
    /// Plan Local d'Urbanisme documents.
    Plu,
    /// Any other web page.
    Web,
}

impl DocumentSource {
    /// Stable lowercase name, used as the search facet value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Georisques => "georisques",
            Self::Plu => "plu",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "georisques" | "géorisques" => Ok(Self::Georisques),
            "plu" => Ok(Self::Plu),
            "web" => Ok(Self::Web),
            other => Err(Error::parse(format!("Unknown document source '{other}'"))),
        }
    }
}

/// A chunk of a document, optionally anchored to a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Where this section can be read.
    pub link: Option<String>,
    /// Cleaned text.
    pub text: String,
}

impl Section {
    /// Create a section anchored to `link`.
    pub fn new(link: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            text: text.into(),
        }
    }
}

/// A unit of content collected by a connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier (the canonical URL for web connectors).
    pub id: String,
    /// Content sections, in reading order.
    pub sections: Vec<Section>,
    /// Portal the document came from.
    pub source: DocumentSource,
    /// Human-readable name (page title, file name, or URL).
    pub semantic_identifier: String,
    /// Free-form metadata (content type, etc.).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// When the document was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl Document {
    /// Create a document fetched now.
    pub fn new(
        id: impl Into<String>,
        sections: Vec<Section>,
        source: DocumentSource,
        semantic_identifier: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sections,
            source,
            semantic_identifier: semantic_identifier.into(),
            metadata: BTreeMap::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// All section texts joined by blank lines.
    pub fn full_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Link of the first section that has one.
    pub fn primary_link(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| s.link.as_deref())
    }
}

/// Documents handed to the indexer together.
pub type DocumentBatch = Vec<Document>;
