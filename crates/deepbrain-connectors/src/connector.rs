//! The connector interface.

use std::collections::BTreeMap;

use async_trait::async_trait;
use deepbrain_core::{DocumentBatch, DocumentSource};

use crate::error::Result;

/// Key/value credentials handed to a connector.
pub type Credentials = BTreeMap<String, String>;

/// A connector that loads its whole corpus in one pass.
#[async_trait]
pub trait LoadConnector: Send + Sync {
    /// Portal the documents come from.
    fn source(&self) -> DocumentSource;

    /// Accept credentials. Returns replacement credentials to persist, if any.
    fn load_credentials(&mut self, credentials: &Credentials) -> Result<Option<Credentials>>;

    /// Collect all documents, grouped in batches.
    async fn load_from_state(&self) -> Result<Vec<DocumentBatch>>;
}
