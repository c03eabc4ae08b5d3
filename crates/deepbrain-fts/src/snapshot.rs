//! JSON snapshot of indexed documents.
//!
//! Written next to the Tantivy index on every build, so that the simple
//! backend can answer queries from the same corpus when Tantivy is
//! disabled or the index cannot be opened.

use std::path::Path;

use deepbrain_core::{Error, Result};

use crate::document::SearchDocument;

/// Snapshot filename stored in the index directory.
pub const SNAPSHOT_FILE: &str = "deepbrain-fts-documents.json";

/// Write `documents` to the snapshot file under `index_path`.
pub fn save_snapshot(index_path: &Path, documents: &[SearchDocument]) -> Result<()> {
    if !index_path.exists() {
        std::fs::create_dir_all(index_path).map_err(|e| Error::io_with_path(e, index_path))?;
    }

    let path = index_path.join(SNAPSHOT_FILE);
    let content = serde_json::to_string(documents)
        .map_err(|e| Error::operation(format!("Failed to serialize snapshot: {e}")))?;
    std::fs::write(&path, content).map_err(|e| Error::io_with_path(e, &path))?;

    log::debug!("Saved {} documents to {}", documents.len(), path.display());
    Ok(())
}

/// Read the snapshot under `index_path`; empty when none was written.
pub fn load_snapshot(index_path: &Path) -> Result<Vec<SearchDocument>> {
    let path = index_path.join(SNAPSHOT_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::parse(format!("Invalid document snapshot: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![
            SearchDocument::builder()
                .id("https://www.georisques.gouv.fr/")
                .title("Géorisques")
                .content("Mieux connaître les risques")
                .source("georisques")
                .build(),
        ];

        save_snapshot(dir.path(), &docs).unwrap();
        assert_eq!(load_snapshot(dir.path()).unwrap(), docs);
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_snapshot(&dir.path().join("nowhere")).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SNAPSHOT_FILE), "[{").unwrap();
        assert!(load_snapshot(dir.path()).is_err());
    }
}
