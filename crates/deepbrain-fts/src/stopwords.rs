//! Stopword filtering for search queries.
//!
//! Questions asked to DeepBrain are mostly French ("quels sont les risques
//! à Nice ?"), sometimes English. Both ISO stop-word lists from the
//! `stop-words` crate are loaded. The filter supports:
//!
//! - Allowlist: Words to preserve even if they're stopwords
//! - Custom stopwords: Additional words to filter
//! - Graceful fallback: If all terms are filtered, returns original query
//!
//! # Example
//!
//! ```rust
//! use deepbrain_fts::stopwords::StopwordFilter;
//! use deepbrain_fts::SearchConfig;
//!
//! let filter = StopwordFilter::new(&SearchConfig::default());
//!
//! assert_eq!(filter.filter("quels sont les risques à Nice"), "risques Nice");
//! assert_eq!(filter.filter("le la"), "le la");
//! ```

use std::collections::HashSet;

use stop_words::{LANGUAGE, get};

use crate::SearchConfig;

/// Characters stripped from the edges of each query word.
const PUNCTUATION: &[char] = &['?', '!', '.', ',', ';', ':', '"', '«', '»', '(', ')'];

/// Stopword filter for query preprocessing.
///
/// Removes common words while preserving domain-specific terms.
pub struct StopwordFilter {
    stopwords: HashSet<String>,
    allowlist: HashSet<String>,
    enabled: bool,
}

impl StopwordFilter {
    /// Create a new stopword filter from configuration.
    pub fn new(config: &SearchConfig) -> Self {
        let mut stopwords: HashSet<String> = get(LANGUAGE::French)
            .iter()
            .chain(get(LANGUAGE::English).iter())
            .map(|s| s.to_lowercase())
            .collect();

        for word in &config.custom_stopwords {
            stopwords.insert(word.to_lowercase());
        }

        // Case-sensitive, so that acronyms like "PLU" can be kept.
        let allowlist: HashSet<String> = config.allowlist.iter().cloned().collect();

        Self {
            stopwords,
            allowlist,
            enabled: config.stopwords_enabled,
        }
    }

    /// Create a disabled filter (passes all words through).
    pub fn disabled() -> Self {
        Self {
            stopwords: HashSet::new(),
            allowlist: HashSet::new(),
            enabled: false,
        }
    }

    /// Filter stopwords from a query string.
    ///
    /// Returns the filtered query. If all words are filtered, returns
    /// the original query to avoid empty searches.
    pub fn filter(&self, query: &str) -> String {
        if !self.enabled {
            return query.to_string();
        }

        let filtered: Vec<&str> = query
            .split_whitespace()
            .map(|word| word.trim_matches(PUNCTUATION))
            .filter(|word| !word.is_empty() && !self.is_stopword(word))
            .collect();

        if filtered.is_empty() {
            query.to_string()
        } else {
            filtered.join(" ")
        }
    }

    /// Check if a word is a stopword.
    ///
    /// Returns `false` if the word is in the allowlist (case-sensitive check).
    /// Otherwise, checks the stopword list (case-insensitive). French
    /// elisions (`l'`, `d'`, `qu'`...) count as stopwords.
    pub fn is_stopword(&self, word: &str) -> bool {
        if self.allowlist.contains(word) {
            return false;
        }

        let lower = word.to_lowercase();
        if self.stopwords.contains(&lower) {
            return true;
        }
        matches!(
            lower.trim_end_matches(['\'', '’']),
            "l" | "d" | "j" | "m" | "n" | "s" | "t" | "c" | "qu"
        ) && lower.ends_with(['\'', '’'])
    }

    /// Get the number of stopwords in the filter.
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if filtering is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl std::fmt::Debug for StopwordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopwordFilter")
            .field("enabled", &self.enabled)
            .field("stopword_count", &self.stopwords.len())
            .field("allowlist_count", &self.allowlist.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> StopwordFilter {
        StopwordFilter::new(&SearchConfig::default())
    }

    fn filter_with_allowlist(allowlist: Vec<&str>) -> StopwordFilter {
        let config = SearchConfig {
            allowlist: allowlist.into_iter().map(String::from).collect(),
            ..Default::default()
        };
        StopwordFilter::new(&config)
    }

    #[test]
    fn test_filter_french_question() {
        let filter = default_filter();
        assert_eq!(
            filter.filter("quels sont les risques dans la commune ?"),
            "risques commune"
        );
    }

    #[test]
    fn test_filter_english_words() {
        let filter = default_filter();
        assert_eq!(filter.filter("what is the flood risk"), "flood risk");
    }

    #[test]
    fn test_filter_preserves_content_words() {
        let filter = default_filter();
        assert_eq!(
            filter.filter("retrait-gonflement argiles"),
            "retrait-gonflement argiles"
        );
    }

    #[test]
    fn test_filter_strips_punctuation() {
        let filter = default_filter();
        assert_eq!(filter.filter("inondation, séisme?"), "inondation séisme");
    }

    #[test]
    fn test_elisions_are_stopwords() {
        let filter = default_filter();
        assert!(filter.is_stopword("l'"));
        assert!(filter.is_stopword("qu’"));
        assert!(!filter.is_stopword("urbanisme"));
    }

    #[test]
    fn test_allowlist_case_sensitive() {
        let config = SearchConfig {
            custom_stopwords: vec!["plu".to_string()],
            allowlist: vec!["PLU".to_string()],
            ..Default::default()
        };
        let filter = StopwordFilter::new(&config);
        assert_eq!(filter.filter("plu PLU Nice"), "PLU Nice");
    }

    #[test]
    fn test_allowlist_keeps_stopword() {
        let filter = filter_with_allowlist(vec!["Est"]);
        assert_eq!(filter.filter("Est Var"), "Est Var");
        assert_eq!(filter.filter("est Var"), "Var");
    }

    #[test]
    fn test_filter_all_stopwords_fallback() {
        let filter = default_filter();
        let original = "le la les";
        assert_eq!(filter.filter(original), original);
    }

    #[test]
    fn test_filter_empty_query() {
        assert_eq!(default_filter().filter(""), "");
    }

    #[test]
    fn test_custom_stopwords() {
        let config = SearchConfig {
            custom_stopwords: vec!["commune".to_string()],
            ..Default::default()
        };
        let filter = StopwordFilter::new(&config);
        assert_eq!(filter.filter("commune inondable"), "inondable");
    }

    #[test]
    fn test_disabled_filter() {
        let filter = StopwordFilter::disabled();
        assert_eq!(filter.filter("le la les"), "le la les");
        assert!(!filter.is_enabled());

        let config = SearchConfig {
            stopwords_enabled: false,
            ..Default::default()
        };
        assert_eq!(StopwordFilter::new(&config).filter("les risques"), "les risques");
    }

    #[test]
    fn test_stopword_count() {
        // French and English ISO lists together
        assert!(default_filter().stopword_count() >= 1500);
    }

    #[test]
    fn test_debug_format() {
        let debug = format!("{:?}", default_filter());
        assert!(debug.contains("StopwordFilter"));
        assert!(debug.contains("stopword_count"));
    }
}
