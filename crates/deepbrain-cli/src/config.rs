//! DeepBrain application configuration.
//!
//! One TOML file with a section per component:
//!
//! ```toml
//! [albert]
//! model_name = "llama3-instruct-8b"
//!
//! [crawler]
//! base_url = "https://www.georisques.gouv.fr"
//! max_pages = 200
//!
//! [search]
//! index_path = "/var/lib/deepbrain/index"
//!
//! [chat]
//! context_documents = 4
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use deepbrain_chat::ChatConfig;
use deepbrain_connectors::georisques::{BASE_URL, INDEX_BATCH_SIZE, MAX_PAGES_TO_VISIT};
use deepbrain_core::ConfigManager;
use deepbrain_fts::SearchConfig;
use deepbrain_llm::AlbertConfig;

/// API key for Albert.
pub const ENV_API_KEY: &str = "ALBERT_API_KEY";
/// Albert base URL.
pub const ENV_API_BASE: &str = "ALBERT_API_BASE";
/// Albert model name.
pub const ENV_MODEL: &str = "ALBERT_MODEL";
/// Albert model publisher.
pub const ENV_MODEL_PROVIDER: &str = "ALBERT_MODEL_PROVIDER";
/// Index directory.
pub const ENV_INDEX_PATH: &str = "DEEPBRAIN_INDEX_PATH";

/// Crawl settings, under `[crawler]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First page of the crawl
    pub base_url: String,
    /// Documents per batch
    pub batch_size: usize,
    /// Work-list pops before the crawl stops
    pub max_pages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            batch_size: INDEX_BATCH_SIZE,
            max_pages: MAX_PAGES_TO_VISIT,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepBrainConfig {
    /// Language model
    pub albert: AlbertConfig,
    /// Géorisques crawler
    pub crawler: CrawlerConfig,
    /// Full-text search
    pub search: SearchConfig,
    /// Assistant
    pub chat: ChatConfig,
}

impl DeepBrainConfig {
    /// Applies overrides from `(name, value)` pairs. Empty values are ignored.
    ///
    /// Exported `DEEPBRAIN_<SECTION>_<KEY>` names are applied first, then the
    /// `ALBERT_*` and `DEEPBRAIN_INDEX_PATH` shortcuts, which win.
    pub fn apply_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();

        if let Err(e) = self.apply_env_vars(&vars) {
            tracing::warn!(error = %e, "Ignoring environment overrides");
        }

        let get = |name: &str| vars.get(name).cloned();
        if let Some(key) = get(ENV_API_KEY) {
            self.albert.api_key = Some(key);
        }
        if let Some(base) = get(ENV_API_BASE) {
            self.albert.endpoint = Some(base);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.albert.model_name = model;
        }
        if let Some(provider) = get(ENV_MODEL_PROVIDER) {
            self.albert.model_provider = provider;
        }
        if let Some(path) = get(ENV_INDEX_PATH) {
            self.search.index_path = Some(path);
        }
    }

    /// Where the index lives: `search.index_path`, else
    /// `<data_dir>/deepbrain/index`.
    pub fn index_path(&self) -> Option<PathBuf> {
        match &self.search.index_path {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::data_dir().map(|dir| dir.join(Self::project_name()).join("index")),
        }
    }
}

impl ConfigManager for DeepBrainConfig {
    fn project_name() -> &'static str {
        "deepbrain"
    }

    fn apply_env_overrides(&mut self) {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
        self.apply_overrides(vars);
    }
}
