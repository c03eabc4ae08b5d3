//! Common test utilities and harness for conversation integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use deepbrain_chat::{ChatConfig, SearchAssistant};
use deepbrain_fts::{
    SearchBackend, SearchConfig, SearchDocument, SearchParams, SearchResults, SimpleSearch,
};
use deepbrain_llm::MockLlmProvider;

/// Test harness wiring a mock LLM and an in-memory corpus.
pub struct TestHarness {
    /// Mock LLM provider for testing
    pub llm: Arc<MockLlmProvider>,
    /// Search backend over [`corpus`]
    pub search: Arc<dyn SearchBackend>,
}

impl TestHarness {
    /// Creates a harness with a single-response mock LLM.
    pub fn new() -> Self {
        Self::with_llm(Arc::new(MockLlmProvider::with_response("Réponse de test.")))
    }

    /// Creates a harness with a custom mock LLM provider.
    pub fn with_llm(llm: Arc<MockLlmProvider>) -> Self {
        let search = SimpleSearch::new(&SearchConfig::default()).with_documents(corpus());
        Self {
            llm,
            search: Arc::new(search),
        }
    }

    /// Creates a harness with multiple mock responses.
    pub fn with_responses(responses: &[&str]) -> Self {
        Self::with_llm(Arc::new(MockLlmProvider::new(
            responses.iter().map(|r| r.to_string()).collect(),
        )))
    }

    /// Replaces the search backend.
    pub fn with_search(mut self, search: Arc<dyn SearchBackend>) -> Self {
        self.search = search;
        self
    }

    /// Builds an assistant over the harness components.
    pub fn assistant(&self, config: ChatConfig) -> SearchAssistant {
        SearchAssistant::new(self.llm.clone(), self.search.clone(), config)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A few Géorisques pages.
pub fn corpus() -> Vec<SearchDocument> {
    vec![
        SearchDocument::builder()
            .id("https://www.georisques.gouv.fr/risques/inondations")
            .title("Inondations")
            .content(
                "Le risque inondation concerne une commune sur trois. Le plan de \
                 prévention des risques d'inondation (PPRI) réglemente l'urbanisme \
                 dans les zones exposées.",
            )
            .source("georisques")
            .build(),
        SearchDocument::builder()
            .id("https://www.georisques.gouv.fr/risques/retrait-gonflement-des-argiles")
            .title("Retrait-gonflement des argiles")
            .content(
                "Les sols argileux gonflent avec l'humidité et se rétractent en période \
                 de sécheresse, ce qui fissure les maisons.",
            )
            .source("georisques")
            .build(),
        SearchDocument::builder()
            .id("https://www.georisques.gouv.fr/docs/ppri-nice.pdf")
            .title("ppri-nice.pdf")
            .source("georisques")
            .content_type("application/pdf")
            .build(),
    ]
}

/// A backend that always fails.
pub struct BrokenSearch;

#[async_trait]
impl SearchBackend for BrokenSearch {
    async fn search(&self, _params: SearchParams) -> deepbrain_core::Result<SearchResults> {
        Err(deepbrain_core::Error::operation("index is locked"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}
