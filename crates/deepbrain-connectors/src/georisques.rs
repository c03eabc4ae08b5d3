//! Connector for georisques.gouv.fr.
//!
//! Starting from the portal home page, every fetched HTML page becomes a
//! document and the PDF files it links to are queued. The work list is
//! processed last-in first-out, so a page's PDFs are visited right after it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use deepbrain_core::util::urls::{file_name_from_url, is_pdf_url};
use deepbrain_core::{Document, DocumentBatch, DocumentSource, Section};

use crate::connector::{Credentials, LoadConnector};
use crate::error::{Error, Result};
use crate::html::{pdf_links, web_html_cleanup};

/// Portal home page.
pub const BASE_URL: &str = "https://www.georisques.gouv.fr";

/// Hard limit on work-list pops per crawl.
pub const MAX_PAGES_TO_VISIT: usize = 1000;

/// Documents per emitted batch.
pub const INDEX_BATCH_SIZE: usize = 16;

/// Desktop browser user agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/89.0.4389.82 Safari/537.36";

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Crawl strategies supported by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeorisquesConnectorType {
    /// Index the given page and the PDFs it links to.
    #[default]
    Single,
}

impl fmt::Display for GeorisquesConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
        }
    }
}

impl FromStr for GeorisquesConnectorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(Self::Single),
            _ => Err(Error::config(
                "Only 'single' type is supported for this connector.",
            )),
        }
    }
}

enum Page {
    Html(String),
    Pdf,
}

/// Crawls Géorisques pages and the PDF files they link to.
#[derive(Debug, Clone)]
pub struct GeorisquesConnector {
    base_url: Url,
    start_urls: Vec<Url>,
    connector_type: GeorisquesConnectorType,
    batch_size: usize,
    max_pages: usize,
    client: reqwest::Client,
}

impl GeorisquesConnector {
    /// Creates a connector starting at `base_url`.
    ///
    /// Fails when the type is not `single`, the URL is invalid, or the batch
    /// size is zero.
    pub fn new(base_url: &str, connector_type: &str, batch_size: usize) -> Result<Self> {
        let connector_type: GeorisquesConnectorType = connector_type.parse()?;
        if batch_size == 0 {
            return Err(Error::config("Batch size must be at least 1"));
        }
        let base_url = Url::parse(base_url)?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            start_urls: vec![base_url.clone()],
            base_url,
            connector_type,
            batch_size,
            max_pages: MAX_PAGES_TO_VISIT,
            client,
        })
    }

    /// Creates a connector with the portal defaults.
    pub fn with_defaults() -> Result<Self> {
        Self::new(BASE_URL, "single", INDEX_BATCH_SIZE)
    }

    /// Overrides the page limit.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Replaces the initial work list.
    pub fn with_start_urls(mut self, urls: Vec<Url>) -> Self {
        self.start_urls = urls;
        self
    }

    /// Home page of the crawl.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Configured crawl strategy.
    pub fn connector_type(&self) -> GeorisquesConnectorType {
        self.connector_type
    }

    /// Documents per batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    async fn fetch(&self, url: &Url) -> Result<Page> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let pdf_content = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase().starts_with(PDF_CONTENT_TYPE))
            .unwrap_or(false);
        if pdf_content || is_pdf_url(url.as_str()) {
            return Ok(Page::Pdf);
        }

        Ok(Page::Html(response.text().await?))
    }

    fn html_document(url: &Url, body: &str) -> Document {
        let parsed = web_html_cleanup(body);
        Document::new(
            url.as_str(),
            vec![Section::new(url.as_str(), parsed.cleaned_text)],
            DocumentSource::Georisques,
            parsed.title.unwrap_or_else(|| url.to_string()),
        )
    }

    fn pdf_document(url: &Url) -> Document {
        let name = file_name_from_url(url.as_str()).unwrap_or_else(|| url.to_string());
        Document::new(
            url.as_str(),
            vec![Section::new(url.as_str(), "")],
            DocumentSource::Georisques,
            name,
        )
        .with_metadata("content_type", PDF_CONTENT_TYPE)
    }
}

#[async_trait]
impl LoadConnector for GeorisquesConnector {
    fn source(&self) -> DocumentSource {
        DocumentSource::Georisques
    }

    fn load_credentials(&mut self, credentials: &Credentials) -> Result<Option<Credentials>> {
        if !credentials.is_empty() {
            log::warn!("Unexpected credentials provided for Georisques Connector");
        }
        Ok(None)
    }

    async fn load_from_state(&self) -> Result<Vec<DocumentBatch>> {
        let mut to_visit: Vec<Url> = self.start_urls.clone();
        if to_visit.is_empty() {
            return Err(Error::config("No URLs to visit"));
        }

        let mut visited: HashSet<String> = HashSet::new();
        let mut batches: Vec<DocumentBatch> = Vec::new();
        let mut batch: DocumentBatch = Vec::new();
        let mut loaded_count = 0usize;
        let mut at_least_one_doc = false;
        let mut last_error: Option<String> = None;

        while let Some(url) = to_visit.pop() {
            loaded_count += 1;
            if loaded_count > self.max_pages {
                log::warn!(
                    "Stopping after visiting {} URLs to avoid infinite loops",
                    self.max_pages
                );
                break;
            }

            if !visited.insert(url.to_string()) {
                continue;
            }

            let document = match self.fetch(&url).await {
                Ok(Page::Html(body)) => {
                    for link in pdf_links(&body, &url) {
                        if !visited.contains(link.as_str()) {
                            to_visit.push(link);
                        }
                    }
                    Self::html_document(&url, &body)
                }
                Ok(Page::Pdf) => Self::pdf_document(&url),
                Err(e) => {
                    let message = format!("Failed to fetch '{url}': {e}");
                    log::error!("{message}");
                    last_error = Some(message);
                    continue;
                }
            };

            log::debug!("Loaded '{}' ({})", document.semantic_identifier, url);
            batch.push(document);
            at_least_one_doc = true;

            if batch.len() >= self.batch_size {
                batches.push(std::mem::take(&mut batch));
            }
        }

        if !batch.is_empty() {
            batches.push(batch);
        }

        if !at_least_one_doc {
            return Err(Error::crawl(
                last_error.unwrap_or_else(|| "No valid pages found.".to_string()),
            ));
        }

        log::info!(
            "Georisques crawl finished: {} documents in {} batches",
            batches.iter().map(Vec::len).sum::<usize>(),
            batches.len()
        );
        Ok(batches)
    }
}
