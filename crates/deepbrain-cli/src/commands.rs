//! Implementations of the `crawl`, `search`, `ask` and `chat` commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use deepbrain_chat::{AssistantAnswer, Conversation, SearchAssistant};
use deepbrain_connectors::{GeorisquesConnector, LoadConnector};
use deepbrain_fts::{
    IndexBuilder, IndexStats, SearchBackend, SearchParams, SearchResults, create_search_backend,
    load_snapshot,
};
use deepbrain_llm::{AlbertProvider, LlmProvider, RetryWrapper};

use crate::cli::{CrawlArgs, SearchArgs};
use crate::config::DeepBrainConfig;

/// Leaves the interactive loop.
pub const QUIT_COMMAND: &str = "/quit";

/// Starts a new conversation.
pub const RESET_COMMAND: &str = "/reset";

// ============================================================================
// crawl
// ============================================================================

/// Crawl Géorisques and (re)build the index.
pub async fn crawl(config: &DeepBrainConfig, args: CrawlArgs) -> Result<IndexStats> {
    let base_url = args.url.unwrap_or_else(|| config.crawler.base_url.clone());
    let batch_size = args.batch_size.unwrap_or(config.crawler.batch_size);
    let max_pages = args.max_pages.unwrap_or(config.crawler.max_pages);
    let index_path = match args.index {
        Some(path) => PathBuf::from(path),
        None => resolve_index_path(config)?,
    };

    let connector =
        GeorisquesConnector::new(&base_url, "single", batch_size)?.with_max_pages(max_pages);
    tracing::info!(%base_url, max_pages, "Starting crawl");

    let batches = connector.load_from_state().await?;
    let documents: usize = batches.iter().map(Vec::len).sum();
    tracing::info!(documents, batches = batches.len(), "Crawl finished");

    let mut builder = IndexBuilder::new();
    if args.force {
        builder = builder.force_rebuild();
    }
    let target = index_path.clone();
    let stats = tokio::task::spawn_blocking(move || builder.build(&batches, &target))
        .await
        .context("Index build task failed")??;

    println!("{}", format_stats(&stats, &index_path));
    Ok(stats)
}

/// One-line summary of a build.
pub fn format_stats(stats: &IndexStats, index_path: &Path) -> String {
    if stats.skipped_fresh {
        format!(
            "Index at {} is up to date ({} documents)",
            index_path.display(),
            stats.documents_indexed
        )
    } else {
        format!(
            "Indexed {} documents ({} bytes, {} errors) into {}",
            stats.documents_indexed,
            stats.bytes_processed,
            stats.errors,
            index_path.display()
        )
    }
}

// ============================================================================
// search
// ============================================================================

/// Query the index.
pub async fn search(config: &DeepBrainConfig, args: &SearchArgs) -> Result<SearchResults> {
    let backend = open_search_backend(config).await?;
    let params = SearchParams {
        query: args.query.clone(),
        limit: Some(args.limit.unwrap_or(config.search.default_limit)),
        source: args.source.clone(),
        ..Default::default()
    };
    Ok(backend.search(params).await?)
}

/// Human-readable result list.
pub fn format_results(results: &SearchResults) -> String {
    if results.items.is_empty() {
        return "No results.".to_string();
    }

    let mut out = format!(
        "{} result(s) of {} ({})\n",
        results.items.len(),
        results.total,
        results.backend
    );
    for (i, item) in results.items.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} [{:.2}]\n   {}\n",
            i + 1,
            item.title,
            item.relevance,
            item.link
        ));
        if let Some(snippet) = &item.snippet {
            out.push_str(&format!("   {snippet}\n"));
        }
    }
    out
}

/// Search backend over the configured index.
///
/// Falls back to a linear scan of the document snapshot when no Tantivy
/// index can be opened.
pub async fn open_search_backend(config: &DeepBrainConfig) -> Result<Arc<dyn SearchBackend>> {
    let index_path = resolve_index_path(config)?;
    let mut search_config = config.search.clone();
    search_config.index_path = Some(index_path.display().to_string());

    let fallback = load_snapshot(&index_path)?;
    let backend = create_search_backend(&search_config, fallback).await?;
    tracing::debug!(backend = backend.name(), index = %index_path.display(), "Search backend ready");
    Ok(Arc::from(backend))
}

fn resolve_index_path(config: &DeepBrainConfig) -> Result<PathBuf> {
    config
        .index_path()
        .ok_or_else(|| anyhow!("Could not determine the index directory; set search.index_path"))
}

// ============================================================================
// ask / chat
// ============================================================================

/// Albert behind a retry wrapper.
pub fn albert_provider(config: &DeepBrainConfig) -> Result<Arc<dyn LlmProvider>> {
    let albert = AlbertProvider::new(config.albert.clone())?;
    if config.albert.api_key.is_none() {
        tracing::warn!("No Albert API key configured; set ALBERT_API_KEY");
    }
    Ok(Arc::new(RetryWrapper::new(Arc::new(albert))))
}

/// Assistant wired to Albert and the configured index.
pub async fn build_assistant(config: &DeepBrainConfig) -> Result<SearchAssistant> {
    let llm = albert_provider(config)?;
    let search = open_search_backend(config).await?;
    Ok(SearchAssistant::new(llm, search, config.chat.clone()))
}

/// Answer followed by the numbered sources.
pub fn format_answer(answer: &AssistantAnswer) -> String {
    let mut out = answer.answer.trim().to_string();
    if !answer.citations.is_empty() {
        out.push_str("\n\nSources :");
        for (i, citation) in answer.citations.iter().enumerate() {
            out.push_str(&format!("\n[{}] {} - {}", i + 1, citation.title, citation.link));
        }
    }
    out
}

/// Read questions line by line and write answers until `/quit` or EOF.
///
/// A failed question is reported and the loop continues.
pub async fn run_chat<R, W>(assistant: &SearchAssistant, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut conversation = Conversation::new();
    let mut lines = input.lines();

    writeln!(
        output,
        "DeepBrain. Posez votre question ({RESET_COMMAND} pour recommencer, {QUIT_COMMAND} pour quitter)."
    )?;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            QUIT_COMMAND => break,
            RESET_COMMAND => {
                conversation.reset();
                writeln!(output, "Nouvelle conversation.")?;
            }
            question => match assistant.ask(&mut conversation, question).await {
                Ok(answer) => writeln!(output, "{}\n", format_answer(&answer))?,
                Err(e) => {
                    tracing::error!(error = %e, "Question failed");
                    writeln!(output, "Erreur : {e}\n")?;
                }
            },
        }
    }

    tracing::debug!(conversation_id = %conversation.id(), turns = conversation.len(), "Chat ended");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use deepbrain_chat::{ChatConfig, Citation, ConversationId};
    use deepbrain_fts::{SearchConfig, SearchDocument, SearchResult, SimpleSearch};
    use deepbrain_llm::MockLlmProvider;

    fn assistant(llm: Arc<MockLlmProvider>) -> SearchAssistant {
        let docs = vec![
            SearchDocument::builder()
                .id("https://www.georisques.gouv.fr/risques/seismes")
                .title("Séismes")
                .content("La France métropolitaine est découpée en cinq zones de sismicité.")
                .source("georisques")
                .build(),
        ];
        let search = SimpleSearch::new(&SearchConfig::default()).with_documents(docs);
        SearchAssistant::new(llm, Arc::new(search), ChatConfig::default())
    }

    #[test]
    fn test_format_answer_lists_sources() {
        let answer = AssistantAnswer {
            conversation_id: ConversationId::new(),
            answer: "Cinq zones [1].\n".to_string(),
            citations: vec![Citation {
                title: "Séismes".to_string(),
                link: "https://g.fr/seismes".to_string(),
                source: "georisques".to_string(),
            }],
            grounded: true,
        };
        assert_eq!(
            format_answer(&answer),
            "Cinq zones [1].\n\nSources :\n[1] Séismes - https://g.fr/seismes"
        );
    }

    #[test]
    fn test_format_answer_without_sources() {
        let answer = AssistantAnswer {
            conversation_id: ConversationId::new(),
            answer: "Je ne sais pas.".to_string(),
            citations: Vec::new(),
            grounded: false,
        };
        assert_eq!(format_answer(&answer), "Je ne sais pas.");
    }

    #[test]
    fn test_format_results() {
        let results = SearchResults {
            items: vec![SearchResult {
                id: "a".to_string(),
                title: "Séismes".to_string(),
                link: "https://g.fr/seismes".to_string(),
                source: "georisques".to_string(),
                snippet: Some("cinq zones".to_string()),
                relevance: 1.5,
                content_type: None,
            }],
            total: 4,
            backend: "tantivy".to_string(),
        };
        let text = format_results(&results);
        assert!(text.starts_with("1 result(s) of 4 (tantivy)"));
        assert!(text.contains("1. Séismes [1.50]"));
        assert!(text.contains("   cinq zones"));

        assert_eq!(format_results(&SearchResults::empty("simple")), "No results.");
    }

    #[test]
    fn test_format_stats() {
        let stats = IndexStats {
            documents_indexed: 12,
            skipped_fresh: true,
            ..Default::default()
        };
        assert!(format_stats(&stats, Path::new("/idx")).contains("up to date"));
    }

    #[tokio::test]
    async fn test_search_uses_snapshot_without_index() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("index");
        let docs = vec![
            SearchDocument::builder()
                .id("https://www.georisques.gouv.fr/risques/radon")
                .title("Radon")
                .content("Le radon est un gaz radioactif naturel.")
                .source("georisques")
                .build(),
        ];
        deepbrain_fts::save_snapshot(&index_path, &docs).unwrap();

        let mut config = DeepBrainConfig::default();
        config.search.backend = "simple".to_string();
        config.search.index_path = Some(index_path.display().to_string());

        let args = SearchArgs {
            query: "radon".to_string(),
            ..Default::default()
        };
        let results = search(&config, &args).await.unwrap();
        assert_eq!(results.backend, "simple");
        assert_eq!(results.items.len(), 1);
        assert_eq!(results.items[0].title, "Radon");
    }

    #[tokio::test]
    async fn test_chat_loop() {
        let llm = Arc::new(MockLlmProvider::new(vec![
            "Cinq zones [1].".to_string(),
            "Je ne sais pas.".to_string(),
        ]));
        let assistant = assistant(llm.clone());
        let input: &[u8] = b"sismicit\xc3\xa9\n\n/reset\nQui gouverne ?\n/quit\nignored\n";
        let mut output = Vec::new();

        run_chat(&assistant, input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Cinq zones [1]."));
        assert!(text.contains("[1] Séismes - https://www.georisques.gouv.fr/risques/seismes"));
        assert!(text.contains("Nouvelle conversation."));
        assert!(text.contains("Je ne sais pas."));
        assert_eq!(llm.call_count(), 2);

        // The reset dropped the first exchange from the history.
        let request = llm.last_request().unwrap();
        assert_eq!(request.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_chat_reports_errors_and_continues() {
        let llm = Arc::new(MockLlmProvider::new(Vec::new()));
        let assistant = assistant(llm.clone());
        let input: &[u8] = b"premiere\n";
        let mut output = Vec::new();

        run_chat(&assistant, input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Erreur :"));
    }
}
