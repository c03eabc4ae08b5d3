//! Command-line arguments.

use clap::{Args, Parser, Subcommand};

/// DeepBrain: ask questions about French public open data
#[derive(Parser, Debug)]
#[command(name = "deepbrain", version)]
#[command(about = "Conversational search over French public open data", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl Géorisques and build the search index
    Crawl(CrawlArgs),
    /// Search the index
    Search(SearchArgs),
    /// Ask a single question
    Ask {
        /// The question, in French
        question: String,
    },
    /// Start an interactive conversation
    Chat,
    /// Inspect or edit the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options of `crawl`.
#[derive(Args, Debug, Default)]
pub struct CrawlArgs {
    /// Start page, instead of `crawler.base_url`
    #[arg(long)]
    pub url: Option<String>,

    /// Documents per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Index directory
    #[arg(long)]
    pub index: Option<String>,

    /// Rebuild even if the content did not change
    #[arg(long)]
    pub force: bool,
}

/// Options of `search`.
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Search terms
    pub query: String,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Only return documents from this source
    #[arg(short, long)]
    pub source: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print a value by dotted key (e.g. `search.default_limit`)
    Get {
        /// Dotted key
        key: String,
    },
    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value; booleans and numbers are detected
        value: String,
    },
    /// Write a default config file
    Init {
        /// Where to write, instead of the default location
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration as environment variables
    Export {
        /// Format as `--env` flags for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_crawl() {
        let cli = Cli::try_parse_from([
            "deepbrain",
            "-v",
            "crawl",
            "--max-pages",
            "10",
            "--index",
            "/tmp/idx",
            "--force",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Crawl(args) => {
                assert_eq!(args.max_pages, Some(10));
                assert_eq!(args.index.as_deref(), Some("/tmp/idx"));
                assert!(args.force);
                assert!(args.url.is_none());
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "deepbrain",
            "search",
            "risque inondation",
            "--limit",
            "3",
            "--json",
            "--config",
            "/etc/deepbrain.toml",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/etc/deepbrain.toml"));
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "risque inondation");
                assert_eq!(args.limit, Some(3));
                assert!(args.json);
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["deepbrain", "config", "set", "search.default_limit", "5"])
                .unwrap();
        match cli.command {
            Command::Config { action } => assert_eq!(
                action,
                ConfigAction::Set {
                    key: "search.default_limit".to_string(),
                    value: "5".to_string(),
                }
            ),
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["deepbrain", "ask"]).is_err());
    }
}
