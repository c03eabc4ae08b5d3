//! DeepBrain CLI
//!
//! Conversational search over French public open data.

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use deepbrain_cli::commands;
use deepbrain_cli::config_handlers::handle_config_command;
use deepbrain_cli::{Cli, Command, DeepBrainConfig};
use deepbrain_core::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Config { action } => handle_config_command(config_path, action)?,
        Command::Crawl(args) => {
            let config = DeepBrainConfig::load(config_path)?;
            commands::crawl(&config, args).await?;
        }
        Command::Search(args) => {
            let config = DeepBrainConfig::load(config_path)?;
            let results = commands::search(&config, &args).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{}", commands::format_results(&results));
            }
        }
        Command::Ask { question } => {
            let config = DeepBrainConfig::load(config_path)?;
            let assistant = commands::build_assistant(&config).await?;
            let mut conversation = deepbrain_chat::Conversation::new();
            let answer = assistant.ask(&mut conversation, &question).await?;
            println!("{}", commands::format_answer(&answer));
        }
        Command::Chat => {
            let config = DeepBrainConfig::load(config_path)?;
            let assistant = commands::build_assistant(&config).await?;
            let input = BufReader::new(tokio::io::stdin());
            commands::run_chat(&assistant, input, &mut std::io::stdout()).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info,deepbrain=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
