//! # deepbrain-cli
//!
//! Command-line front end for DeepBrain:
//! - `crawl`: fetch Géorisques pages and build the search index
//! - `search`: query the index
//! - `ask` / `chat`: retrieval-augmented answers from Albert
//! - `config`: inspect and edit the TOML configuration

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction};
pub use config::DeepBrainConfig;
