//! DeepBrain Core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all DeepBrain
//! crates. It has no internal DeepBrain dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`document`]: Documents and sections produced by connectors
//! - [`traits`]: The [`ConfigManager`] configuration trait
//! - [`pitch`]: Evaluation criteria of the project pitch
//! - [`util`]: URL helpers

pub mod document;
pub mod error;
pub mod pitch;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use document::{Document, DocumentBatch, DocumentSource, Section};
pub use error::{Error, Result};
pub use traits::ConfigManager;
