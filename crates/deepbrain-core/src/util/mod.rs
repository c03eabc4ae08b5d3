//! Utility modules.
//!
//! - [`urls`]: URL string helpers (fragments, file names, PDF detection)

pub mod urls;
