//! Document connectors for DeepBrain.
//!
//! A connector fetches content from an open-data portal and turns it into
//! [`deepbrain_core::Document`]s grouped in batches.
//!
//! - [`connector`]: the [`LoadConnector`] trait
//! - [`html`]: HTML cleanup and PDF link extraction
//! - [`georisques`]: the Géorisques crawler

pub mod connector;
pub mod error;
pub mod georisques;
pub mod html;

pub use connector::{Credentials, LoadConnector};
pub use error::{Error, Result};
pub use georisques::{GeorisquesConnector, GeorisquesConnectorType};
pub use html::{ParsedHtml, pdf_links, web_html_cleanup};
