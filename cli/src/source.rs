#![deny(missing_docs)]

//! # Spec Locations
//!
//! Turns the `--spec` argument into a [`DocumentSource`]: local files are
//! re-read on every request, `http(s)://` URLs are fetched (with the `client`
//! feature).

use llms_txt_core::{DocumentSource, FileSource};
#[cfg(feature = "client")]
use llms_txt_core::{ApiDocument, AppError, AppResult};
use std::sync::Arc;

#[cfg(not(feature = "client"))]
use crate::error::{CliError, CliResult};
#[cfg(feature = "client")]
use crate::error::CliResult;

/// True for `http://` and `https://` locations.
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Picks the source implementation for `location`.
pub fn open_source(location: &str) -> CliResult<Arc<dyn DocumentSource>> {
    if is_remote(location) {
        #[cfg(feature = "client")]
        {
            return Ok(Arc::new(UrlSource::new(location)));
        }
        #[cfg(not(feature = "client"))]
        {
            return Err(CliError::General(format!(
                "Cannot fetch {}: built without the `client` feature",
                location
            )));
        }
    }
    Ok(Arc::new(FileSource::new(location)))
}

/// Fetches the document over HTTP on every load.
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: String,
}

#[cfg(feature = "client")]
impl UrlSource {
    /// Creates a source for `url`; nothing is fetched until [`DocumentSource::load`].
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(feature = "client")]
impl DocumentSource for UrlSource {
    fn load(&self) -> AppResult<ApiDocument> {
        tracing::debug!(url = %self.url, "Fetching schema document");
        let mut response = ureq::get(self.url.as_str())
            .call()
            .map_err(|e| AppError::General(format!("Failed to fetch {}: {}", self.url, e)))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AppError::General(format!("Failed to read {}: {}", self.url, e)))?;
        ApiDocument::from_str_guess(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
