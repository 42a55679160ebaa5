#![deny(missing_docs)]

//! # Document Sources
//!
//! Where a host gets "the current schema document" from. Every call to
//! [`DocumentSource::load`] produces a fresh document so that a long-running
//! server always describes the live API rather than a snapshot taken at boot.

use crate::document::ApiDocument;
use crate::error::AppResult;
use std::path::PathBuf;

/// Supplies the schema document on demand.
pub trait DocumentSource: Send + Sync {
    /// Loads the current document.
    fn load(&self) -> AppResult<ApiDocument>;

    /// Human readable origin, for logs.
    fn describe(&self) -> String;
}

/// Re-reads a JSON or YAML file on every load.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source for `path`; the file is not touched until [`DocumentSource::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn load(&self) -> AppResult<ApiDocument> {
        ApiDocument::from_path(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A fixed in-memory document.
#[derive(Debug, Clone)]
pub struct StaticSource {
    document: ApiDocument,
}

impl StaticSource {
    /// Wraps `document`.
    pub fn new(document: ApiDocument) -> Self {
        Self { document }
    }
}

impl DocumentSource for StaticSource {
    fn load(&self) -> AppResult<ApiDocument> {
        Ok(self.document.clone())
    }

    fn describe(&self) -> String {
        "in-memory document".to_string()
    }
}
