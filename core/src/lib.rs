#![deny(missing_docs)]

//! # llms.txt Core
//!
//! Condenses an OpenAPI document into an LLM-friendly markdown summary
//! (`llms.txt`) and extracts single operations with all `$ref`s resolved.
//!
//! ```
//! use llms_txt_core::{generate_llms_txt, get_operation_spec, ApiDocument};
//!
//! let document = ApiDocument::from_yaml_str(r#"
//! info:
//!   title: Pets
//! paths:
//!   /pets:
//!     get:
//!       summary: List pets
//! "#).unwrap();
//!
//! let markdown = generate_llms_txt(&document, "/llms.txt");
//! assert!(markdown.contains("### `GET /pets` - List pets"));
//!
//! let operation = get_operation_spec(&document, "get", "/pets").unwrap();
//! assert_eq!(operation["method"], "GET");
//! ```

/// Shared error types.
pub mod error;

/// The raw OpenAPI document and HTTP methods.
pub mod document;

/// Typed views over operations, parameters, bodies and responses.
pub mod model;

/// `$ref` resolution.
pub mod resolver;

/// Resolved schema trees and type signatures.
pub mod schema;

/// Markdown rendering.
pub mod render;

/// Single operation extraction.
pub mod operation;

/// Document sources for hosts.
pub mod source;

pub use document::{ApiDocument, HttpMethod, Info, OperationEntry};
pub use error::{AppError, AppResult};
pub use operation::get_operation_spec;
pub use render::{
    generate_llms_txt, MarkdownRenderer, DEFAULT_GROUP, DEFAULT_MOUNT_PATH, DEFAULT_TITLE,
};
pub use resolver::{resolve_schema_refs, RefResolver};
pub use schema::{Schema, SchemaBuilder, SchemaKind};
pub use source::{DocumentSource, FileSource, StaticSource};
