#![deny(missing_docs)]

//! # Operation Extractor
//!
//! Looks up a single operation by method and exact path template and returns
//! it with every reachable `$ref` expanded, so a consumer gets the complete
//! contract of one endpoint in one JSON object.

use crate::document::{ApiDocument, HttpMethod};
use crate::error::{AppError, AppResult};
use crate::resolver::RefResolver;
use serde_json::{Map, Value};

/// Returns the resolved operation for `method` (any case) and `path` (verbatim template).
///
/// The result carries `method` (upper-cased) and `path` ahead of the operation's own fields.
///
/// # Errors
///
/// [`AppError::OperationNotFound`] if the path is absent, the method is not bound
/// under it, or `method` is not an HTTP method at all.
pub fn get_operation_spec(document: &ApiDocument, method: &str, path: &str) -> AppResult<Value> {
    let not_found = || AppError::OperationNotFound {
        method: method.to_uppercase(),
        path: path.to_string(),
    };

    let method: HttpMethod = method.parse().map_err(|_| not_found())?;
    let entry = document
        .find_operation(method, path)
        .ok_or_else(not_found)?;

    let resolved = RefResolver::new(document).resolve(entry.operation);

    let mut out = Map::new();
    out.insert("method".to_string(), Value::String(method.as_upper().to_string()));
    out.insert("path".to_string(), Value::String(entry.path.to_string()));
    if let Value::Object(fields) = resolved {
        for (key, value) in fields {
            if key != "method" && key != "path" {
                out.insert(key, value);
            }
        }
    }
    Ok(Value::Object(out))
}
