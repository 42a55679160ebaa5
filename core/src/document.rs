#![deny(missing_docs)]

//! # API Document
//!
//! The in-memory OpenAPI document every renderer and extractor call walks.
//!
//! The document is kept as a raw `serde_json::Value` (with `preserve_order`) so
//! that the Operation Extractor can hand back every field of an operation,
//! including extensions this crate knows nothing about. Typed views over the
//! parts the renderer needs live in [`crate::model`].

use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// HTTP methods an OpenAPI path item may bind an operation to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `TRACE`
    Trace,
}

impl HttpMethod {
    /// All methods, in the order the OpenAPI path item object lists them.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// The lower-case key used inside a path item (`get`, `post`, ...).
    pub fn as_key(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// The upper-case wire form (`GET`, `POST`, ...).
    pub fn as_upper(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    /// Case-insensitive parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_key().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::General(format!("Unknown HTTP method: {}", s)))
    }
}

/// Title and description from the `info` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    /// `info.title`, if present and non-empty.
    pub title: Option<String>,
    /// `info.description`, if present and non-empty.
    pub description: Option<String>,
}

/// One `(path, method, operation)` triple found while walking `paths`.
#[derive(Debug, Clone, Copy)]
pub struct OperationEntry<'a> {
    /// Path template, e.g. `/users/{user_id}`.
    pub path: &'a str,
    /// The method key the operation sits under.
    pub method: HttpMethod,
    /// The enclosing path item (for path-level parameters).
    pub path_item: &'a Value,
    /// The raw operation object.
    pub operation: &'a Value,
}

/// An OpenAPI document held as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocument {
    raw: Value,
}

impl ApiDocument {
    /// Wraps an already parsed value.
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Parses JSON text.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        let raw: Value = serde_json::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;
        Ok(Self::from_value(raw))
    }

    /// Parses YAML text. Since YAML is a superset of JSON this also accepts JSON.
    ///
    /// Unquoted status codes (`200:`) are YAML integers; they are stringified so the
    /// document reads the same as its JSON form.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
        Ok(Self::from_value(yaml_to_json(yaml)))
    }

    /// Parses text whose format is unknown: JSON if it looks like JSON, YAML otherwise.
    pub fn from_str_guess(content: &str) -> AppResult<Self> {
        if content.trim_start().starts_with('{') {
            Self::from_json_str(content)
        } else {
            Self::from_yaml_str(content)
        }
    }

    /// Reads a document from disk, choosing the parser by file extension.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_str_guess(&content),
        }
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Title and description; empty strings count as absent.
    pub fn info(&self) -> Info {
        let info = self.raw.get("info");
        let text = |key: &str| {
            info.and_then(|i| i.get(key))
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };
        Info {
            title: text("title"),
            description: text("description"),
        }
    }

    /// The `paths` mapping, if present.
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.raw.get("paths").and_then(Value::as_object)
    }

    /// The `components` mapping, if present.
    pub fn components(&self) -> Option<&Map<String, Value>> {
        self.raw.get("components").and_then(Value::as_object)
    }

    /// Every operation in path insertion order, then method order within the path item.
    ///
    /// Non-operation keys of a path item (`parameters`, `summary`, `servers`, ...) are skipped.
    pub fn operations(&self) -> Vec<OperationEntry<'_>> {
        let Some(paths) = self.paths() else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        for (path, path_item) in paths {
            let Some(item) = path_item.as_object() else {
                continue;
            };
            for (key, operation) in item {
                let Ok(method) = key.parse::<HttpMethod>() else {
                    continue;
                };
                if !operation.is_object() {
                    continue;
                }
                entries.push(OperationEntry {
                    path,
                    method,
                    path_item,
                    operation,
                });
            }
        }
        entries
    }

    /// Finds the operation bound to `method` under the exact path template `path`.
    pub fn find_operation(&self, method: HttpMethod, path: &str) -> Option<OperationEntry<'_>> {
        let (path, path_item) = self.paths()?.get_key_value(path)?;
        let operation = path_item
            .as_object()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(method.as_key()))
            .map(|(_, op)| op)
            .filter(|op| op.is_object())?;
        Some(OperationEntry {
            path,
            method,
            path_item,
            operation,
        })
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64().map(Value::from).unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
