#![deny(missing_docs)]

//! # llms.txt Renderer
//!
//! Turns an [`ApiDocument`] into the condensed markdown summary:
//!
//! ```text
//! # Title
//!
//! > Description
//!
//! ## Tag
//!
//! ### `GET /users/{id}` - Summary
//!
//! - `id` (string, required) (path): User id
//!
//! **Returns** (200): User - Successful Response
//! - `name` (string, required): Full name
//!
//! [Detailed spec](/llms.txt/paths/GET/users/{id})
//! ```

use crate::document::{ApiDocument, OperationEntry};
use crate::model::{
    primary_response_code, Operation, ParamLocation, Parameter, RequestBody, Response,
};
use crate::resolver::RefResolver;
use crate::schema::{ObjectSchema, Schema, SchemaBuilder, SchemaKind};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Title used when `info.title` is missing or empty.
pub const DEFAULT_TITLE: &str = "API";

/// Group for operations without tags.
pub const DEFAULT_GROUP: &str = "Endpoints";

/// Mount path the CLI and server use unless told otherwise.
pub const DEFAULT_MOUNT_PATH: &str = "/llms.txt";

/// Renders the llms.txt markdown for `document`.
///
/// `mount_path` is where the host serves llms.txt; detail links point below it.
pub fn generate_llms_txt(document: &ApiDocument, mount_path: &str) -> String {
    MarkdownRenderer::new(document, mount_path).render()
}

/// Stateless renderer over one document.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer<'a> {
    document: &'a ApiDocument,
    resolver: RefResolver<'a>,
    schemas: SchemaBuilder<'a>,
    mount_path: &'a str,
}

struct Endpoint<'a> {
    entry: OperationEntry<'a>,
    operation: Operation,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates a renderer; nothing is walked until [`MarkdownRenderer::render`].
    pub fn new(document: &'a ApiDocument, mount_path: &'a str) -> Self {
        let resolver = RefResolver::new(document);
        Self {
            document,
            resolver,
            schemas: SchemaBuilder::new(resolver),
            mount_path,
        }
    }

    /// Produces the whole markdown document, newline terminated.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        self.render_header(&mut lines);

        for (group, endpoints) in self.grouped_endpoints() {
            lines.push(format!("## {}", group));
            lines.push(String::new());
            for endpoint in &endpoints {
                self.render_endpoint(endpoint, &mut lines);
            }
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn render_header(&self, lines: &mut Vec<String>) {
        let info = self.document.info();
        let title = info.title.as_deref().unwrap_or(DEFAULT_TITLE);
        lines.push(format!("# {}", title));
        lines.push(String::new());

        if let Some(description) = info.description.as_deref() {
            push_blockquote(description, lines);
            lines.push(String::new());
        }
    }

    /// Groups by first tag, keeping first-seen group order and document order inside a group.
    fn grouped_endpoints(&self) -> IndexMap<String, Vec<Endpoint<'a>>> {
        let mut groups: IndexMap<String, Vec<Endpoint<'a>>> = IndexMap::new();
        for entry in self.document.operations() {
            let operation: Operation = parse_or_default(entry.operation, "operation");
            let group = operation
                .tags
                .first()
                .filter(|t| !t.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| DEFAULT_GROUP.to_string());
            groups
                .entry(group)
                .or_default()
                .push(Endpoint { entry, operation });
        }
        groups
    }

    fn render_endpoint(&self, endpoint: &Endpoint<'_>, lines: &mut Vec<String>) {
        let Endpoint { entry, operation } = endpoint;
        tracing::trace!(method = %entry.method, path = entry.path, "Rendering operation");

        let summary = operation.summary.as_deref().filter(|s| !s.trim().is_empty());
        match summary {
            Some(summary) => {
                lines.push(format!("### `{} {}` - {}", entry.method, entry.path, summary))
            }
            None => lines.push(format!("### `{} {}`", entry.method, entry.path)),
        }
        lines.push(String::new());
        if summary.is_none() {
            let description = operation.description.as_deref();
            if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
                push_blockquote(description, lines);
                lines.push(String::new());
            }
        }

        let parameters = self.parameters(entry, operation);
        if !parameters.is_empty() {
            for param in &parameters {
                lines.push(self.parameter_line(param));
            }
            lines.push(String::new());
        }

        if let Some(body) = &operation.request_body {
            self.render_body(body, lines);
        }

        self.render_returns(operation, lines);

        lines.push(self.detail_link(entry));
        lines.push(String::new());
    }

    /// Operation parameters first, then path-level ones the operation does not override.
    fn parameters(&self, entry: &OperationEntry<'_>, operation: &Operation) -> Vec<Parameter> {
        let own: Vec<Parameter> = operation
            .parameters
            .iter()
            .filter_map(|p| self.parse_parameter(p))
            .collect();

        let shared = entry
            .path_item
            .get("parameters")
            .and_then(Value::as_array)
            .map(|params| {
                params
                    .iter()
                    .filter_map(|p| self.parse_parameter(p))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let mut params = own;
        for param in shared {
            let overridden = params
                .iter()
                .any(|p| p.name == param.name && p.location == param.location);
            if !overridden {
                params.push(param);
            }
        }
        params
    }

    fn parse_parameter(&self, raw: &Value) -> Option<Parameter> {
        let value = self.resolver.deref(raw);
        match serde_json::from_value(value.clone()) {
            Ok(param) => Some(param),
            Err(e) => {
                tracing::warn!("Skipping malformed parameter: {}", e);
                None
            }
        }
    }

    fn parameter_line(&self, param: &Parameter) -> String {
        let schema = param.schema.as_ref().map(|s| self.schemas.build(s));
        let ty = schema
            .as_ref()
            .map(Schema::signature)
            .unwrap_or_else(|| Schema::any_object().signature());
        let requirement = if param.required { "required" } else { "optional" };

        let mut line = format!("- `{}` ({}, {})", param.name, ty, requirement);
        if param.location != ParamLocation::Query {
            line.push_str(&format!(" ({})", param.location));
        }
        let description = param
            .description
            .as_deref()
            .or_else(|| schema.as_ref().and_then(|s| s.description.as_deref()));
        push_description(&mut line, description);
        line
    }

    fn render_body(&self, raw: &Value, lines: &mut Vec<String>) {
        let body: RequestBody = parse_or_default(self.resolver.deref(raw), "request body");
        let Some(fragment) = body.json_schema() else {
            return;
        };
        let schema = self.schemas.build(fragment);

        match &schema.kind {
            SchemaKind::Object(obj) => {
                lines.push("**Body**:".to_string());
                field_lines(obj, 0, lines);
            }
            _ => {
                lines.push(format!("**Body**: {}", schema.signature()));
                if let Some(obj) = schema.expandable_object() {
                    field_lines(obj, 0, lines);
                }
            }
        }
        lines.push(String::new());
    }

    fn render_returns(&self, operation: &Operation, lines: &mut Vec<String>) {
        let Some(code) = primary_response_code(operation.responses.keys().map(String::as_str))
        else {
            return;
        };
        let Some(raw) = operation.responses.get(code) else {
            return;
        };

        let response: Response = parse_or_default(self.resolver.deref(raw), "response");
        let schema = response.json_schema().map(|s| self.schemas.build(s));
        let ty = schema.as_ref().map(Schema::signature);
        let description = response
            .description
            .as_deref()
            .map(single_line)
            .filter(|d| !d.is_empty());

        let line = match (ty, description) {
            (Some(ty), Some(desc)) => format!("**Returns** ({}): {} - {}", code, ty, desc),
            (Some(ty), None) => format!("**Returns** ({}): {}", code, ty),
            (None, Some(desc)) => format!("**Returns** ({}): {}", code, desc),
            (None, None) => format!("**Returns** ({})", code),
        };
        lines.push(line);
        if let Some(obj) = schema.as_ref().and_then(Schema::expandable_object) {
            field_lines(obj, 0, lines);
        }
        lines.push(String::new());
    }

    fn detail_link(&self, entry: &OperationEntry<'_>) -> String {
        format!(
            "[Detailed spec]({}/paths/{}/{})",
            self.mount_path.trim_end_matches('/'),
            entry.method,
            entry.path.strip_prefix('/').unwrap_or(entry.path)
        )
    }
}

/// One list item per property, nested objects indented beneath their field.
fn field_lines(obj: &ObjectSchema, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (name, schema) in &obj.properties {
        let requirement = if obj.is_required(name) { "required" } else { "optional" };
        let mut line = format!("{}- `{}` ({}, {})", indent, name, schema.signature(), requirement);
        push_description(&mut line, schema.description.as_deref());
        lines.push(line);

        if let Some(nested) = schema.expandable_object() {
            field_lines(nested, depth + 1, lines);
        }
    }
}

fn push_description(line: &mut String, description: Option<&str>) {
    if let Some(desc) = description.map(single_line).filter(|d| !d.is_empty()) {
        line.push_str(": ");
        line.push_str(&desc);
    }
}

fn push_blockquote(text: &str, lines: &mut Vec<String>) {
    for line in text.trim_end().lines() {
        lines.push(format!("> {}", line).trim_end().to_string());
    }
}

/// Folds a multi-line description into one line for list items.
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_or_default<T: DeserializeOwned + Default>(value: &Value, what: &str) -> T {
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed {}: {}", what, e);
        T::default()
    })
}
