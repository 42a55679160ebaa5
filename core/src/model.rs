#![deny(missing_docs)]

//! # Operation Models
//!
//! Serde views over the parts of an operation the renderer reads. Schema
//! fragments stay raw (`serde_json::Value`) and are turned into
//! [`crate::schema::Schema`] trees on demand, once references are in reach.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// An HTTP operation (subset).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Tags; the first one names the group.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short summary used in the heading.
    #[serde(default)]
    pub summary: Option<String>,
    /// Longer description, shown when there is no summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Parameters, possibly `$ref` objects.
    #[serde(default)]
    pub parameters: Vec<Value>,
    /// Request body, possibly a `$ref` object.
    #[serde(default)]
    pub request_body: Option<Value>,
    /// Status code (or `default`) to response, possibly `$ref` objects.
    #[serde(default)]
    pub responses: IndexMap<String, Value>,
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// `?name=value`; the implicit default.
    #[default]
    Query,
    /// `/users/{id}`
    Path,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamLocation::Query => "query",
            ParamLocation::Path => "path",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
        })
    }
}

/// A parameter object.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location (`in`).
    #[serde(rename = "in", default)]
    pub location: ParamLocation,
    /// Whether the parameter must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Schema fragment.
    #[serde(default)]
    pub schema: Option<Value>,
    /// Human description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A media type entry under `content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    /// Schema fragment of the payload.
    #[serde(default)]
    pub schema: Option<Value>,
}

/// A request body object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    /// Media type to payload description.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl RequestBody {
    /// The JSON payload schema, if any.
    pub fn json_schema(&self) -> Option<&Value> {
        json_media(&self.content)?.schema.as_ref()
    }
}

/// A response object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    /// Human description.
    #[serde(default)]
    pub description: Option<String>,
    /// Media type to payload description.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    /// The JSON payload schema, if any.
    pub fn json_schema(&self) -> Option<&Value> {
        json_media(&self.content)?.schema.as_ref()
    }
}

/// Picks `application/json`, falling back to parameterised or `+json` variants.
fn json_media(content: &IndexMap<String, MediaType>) -> Option<&MediaType> {
    content.get("application/json").or_else(|| {
        content
            .iter()
            .find(|(media, _)| {
                let essence = media.split(';').next().unwrap_or("").trim();
                essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
            })
            .map(|(_, m)| m)
    })
}

/// Chooses the response to summarise: `201`, then `200`, then the smallest
/// 2xx, then the smallest code; non-numeric keys only when nothing numeric exists.
pub fn primary_response_code<'r, I>(codes: I) -> Option<&'r str>
where
    I: IntoIterator<Item = &'r str>,
{
    let codes: Vec<&str> = codes.into_iter().collect();
    let numeric: Vec<(u16, &str)> = codes
        .iter()
        .filter_map(|code| code.trim().parse::<u16>().ok().map(|n| (n, *code)))
        .collect();

    for preferred in [201, 200] {
        if let Some((_, code)) = numeric.iter().find(|(n, _)| *n == preferred) {
            return Some(*code);
        }
    }
    if let Some((_, code)) = numeric
        .iter()
        .filter(|(n, _)| (200..300).contains(n))
        .min_by_key(|(n, _)| *n)
    {
        return Some(*code);
    }
    if let Some((_, code)) = numeric.iter().min_by_key(|(n, _)| *n) {
        return Some(*code);
    }
    codes.first().copied()
}
