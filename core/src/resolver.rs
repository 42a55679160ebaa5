#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Expands local `$ref` pointers (`#/components/<section>/<Name>`) in place.
//!
//! Cycle detection uses the chain of references currently being expanded, not
//! every reference seen so far: two sibling properties that both point at
//! `Address` are not a cycle, `User.friends -> User` is.
//!
//! Dangling pointers (unknown names, external documents, non-component
//! pointers) are left untouched so one bad reference never breaks a render.

use crate::document::ApiDocument;
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

/// Upper bound on `$ref -> $ref -> ...` hops followed by [`RefResolver::deref`].
const MAX_DEREF_HOPS: usize = 32;

/// A component a `$ref` points at.
#[derive(Debug, Clone, PartialEq)]
pub struct Component<'a> {
    /// Section under `components` (`schemas`, `parameters`, ...).
    pub section: String,
    /// Key of the component inside its section, pointer-decoded.
    pub name: String,
    /// The component itself.
    pub value: &'a Value,
}

impl Component<'_> {
    fn chain_key(&self) -> String {
        format!("{}/{}", self.section, self.name)
    }
}

/// Resolves `$ref` pointers against one document's `components`.
#[derive(Debug, Clone, Copy)]
pub struct RefResolver<'a> {
    components: Option<&'a Map<String, Value>>,
}

impl<'a> RefResolver<'a> {
    /// Creates a resolver over `document.components`.
    pub fn new(document: &'a ApiDocument) -> Self {
        Self {
            components: document.components(),
        }
    }

    /// Looks up the component `pointer` refers to.
    ///
    /// Returns `None` for dangling or non-local pointers.
    pub fn lookup(&self, pointer: &str) -> Option<Component<'a>> {
        let (section, name) = split_component_pointer(pointer)?;
        let value = self.components?.get(&section)?.as_object()?.get(&name)?;
        Some(Component {
            section,
            name,
            value,
        })
    }

    /// Follows a chain of `$ref` objects until reaching a non-reference.
    ///
    /// Used for parameter, request body and response objects, whose sibling keys
    /// carry no meaning. Returns the input itself if it is not a resolvable reference.
    pub fn deref<'v>(&self, value: &'v Value) -> &'v Value
    where
        'a: 'v,
    {
        let mut current = value;
        for _ in 0..MAX_DEREF_HOPS {
            let Some(pointer) = ref_pointer(current) else {
                return current;
            };
            match self.lookup(pointer) {
                Some(target) => current = target.value,
                None => return current,
            }
        }
        tracing::debug!("Giving up on reference chain longer than {}", MAX_DEREF_HOPS);
        current
    }

    /// Returns a copy of `fragment` with every resolvable `$ref` expanded.
    pub fn resolve(&self, fragment: &Value) -> Value {
        let mut ancestors = Vec::new();
        self.resolve_inner(fragment, &mut ancestors)
    }

    fn resolve_inner(&self, fragment: &Value, ancestors: &mut Vec<String>) -> Value {
        match fragment {
            Value::Object(map) => match map.get("$ref").and_then(Value::as_str) {
                Some(pointer) => self.resolve_reference(pointer, map, ancestors),
                None => Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), self.resolve_inner(v, ancestors)))
                        .collect(),
                ),
            },
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_inner(item, ancestors))
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }

    fn resolve_reference(
        &self,
        pointer: &str,
        node: &Map<String, Value>,
        ancestors: &mut Vec<String>,
    ) -> Value {
        let Some(target) = self.lookup(pointer) else {
            tracing::debug!(pointer, "Leaving dangling $ref unresolved");
            return Value::Object(node.clone());
        };

        let key = target.chain_key();
        let mut resolved = if ancestors.contains(&key) {
            tracing::debug!(pointer, "Reference cycle, emitting placeholder");
            recursion_placeholder(target.name)
        } else {
            ancestors.push(key);
            let expanded = self.resolve_inner(target.value, ancestors);
            ancestors.pop();
            expanded
        };

        let siblings = node.iter().filter(|(k, _)| k.as_str() != "$ref");
        match resolved.as_object_mut() {
            Some(out) => {
                for (key, sibling) in siblings {
                    out.insert(key.clone(), self.resolve_inner(sibling, ancestors));
                }
                resolved
            }
            // A component that is not an object (`true`, `false`) cannot take siblings.
            None => resolved,
        }
    }
}

/// Resolves every reachable `$ref` in `fragment` against `document`.
///
/// Starts with an empty ancestor chain; see [`RefResolver::resolve`].
pub fn resolve_schema_refs(document: &ApiDocument, fragment: &Value) -> Value {
    RefResolver::new(document).resolve(fragment)
}

/// The `$ref` string of a reference object, if `value` is one.
pub fn ref_pointer(value: &Value) -> Option<&str> {
    value.get("$ref").and_then(Value::as_str)
}

/// The bare component name a pointer ends in (`#/components/schemas/User` -> `User`).
///
/// Falls back to the last path segment for pointers this crate cannot resolve.
pub fn ref_name(pointer: &str) -> String {
    match split_component_pointer(pointer) {
        Some((_, name)) => name,
        None => {
            let last = pointer.rsplit(['/', '#']).next().unwrap_or(pointer);
            decode_pointer_segment(last)
        }
    }
}

/// Splits `#/components/{section}/{name}` into decoded `(section, name)`.
pub(crate) fn split_component_pointer(pointer: &str) -> Option<(String, String)> {
    let local = pointer.strip_prefix("#/")?;
    let segments: Vec<&str> = local.split('/').collect();
    if segments.len() != 3 || segments[0] != "components" {
        return None;
    }

    let section = decode_pointer_segment(segments[1]);
    let name = decode_pointer_segment(segments[2]);
    if section.is_empty() || name.is_empty() {
        None
    } else {
        Some((section, name))
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn recursion_placeholder(name: String) -> Value {
    let mut placeholder = Map::new();
    placeholder.insert("type".to_string(), Value::String("object".to_string()));
    placeholder.insert("title".to_string(), Value::String(name));
    Value::Object(placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(components: Value) -> ApiDocument {
        ApiDocument::from_value(json!({ "components": components }))
    }

    #[test]
    fn test_resolved_fragment_is_unchanged() {
        let document = doc(json!({"schemas": {}}));
        let fragment = json!({
            "type": "object",
            "properties": {"tags": {"type": "array", "items": {"type": "string"}}},
            "required": ["tags"]
        });
        assert_eq!(resolve_schema_refs(&document, &fragment), fragment);
    }

    #[test]
    fn test_nested_refs_resolve_transitively() {
        let document = doc(json!({"schemas": {
            "Address": {"type": "object", "properties": {"city": {"type": "string"}}},
            "User": {"type": "object", "properties": {"address": {"$ref": "#/components/schemas/Address"}}}
        }}));
        let resolved =
            resolve_schema_refs(&document, &json!({"$ref": "#/components/schemas/User"}));
        assert_eq!(
            resolved,
            json!({"type": "object", "properties": {"address": {
                "type": "object", "properties": {"city": {"type": "string"}}
            }}})
        );
    }

    #[test]
    fn test_self_reference_terminates_with_placeholder() {
        let document = doc(json!({"schemas": {
            "Node": {"type": "object", "properties": {
                "value": {"type": "integer"},
                "next": {"$ref": "#/components/schemas/Node"}
            }}
        }}));
        let resolved =
            resolve_schema_refs(&document, &json!({"$ref": "#/components/schemas/Node"}));
        assert_eq!(
            resolved["properties"]["next"],
            json!({"type": "object", "title": "Node"})
        );
        assert_eq!(resolved["properties"]["value"], json!({"type": "integer"}));
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let document = doc(json!({"schemas": {
            "A": {"type": "object", "properties": {"b": {"$ref": "#/components/schemas/B"}}},
            "B": {"type": "object", "properties": {"a": {"$ref": "#/components/schemas/A"}}}
        }}));
        let resolved = resolve_schema_refs(&document, &json!({"$ref": "#/components/schemas/A"}));
        assert_eq!(
            resolved["properties"]["b"]["properties"]["a"],
            json!({"type": "object", "title": "A"})
        );
    }

    #[test]
    fn test_siblings_referencing_same_schema_are_not_a_cycle() {
        let document = doc(json!({"schemas": {
            "Money": {"type": "object", "properties": {"amount": {"type": "number"}}}
        }}));
        let fragment = json!({"type": "object", "properties": {
            "price": {"$ref": "#/components/schemas/Money"},
            "tax": {"$ref": "#/components/schemas/Money"}
        }});
        let resolved = resolve_schema_refs(&document, &fragment);
        assert_eq!(resolved["properties"]["price"], resolved["properties"]["tax"]);
        assert!(resolved["properties"]["tax"]["properties"]["amount"].is_object());
    }

    #[test]
    fn test_dangling_ref_is_left_as_is() {
        let document = doc(json!({"schemas": {}}));
        let fragment = json!({"items": {"$ref": "#/components/schemas/Missing"}});
        assert_eq!(resolve_schema_refs(&document, &fragment), fragment);

        let external = json!({"$ref": "other.yaml#/components/schemas/User"});
        assert_eq!(resolve_schema_refs(&document, &external), external);
    }

    #[test]
    fn test_sibling_keys_override_target() {
        let document = doc(json!({"schemas": {
            "Role": {"type": "string", "description": "Role", "enum": ["admin", "user"]}
        }}));
        let resolved = resolve_schema_refs(
            &document,
            &json!({"$ref": "#/components/schemas/Role", "description": "Caller's role"}),
        );
        assert_eq!(resolved["description"], "Caller's role");
        assert_eq!(resolved["enum"], json!(["admin", "user"]));
        assert!(resolved.get("$ref").is_none());
    }

    #[test]
    fn test_other_component_sections_resolve() {
        let document = doc(json!({
            "parameters": {"Limit": {"name": "limit", "in": "query", "schema": {"$ref": "#/components/schemas/Count"}}},
            "schemas": {"Count": {"type": "integer"}}
        }));
        let fragment = json!([{"$ref": "#/components/parameters/Limit"}]);
        let resolved = resolve_schema_refs(&document, &fragment);
        assert_eq!(
            resolved,
            json!([{"name": "limit", "in": "query", "schema": {"type": "integer"}}])
        );
    }

    #[test]
    fn test_deref_follows_chains_and_stops_on_dangling() {
        let document = doc(json!({"responses": {
            "NotFound": {"$ref": "#/components/responses/Error"},
            "Error": {"description": "Error"}
        }}));
        let resolver = RefResolver::new(&document);
        let start = json!({"$ref": "#/components/responses/NotFound"});
        assert_eq!(resolver.deref(&start), &json!({"description": "Error"}));

        let dangling = json!({"$ref": "#/components/responses/Gone"});
        assert_eq!(resolver.deref(&dangling), &dangling);
    }

    #[test]
    fn test_ref_name_decodes_pointer_segments() {
        assert_eq!(ref_name("#/components/schemas/User"), "User");
        assert_eq!(ref_name("#/components/schemas/a~1b"), "a/b");
        assert_eq!(ref_name("#/components/schemas/User%20Profile"), "User Profile");
        assert_eq!(ref_name("https://example.com/defs.json#/Pet"), "Pet");
    }

    #[test]
    fn test_split_component_pointer_rejects_non_components() {
        assert!(split_component_pointer("#/paths/~1users").is_none());
        assert!(split_component_pointer("#/components/schemas").is_none());
        assert_eq!(
            split_component_pointer("#/components/schemas/User"),
            Some(("schemas".to_string(), "User".to_string()))
        );
    }
}
