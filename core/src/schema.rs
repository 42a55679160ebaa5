#![deny(missing_docs)]

//! # Schema Model
//!
//! A resolved, explicitly recursive view of a JSON Schema fragment.
//!
//! [`SchemaBuilder`] walks a raw fragment, following `$ref` pointers through a
//! [`RefResolver`] and remembering the component name each expansion came
//! from, so that the renderer can print `User` instead of `object`.
//! Recursion points and dangling pointers become [`SchemaKind::Ref`] leaves.

use crate::resolver::{ref_name, RefResolver};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A resolved schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Component name if this node was reached through a `$ref`.
    pub name: Option<String>,
    /// `description`, with a `$ref` node's own description taking precedence.
    pub description: Option<String>,
    /// What kind of value the schema describes.
    pub kind: SchemaKind,
}

/// The shape of a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// A reference left unexpanded: dangling, external, or a recursion point.
    Ref(String),
    /// A closed set of literal values.
    Enum(Vec<Value>),
    /// `type: array`.
    Array(Box<Schema>),
    /// `type: object` (or no type at all).
    Object(ObjectSchema),
    /// `anyOf` / `oneOf`.
    Union(Vec<Schema>),
    /// `string`, `integer`, `number`, `boolean`, `null`, or any other declared type.
    Primitive(String),
}

/// Properties of an object schema, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Field name to field schema.
    pub properties: IndexMap<String, Schema>,
    /// Names listed in `required`.
    pub required: Vec<String>,
}

impl ObjectSchema {
    /// Whether `field` is listed in `required`.
    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|r| r == field)
    }
}

impl Schema {
    fn new(kind: SchemaKind) -> Self {
        Self {
            name: None,
            description: None,
            kind,
        }
    }

    /// An object schema with no properties, the meaning of `{}`.
    pub fn any_object() -> Self {
        Self::new(SchemaKind::Object(ObjectSchema::default()))
    }

    /// Renders the compact type signature used in llms.txt lines.
    ///
    /// - `enum[a, b]` for enums
    /// - `array[T]` for arrays
    /// - the component name for named objects and unexpanded references
    /// - `A | B` for unions
    /// - the declared type otherwise, `object` when there is none
    pub fn signature(&self) -> String {
        match &self.kind {
            SchemaKind::Ref(name) => name.clone(),
            SchemaKind::Enum(values) => {
                let literals: Vec<String> = values.iter().map(literal).collect();
                format!("enum[{}]", literals.join(", "))
            }
            SchemaKind::Array(items) => format!("array[{}]", items.signature()),
            SchemaKind::Object(_) => self.name.clone().unwrap_or_else(|| "object".to_string()),
            SchemaKind::Union(variants) => {
                let parts: Vec<String> = variants.iter().map(Schema::signature).collect();
                parts.join(" | ")
            }
            SchemaKind::Primitive(ty) => ty.clone(),
        }
    }

    /// The object whose fields are worth listing beneath this schema, if any.
    ///
    /// Looks through arrays and single-member unions; empty objects yield `None`.
    pub fn expandable_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(obj) if !obj.properties.is_empty() => Some(obj),
            SchemaKind::Array(items) => items.expandable_object(),
            SchemaKind::Union(variants) => {
                let mut objects = variants.iter().filter_map(Schema::expandable_object);
                match (objects.next(), objects.next()) {
                    (Some(obj), None) => Some(obj),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds [`Schema`] trees from raw fragments.
#[derive(Debug, Clone, Copy)]
pub struct SchemaBuilder<'a> {
    resolver: RefResolver<'a>,
}

impl<'a> SchemaBuilder<'a> {
    /// Creates a builder that expands references through `resolver`.
    pub fn new(resolver: RefResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Builds the resolved schema for `fragment`.
    pub fn build(&self, fragment: &Value) -> Schema {
        let mut ancestors = Vec::new();
        self.build_inner(fragment, &mut ancestors)
    }

    fn build_inner(&self, fragment: &Value, ancestors: &mut Vec<String>) -> Schema {
        let Some(node) = fragment.as_object() else {
            // Boolean schemas (`true` / `false`) and junk carry no shape.
            return Schema::any_object();
        };

        if let Some(pointer) = node.get("$ref").and_then(Value::as_str) {
            return self.build_reference(pointer, node, ancestors);
        }

        let mut schema = self.build_shape(node, ancestors);
        if let Some(description) = text(node, "description") {
            schema.description = Some(description);
        }
        schema
    }

    fn build_reference(
        &self,
        pointer: &str,
        node: &Map<String, Value>,
        ancestors: &mut Vec<String>,
    ) -> Schema {
        let own_description = text(node, "description");

        let Some(target) = self.resolver.lookup(pointer) else {
            tracing::debug!(pointer, "Rendering dangling $ref by name");
            let mut schema = Schema::new(SchemaKind::Ref(ref_name(pointer)));
            schema.description = own_description;
            return schema;
        };

        let key = format!("{}/{}", target.section, target.name);
        let mut schema = if ancestors.contains(&key) {
            Schema::new(SchemaKind::Ref(target.name.clone()))
        } else {
            ancestors.push(key);
            let expanded = self.build_inner(target.value, ancestors);
            ancestors.pop();
            expanded
        };

        // The innermost name wins for `A -> B -> {...}` aliases.
        if schema.name.is_none() {
            schema.name = Some(target.name);
        }
        if own_description.is_some() {
            schema.description = own_description;
        }
        schema
    }

    /// Builds an unnamed node, or the sole member of a wrapper such as `anyOf: [X, null]`.
    fn build_shape(&self, node: &Map<String, Value>, ancestors: &mut Vec<String>) -> Schema {
        if let Some(values) = node.get("enum").and_then(Value::as_array) {
            return Schema::new(SchemaKind::Enum(values.clone()));
        }
        if let Some(value) = node.get("const") {
            return Schema::new(SchemaKind::Enum(vec![value.clone()]));
        }

        for key in ["anyOf", "oneOf"] {
            if let Some(variants) = node.get(key).and_then(Value::as_array) {
                return self.build_union(variants, ancestors);
            }
        }
        if let Some(parts) = node.get("allOf").and_then(Value::as_array) {
            return self.build_all_of(parts, node, ancestors);
        }

        let kind = match declared_type(node).as_deref() {
            Some("array") => {
                let items = match node.get("items") {
                    Some(items) => self.build_inner(items, ancestors),
                    None => Schema::any_object(),
                };
                SchemaKind::Array(Box::new(items))
            }
            Some("object") | None => SchemaKind::Object(self.build_object(node, ancestors)),
            Some(other) => SchemaKind::Primitive(other.to_string()),
        };
        Schema::new(kind)
    }

    fn build_object(&self, node: &Map<String, Value>, ancestors: &mut Vec<String>) -> ObjectSchema {
        let properties = node
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(field, schema)| (field.clone(), self.build_inner(schema, ancestors)))
                    .collect()
            })
            .unwrap_or_default();
        let required = node
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        ObjectSchema {
            properties,
            required,
        }
    }

    fn build_union(&self, variants: &[Value], ancestors: &mut Vec<String>) -> Schema {
        let built: Vec<Schema> = variants
            .iter()
            .map(|variant| self.build_inner(variant, ancestors))
            .collect();

        let mut members: Vec<Schema> = built
            .iter()
            .filter(|s| !matches!(&s.kind, SchemaKind::Primitive(ty) if ty == "null"))
            .cloned()
            .collect();
        if members.is_empty() {
            members = built;
        }

        if members.len() == 1 {
            members.remove(0)
        } else {
            Schema::new(SchemaKind::Union(members))
        }
    }

    fn build_all_of(
        &self,
        parts: &[Value],
        node: &Map<String, Value>,
        ancestors: &mut Vec<String>,
    ) -> Schema {
        let mut built: Vec<Schema> = parts
            .iter()
            .map(|part| self.build_inner(part, ancestors))
            .collect();

        if built.len() == 1 && !node.contains_key("properties") {
            return built.remove(0);
        }

        let mut merged = self.build_object(node, ancestors);
        for part in built {
            if let SchemaKind::Object(obj) = part.kind {
                for (field, schema) in obj.properties {
                    merged.properties.entry(field).or_insert(schema);
                }
                for name in obj.required {
                    if !merged.is_required(&name) {
                        merged.required.push(name);
                    }
                }
            }
        }
        Schema::new(SchemaKind::Object(merged))
    }
}

fn declared_type(node: &Map<String, Value>) -> Option<String> {
    match node.get("type")? {
        Value::String(ty) => Some(ty.clone()),
        // OAS 3.1 allows `type: [string, "null"]`.
        Value::Array(types) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            names
                .iter()
                .find(|ty| **ty != "null")
                .or(names.first())
                .map(|ty| ty.to_string())
        }
        _ => None,
    }
}

fn text(node: &Map<String, Value>, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
