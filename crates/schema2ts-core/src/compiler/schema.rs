//! The subset of JSON Schema the declaration emitter understands.
//!
//! Unknown keywords are ignored. Property and definition order follows the
//! source document.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A schema position: either a boolean schema or a schema object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Bool(bool),
    Object(Box<Schema>),
}

/// `type` is either one name or a list of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    One(String),
    Many(Vec<String>),
}

impl TypeSet {
    pub fn names(&self) -> Vec<&str> {
        match self {
            TypeSet::One(name) => vec![name.as_str()],
            TypeSet::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// `items` in draft-07 form: one schema for every element, or a tuple.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<SchemaNode>),
    Single(SchemaNode),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,

    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,

    #[serde(rename = "type")]
    pub ty: Option<TypeSet>,

    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    /// `Some(Value::Null)` for `"const": null`; `None` only when absent.
    #[serde(default, rename = "const", deserialize_with = "present")]
    pub const_value: Option<Value>,

    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,
    #[serde(default)]
    pub required: Vec<String>,
    pub additional_properties: Option<SchemaNode>,

    pub items: Option<Items>,
    pub prefix_items: Option<Vec<SchemaNode>>,

    pub any_of: Option<Vec<SchemaNode>>,
    pub one_of: Option<Vec<SchemaNode>>,
    pub all_of: Option<Vec<SchemaNode>>,

    #[serde(default)]
    pub definitions: IndexMap<String, SchemaNode>,
    #[serde(default, rename = "$defs")]
    pub defs: IndexMap<String, SchemaNode>,

    /// Verbatim TypeScript type overriding everything else.
    pub ts_type: Option<String>,
}

impl Schema {
    /// True when the schema describes a plain object type with no
    /// combinators or overrides, so it can be declared as an interface.
    pub fn is_plain_object(&self) -> bool {
        let object_typed = match &self.ty {
            Some(TypeSet::One(name)) => name == "object",
            Some(TypeSet::Many(_)) => false,
            None => !self.properties.is_empty() || self.additional_properties.is_some(),
        };
        object_typed
            && self.reference.is_none()
            && self.ts_type.is_none()
            && self.enum_values.is_none()
            && self.const_value.is_none()
            && self.any_of.is_none()
            && self.one_of.is_none()
            && self.all_of.is_none()
    }

    /// True when the schema carries its own shape besides combinators.
    pub fn has_structure(&self) -> bool {
        self.ty.is_some()
            || !self.properties.is_empty()
            || self.additional_properties.is_some()
            || self.items.is_some()
            || self.prefix_items.is_some()
    }
}

/// Keeps an explicit `null` apart from a missing keyword.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_schema() {
        let schema: Schema = serde_json::from_str(
            r##"{
                "title": "Game Data",
                "type": "object",
                "properties": {
                    "namespace": { "type": "string" },
                    "items": { "type": "array", "items": { "$ref": "#/definitions/Item" } },
                    "flag": true
                },
                "required": ["namespace"],
                "additionalProperties": false,
                "definitions": { "Item": { "type": ["string", "null"] } }
            }"##,
        )
        .unwrap();

        assert_eq!(schema.title.as_deref(), Some("Game Data"));
        let keys: Vec<_> = schema.properties.keys().cloned().collect();
        assert_eq!(keys, ["namespace", "items", "flag"]);
        assert!(matches!(schema.properties["flag"], SchemaNode::Bool(true)));
        assert!(matches!(schema.additional_properties, Some(SchemaNode::Bool(false))));
        match &schema.definitions["Item"] {
            SchemaNode::Object(item) => {
                assert_eq!(item.ty.as_ref().unwrap().names(), ["string", "null"]);
            }
            other => panic!("expected object schema, got {:?}", other),
        }
        assert!(schema.is_plain_object());
    }

    #[test]
    fn tuple_and_single_items() {
        let tuple: Schema =
            serde_json::from_str(r#"{"items": [{"type": "string"}, {"type": "number"}]}"#).unwrap();
        assert!(matches!(tuple.items, Some(Items::Tuple(ref v)) if v.len() == 2));

        let single: Schema = serde_json::from_str(r#"{"items": {"type": "string"}}"#).unwrap();
        assert!(matches!(single.items, Some(Items::Single(SchemaNode::Object(_)))));
    }

    #[test]
    fn defs_and_ts_type() {
        let schema: Schema = serde_json::from_str(
            r#"{"$defs": {"Id": {"tsType": "`id:${string}`"}}, "anyOf": [{"type": "string"}]}"#,
        )
        .unwrap();
        assert!(schema.definitions.is_empty());
        match &schema.defs["Id"] {
            SchemaNode::Object(id) => assert_eq!(id.ts_type.as_deref(), Some("`id:${string}`")),
            other => panic!("expected object schema, got {:?}", other),
        }
        assert!(!schema.is_plain_object());
        assert!(!schema.has_structure());
    }

    #[test]
    fn const_null_is_kept_apart_from_missing_const() {
        let null: Schema = serde_json::from_str(r#"{"const": null}"#).unwrap();
        assert_eq!(null.const_value, Some(Value::Null));

        let missing: Schema = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
        assert_eq!(missing.const_value, None);
    }
}
