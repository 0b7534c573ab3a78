//! TypeScript declaration emitter.
//!
//! Top-level schema and every entry of `definitions`/`$defs` become exported
//! declarations; everything else is inlined. References only resolve inside
//! the same document: named definitions by name, any other local JSON pointer
//! by inlining its target.

use super::schema::{Items, Schema, SchemaNode};
use super::CompileError;
use crate::config::CompileConfig;
use heck::ToUpperCamelCase;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::Write as _;

const INDENT: &str = "  ";
const FALLBACK_NAME: &str = "Schema";

/// Emits declarations for one schema document.
pub struct Emitter<'a> {
    /// Raw document, walked for pointers that are not named definitions.
    document: &'a Value,
    root: &'a Schema,
    options: &'a CompileConfig,
    root_name: String,
    /// Root is a bare `$ref` to a definition and gets no declaration of its own.
    root_is_alias: bool,
    /// JSON pointer (`#/definitions/Foo`) → (declared name, schema).
    named: IndexMap<String, (String, &'a SchemaNode)>,
    /// Pointers currently being inlined.
    inlining: RefCell<Vec<String>>,
}

impl<'a> Emitter<'a> {
    /// `root` must be parsed from `document`. `default_name` is used when the
    /// root schema carries no title.
    pub fn new(
        document: &'a Value,
        root: &'a Schema,
        options: &'a CompileConfig,
        default_name: &str,
    ) -> Self {
        let mut used = HashSet::new();
        let mut named = IndexMap::new();
        for (section, defs) in [("definitions", &root.definitions), ("$defs", &root.defs)] {
            for (key, node) in defs {
                let hint = match node {
                    SchemaNode::Object(s) => s.title.as_deref().unwrap_or(key.as_str()),
                    SchemaNode::Bool(_) => key.as_str(),
                };
                let name = unique_name(hint, &mut used);
                named.insert(format!("#/{}/{}", section, escape_pointer(key)), (name, node));
            }
        }

        let alias_target = match (&root.reference, &root.ts_type) {
            (Some(reference), None) => named.get(reference).map(|(name, _)| name.clone()),
            _ => None,
        };
        let root_is_alias = alias_target.is_some();
        let root_name = alias_target.unwrap_or_else(|| {
            unique_name(root.title.as_deref().unwrap_or(default_name), &mut used)
        });

        Self {
            document,
            root,
            options,
            root_name,
            root_is_alias,
            named,
            inlining: RefCell::new(Vec::new()),
        }
    }

    pub fn emit(&self) -> Result<String, CompileError> {
        let mut out = String::new();
        if !self.options.banner_comment.is_empty() {
            out.push_str(&self.options.banner_comment);
            out.push_str("\n\n");
        }

        let mut first = true;
        if !self.root_is_alias {
            self.declare(&mut out, &self.root_name, self.root)?;
            first = false;
        }
        for (name, node) in self.named.values() {
            if !first {
                out.push('\n');
            }
            first = false;
            match node {
                SchemaNode::Object(schema) => self.declare(&mut out, name, schema)?,
                SchemaNode::Bool(b) => {
                    let _ = writeln!(out, "export type {} = {};", name, bool_type(*b));
                }
            }
        }
        Ok(out)
    }

    fn declare(&self, out: &mut String, name: &str, schema: &Schema) -> Result<(), CompileError> {
        write_doc(out, schema, "");
        if schema.is_plain_object() {
            let _ = writeln!(out, "export interface {} {{", name);
            self.write_members(out, schema, 1)?;
            out.push_str("}\n");
        } else {
            let ty = self.type_of(schema, 0)?;
            if ty == name {
                return Err(CompileError::InvalidSchema(format!(
                    "'{}' is declared as an alias of itself",
                    name
                )));
            }
            let _ = writeln!(out, "export type {} = {};", name, ty);
        }
        Ok(())
    }

    fn write_members(&self, out: &mut String, schema: &Schema, depth: usize) -> Result<(), CompileError> {
        let pad = INDENT.repeat(depth);
        for (key, node) in &schema.properties {
            if let SchemaNode::Object(prop) = node {
                write_doc(out, prop, &pad);
            }
            let optional = if schema.required.iter().any(|r| r == key) { "" } else { "?" };
            let ty = self.node_type(node, depth)?;
            let _ = writeln!(out, "{}{}{}: {};", pad, property_key(key), optional, ty);
        }

        let index = match &schema.additional_properties {
            None if self.options.additional_properties => Some("unknown".to_string()),
            None | Some(SchemaNode::Bool(false)) => None,
            Some(SchemaNode::Bool(true)) => Some("unknown".to_string()),
            Some(node) => Some(self.node_type(node, depth)?),
        };
        if let Some(ty) = index {
            let _ = writeln!(out, "{}[k: string]: {};", pad, ty);
        }
        Ok(())
    }

    fn node_type(&self, node: &SchemaNode, depth: usize) -> Result<String, CompileError> {
        match node {
            SchemaNode::Bool(b) => Ok(bool_type(*b).to_string()),
            SchemaNode::Object(schema) => self.type_of(schema, depth),
        }
    }

    /// Inline TypeScript type for `schema`, indented for nesting `depth`.
    fn type_of(&self, schema: &Schema, depth: usize) -> Result<String, CompileError> {
        if let Some(ts) = &schema.ts_type {
            return Ok(ts.clone());
        }
        if let Some(reference) = &schema.reference {
            return self.resolve(reference, depth);
        }
        if let Some(value) = &schema.const_value {
            return Ok(literal(value));
        }
        if let Some(values) = &schema.enum_values {
            if values.is_empty() {
                return Ok("never".to_string());
            }
            return Ok(values.iter().map(literal).collect::<Vec<_>>().join(" | "));
        }
        if let Some(parts) = &schema.all_of {
            let mut types = self.node_types(parts, depth)?;
            if schema.has_structure() {
                types.push(self.structural_type(schema, depth)?);
            }
            return Ok(join_types(types, " & "));
        }
        // anyOf and oneOf side by side must both hold.
        let mut unions = Vec::new();
        for parts in [&schema.any_of, &schema.one_of].into_iter().flatten() {
            unions.push(join_types(self.node_types(parts, depth)?, " | "));
        }
        if !unions.is_empty() {
            let mut types = Vec::with_capacity(unions.len() + 1);
            if schema.has_structure() {
                types.push(self.structural_type(schema, depth)?);
            }
            types.extend(unions);
            return Ok(join_types(types, " & "));
        }
        self.structural_type(schema, depth)
    }

    fn node_types(&self, nodes: &[SchemaNode], depth: usize) -> Result<Vec<String>, CompileError> {
        nodes.iter().map(|n| self.node_type(n, depth)).collect()
    }

    /// Type from `type`, `properties` and `items` alone.
    fn structural_type(&self, schema: &Schema, depth: usize) -> Result<String, CompileError> {
        let names = match &schema.ty {
            Some(ty) => ty.names(),
            None if !schema.properties.is_empty() || schema.additional_properties.is_some() => {
                vec!["object"]
            }
            None if schema.items.is_some() || schema.prefix_items.is_some() => vec!["array"],
            None => return Ok("unknown".to_string()),
        };

        let mut types = Vec::with_capacity(names.len());
        for name in names {
            let ty = match name {
                "string" => "string".to_string(),
                "number" | "integer" => "number".to_string(),
                "boolean" => "boolean".to_string(),
                "null" => "null".to_string(),
                "array" => self.array_type(schema, depth)?,
                "object" => self.object_literal(schema, depth)?,
                other => {
                    return Err(CompileError::InvalidSchema(format!(
                        "unknown type '{}'",
                        other
                    )))
                }
            };
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        Ok(join_types(types, " | "))
    }

    fn array_type(&self, schema: &Schema, depth: usize) -> Result<String, CompileError> {
        if let Some(prefix) = &schema.prefix_items {
            return Ok(format!("[{}]", self.node_types(prefix, depth)?.join(", ")));
        }
        match &schema.items {
            None => Ok("unknown[]".to_string()),
            Some(Items::Tuple(nodes)) => Ok(format!("[{}]", self.node_types(nodes, depth)?.join(", "))),
            Some(Items::Single(node)) => Ok(format!("{}[]", parenthesize(&self.node_type(node, depth)?))),
        }
    }

    fn object_literal(&self, schema: &Schema, depth: usize) -> Result<String, CompileError> {
        let mut body = String::new();
        self.write_members(&mut body, schema, depth + 1)?;
        if body.is_empty() {
            return Ok("{}".to_string());
        }
        Ok(format!("{{\n{}{}}}", body, INDENT.repeat(depth)))
    }

    fn resolve(&self, reference: &str, depth: usize) -> Result<String, CompileError> {
        if reference == "#" {
            return Ok(self.root_name.clone());
        }
        if let Some((name, _)) = self.named.get(reference) {
            return Ok(name.clone());
        }

        let target = reference
            .strip_prefix('#')
            .filter(|pointer| pointer.starts_with('/'))
            .and_then(|pointer| self.document.pointer(pointer))
            .ok_or_else(|| CompileError::UnresolvedRef(reference.to_string()))?;
        if self.inlining.borrow().iter().any(|r| r == reference) {
            return Err(CompileError::InvalidSchema(format!(
                "recursive $ref '{}' must point at a definition",
                reference
            )));
        }
        let node = SchemaNode::deserialize(target)?;

        self.inlining.borrow_mut().push(reference.to_string());
        let ty = self.node_type(&node, depth);
        self.inlining.borrow_mut().pop();
        ty
    }
}

/// PascalCase identifier for `hint`, suffixed with a counter on collision.
fn unique_name(hint: &str, used: &mut HashSet<String>) -> String {
    let mut base = hint.to_upper_camel_case();
    base.retain(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if base.is_empty() {
        base = FALLBACK_NAME.to_string();
    }
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        base.insert(0, '_');
    }

    let mut name = base.clone();
    let mut n = 1;
    while !used.insert(name.clone()) {
        name = format!("{}{}", base, n);
        n += 1;
    }
    name
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn bool_type(b: bool) -> &'static str {
    if b {
        "unknown"
    } else {
        "never"
    }
}

/// JSON literals are valid TypeScript literal types.
fn literal(value: &Value) -> String {
    value.to_string()
}

fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        key.to_string()
    } else {
        Value::String(key.to_string()).to_string()
    }
}

fn join_types(types: Vec<String>, sep: &str) -> String {
    match types.len() {
        0 => "unknown".to_string(),
        1 => types.into_iter().next().unwrap_or_default(),
        _ => types
            .iter()
            .map(|t| parenthesize(t))
            .collect::<Vec<_>>()
            .join(sep),
    }
}

/// Wraps compound types so they bind correctly inside `[]`, `&` and `|`.
fn parenthesize(ty: &str) -> String {
    if ty.contains(" | ") || ty.contains(" & ") {
        format!("({})", ty)
    } else {
        ty.to_string()
    }
}

fn write_doc(out: &mut String, schema: &Schema, pad: &str) {
    let description = schema.description.as_deref().map(str::trim).filter(|d| !d.is_empty());
    if description.is_none() && !schema.deprecated {
        return;
    }
    let _ = writeln!(out, "{}/**", pad);
    if let Some(text) = description {
        for line in text.lines() {
            let line = line.replace("*/", "*\\/");
            if line.is_empty() {
                let _ = writeln!(out, "{} *", pad);
            } else {
                let _ = writeln!(out, "{} * {}", pad, line);
            }
        }
    }
    if schema.deprecated {
        let _ = writeln!(out, "{} * @deprecated", pad);
    }
    let _ = writeln!(out, "{} */", pad);
}
