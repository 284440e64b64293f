//! Rule-driven synthesis of types from schema nodes.
//!
//! [`Synthesizer::synthesize`] classifies a piece of schema content and
//! dispatches to the rule for its shape. Rules recurse back into
//! `synthesize` for nested content, so one entry call builds every type the
//! content reaches. Each schema node records the type built for it; a
//! reference to a node that already has a type reuses it, which is what
//! makes recursive schemas terminate.

mod array;
mod enumeration;
mod extras;
mod object;
mod one_of;
mod properties;
mod scalar;

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use serde_json::{Map, Value, json};

use crate::config::GenerationConfig;
use crate::error::{ResolveError, SynthesisError};
use crate::model::{Container, TypeBuilder, TypeRef};
use crate::naming::{NameAllocator, is_flat_fragment};
use crate::schema::{SchemaLocation, SchemaNode, SchemaStore, pointer};

pub struct Synthesizer<'a, B: TypeBuilder> {
    store: &'a SchemaStore,
    config: &'a GenerationConfig,
    builder: &'a mut B,
    names: NameAllocator,
    /// Nodes whose synthesis is underway but which have no type yet, with
    /// the value of `declared` when they were entered.
    in_progress: HashMap<u64, usize>,
    /// Classes declared so far.
    declared: usize,
}

/// The shape of a piece of schema content, in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape<'v> {
    Reference(&'v str),
    Enum,
    Object,
    Array,
    Scalar(ScalarType),
    Any,
    /// A bag of named sub-schemas with no type of its own.
    Container,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    String,
    Integer,
    Number,
    Boolean,
}

impl<'v> Shape<'v> {
    fn of(content: &'v Value) -> Self {
        let Some(map) = content.as_object() else {
            return Shape::Any;
        };
        if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
            return Shape::Reference(reference);
        }
        if map.contains_key("enum") {
            return Shape::Enum;
        }
        // Declared properties make an object whatever the declared type.
        let has_properties = map
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|properties| !properties.is_empty());
        if has_properties {
            return Shape::Object;
        }
        if let Some(declared) = declared_type(map) {
            return match declared {
                "object" => Shape::Object,
                "array" => Shape::Array,
                "string" => Shape::Scalar(ScalarType::String),
                "integer" => Shape::Scalar(ScalarType::Integer),
                "number" => Shape::Scalar(ScalarType::Number),
                "boolean" => Shape::Scalar(ScalarType::Boolean),
                _ => Shape::Any,
            };
        }
        let implies_object = ["properties", "extends", "extendsExternalType", "oneOf"]
            .iter()
            .any(|key| map.contains_key(*key))
            || map.get("additionalProperties").is_some_and(Value::is_object);
        if implies_object {
            return Shape::Object;
        }
        if map.contains_key("items") {
            return Shape::Array;
        }
        if !map.is_empty() && map.values().any(|child| child.get("type").is_some()) {
            return Shape::Container;
        }
        Shape::Any
    }
}

/// The declared `type`: a string, or the first non-null entry of an array.
fn declared_type(map: &Map<String, Value>) -> Option<&str> {
    match map.get("type")? {
        Value::String(name) => Some(name),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null"),
        _ => None,
    }
}

/// Whether `content` is the node's own content rather than something nested
/// inside it.
fn owns(schema: &SchemaNode, content: &Value) -> bool {
    std::ptr::eq(schema.content(), content)
}

fn describe(schema: &SchemaNode) -> String {
    schema
        .location()
        .map_or_else(|| "<in-memory>".to_string(), ToString::to_string)
}

fn text(content: &Value, key: &str) -> Option<String> {
    content.get(key).and_then(Value::as_str).map(str::to_string)
}

impl<'a, B: TypeBuilder> Synthesizer<'a, B> {
    pub fn new(store: &'a SchemaStore, config: &'a GenerationConfig, builder: &'a mut B) -> Self {
        Self {
            store,
            config,
            builder,
            names: NameAllocator::from_config(config),
            in_progress: HashMap::new(),
            declared: 0,
        }
    }

    /// Synthesize the document at `location`, naming its root type `type_name`
    /// and placing package-level types in `package`.
    pub fn generate(&mut self, type_name: &str, package: &str, location: &str) -> Result<TypeRef, SynthesisError> {
        let node = self.store.create(None, location)?;
        self.synthesize_node(type_name, &Container::Package(package.to_string()), &node)
    }

    /// Synthesize content that is already in memory.
    pub fn generate_from_value(&mut self, type_name: &str, package: &str, content: Value) -> Result<TypeRef, SynthesisError> {
        let node = self.store.register(None, content)?;
        self.synthesize_node(type_name, &Container::Package(package.to_string()), &node)
    }

    /// Produce the type for `content`, a node's own content or something
    /// nested in it. New types are declared in `container`.
    pub fn synthesize(
        &mut self,
        name: &str,
        content: &Value,
        container: &Container,
        schema: &Arc<SchemaNode>,
    ) -> Result<TypeRef, SynthesisError> {
        let shape = Shape::of(content);
        let ty = match shape {
            Shape::Reference(reference) => {
                let target = self.store.resolve(Some(schema), reference)?;
                return self.synthesize_node(name, container, &target);
            }
            Shape::Container => {
                self.container_rule(content, container, schema)?;
                return Ok(TypeRef::Any);
            }
            Shape::Enum => self.enum_rule(name, content, container)?,
            Shape::Object => {
                let package = self.object_package(container, schema);
                self.object_rule(name, content, &package, schema)?
            }
            Shape::Array => self.array_rule(name, content, container, schema)?,
            Shape::Scalar(kind) => self.scalar_rule(kind, content),
            Shape::Any => match content.get("externalType").and_then(Value::as_str) {
                Some(external) => self.external_type(external),
                None => TypeRef::Any,
            },
        };
        if owns(schema, content) {
            schema.set_synthesized_if_empty(ty.clone());
        }
        Ok(ty)
    }

    /// Synthesize a node's own content, reusing its type if it already has one.
    fn synthesize_node(
        &mut self,
        name: &str,
        container: &Container,
        node: &Arc<SchemaNode>,
    ) -> Result<TypeRef, SynthesisError> {
        if let Some(existing) = node.synthesized_type() {
            debug!("Reusing type for {}", describe(node));
            return Ok(existing.clone());
        }
        // Re-entering a node is fine once a class has been declared since the
        // outer entry: that class ends the cycle. Without one the chain is a
        // pure reference loop.
        let previous = self.in_progress.insert(node.key(), self.declared);
        if previous == Some(self.declared) {
            return Err(SynthesisError::CircularReference(describe(node)));
        }
        let result = self.synthesize(name, node.content(), container, node);
        match previous {
            Some(entered) => self.in_progress.insert(node.key(), entered),
            None => self.in_progress.remove(&node.key()),
        };
        result
    }

    /// Generate every typed child of a container node by reference, so each
    /// child gets its own node.
    fn container_rule(
        &mut self,
        content: &Value,
        container: &Container,
        schema: &Arc<SchemaNode>,
    ) -> Result<(), SynthesisError> {
        let Some(children) = content.as_object() else {
            return Ok(());
        };
        let base = schema.location().and_then(SchemaLocation::fragment).unwrap_or_default();
        let owned = owns(schema, content);
        for (key, child) in children {
            if child.get("type").is_none() {
                continue;
            }
            if owned {
                let reference = json!({ "$ref": format!("#{base}/{}", pointer::escape_segment(key)) });
                self.synthesize(key, &reference, container, schema)?;
            } else {
                warn!("Nested container at {} synthesized inline", describe(schema));
                self.synthesize(key, child, container, schema)?;
            }
        }
        Ok(())
    }

    /// Objects are declared at package level; a mapped schema id selects the
    /// package.
    fn object_package(&self, container: &Container, schema: &SchemaNode) -> Container {
        let mapped = schema.id().and_then(|id| self.config.id_mappings.get(id));
        match mapped {
            Some(package) => Container::Package(package.clone()),
            None => Container::Package(self.builder.package_of(container)),
        }
    }

    /// The type name implied by a `$ref` in `content`: the last fragment
    /// token, or the referenced document's base name.
    fn reference_name(&self, content: &Value, schema: &SchemaNode) -> Result<Option<String>, SynthesisError> {
        let Some(reference) = content.get("$ref").and_then(Value::as_str) else {
            return Ok(None);
        };
        let reference = reference.trim_end_matches(['#', '?', '&', '/']);
        if reference.is_empty() {
            return Ok(None);
        }
        let location = match schema.location() {
            Some(base) => base.join(reference, self.store.source()),
            None => SchemaLocation::standalone(reference, self.store.source()),
        }
        .map_err(|kind| ResolveError::new(reference, schema.location(), kind))?;

        match location.fragment() {
            Some(fragment) if !is_flat_fragment(fragment) => {
                Err(SynthesisError::NestedFragmentNamespace(reference.to_string()))
            }
            Some(_) => Ok(location.fragment_tail()),
            None => Ok(location.base_name()),
        }
    }
}
