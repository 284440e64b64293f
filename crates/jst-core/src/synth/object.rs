use std::sync::Arc;

use log::debug;
use serde_json::Value;

use super::{Synthesizer, describe, extras, owns, text};
use crate::error::SynthesisError;
use crate::model::{ClassId, ClassKind, Container, TypeBuilder, TypeRef};
use crate::schema::SchemaNode;

/// Result of declaring the class for an object.
enum Declared {
    New(ClassId),
    /// An explicitly named type that already exists, or a scalar.
    Existing(TypeRef),
}

impl<B: TypeBuilder> Synthesizer<'_, B> {
    pub(super) fn object_rule(
        &mut self,
        name: &str,
        content: &Value,
        container: &Container,
        schema: &Arc<SchemaNode>,
    ) -> Result<TypeRef, SynthesisError> {
        let supertype = self.supertype(name, content, container, schema)?;
        if supertype.is_primitive() || self.builder.is_final(&supertype) {
            debug!("Supertype of {name} can not be extended, using it directly");
            return Ok(supertype);
        }

        // The supertype may refer back to this node and build its class first.
        if owns(schema, content)
            && let Some(existing) = schema.synthesized_type()
        {
            return Ok(existing.clone());
        }

        let class = match self.declare_object(name, content, container) {
            Declared::New(class) => class,
            Declared::Existing(ty) => return Ok(ty),
        };
        self.declared += 1;
        if owns(schema, content) {
            schema.set_synthesized_if_empty(TypeRef::Class(class));
        }

        let is_interface = self.builder.is_interface(&supertype);
        {
            let def = self.builder.class_mut(class);
            match supertype {
                TypeRef::Any => {}
                supertype if is_interface => def.interfaces.push(supertype),
                supertype => def.extends = Some(supertype),
            }
            def.title = text(content, "title");
            def.description = text(content, "description");
            def.discriminator = text(content, "discriminatorProperty");
        }

        if let Some(properties) = content.get("properties") {
            self.properties_rule(properties, class, schema)?;
        }
        if let Some(variants) = content.get("oneOf") {
            self.one_of_rule(variants, class, schema)?;
        }

        let interfaces: Vec<TypeRef> = content
            .get("interfaces")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|n| self.external_type(n))
                    .collect()
            })
            .unwrap_or_default();
        self.builder.class_mut(class).interfaces.extend(interfaces);

        self.additional_properties_rule(content, class, schema)?;
        self.required_rule(content, class);

        let config = self.config;
        let def = self.builder.class_mut(class);
        if config.include_to_string {
            extras::add_to_string(def);
        }
        if config.include_hashcode_and_equals {
            extras::add_equals_and_hash_code(def);
        }
        if config.include_constructors {
            extras::add_constructors(def, config.constructors_required_only);
        }
        if config.include_builders {
            if let Some(parent) = def.extends.as_ref().and_then(TypeRef::as_class) {
                let inherited: Vec<(String, String)> = self
                    .builder
                    .class(parent)
                    .builders()
                    .map(|(method, field)| (method.to_string(), field.to_string()))
                    .collect();
                extras::add_inherited_builders(self.builder.class_mut(class), &inherited);
            }
        }

        Ok(TypeRef::Class(class))
    }

    /// The supertype named by `extends` or `extendsExternalType`, or the
    /// universal type.
    fn supertype(
        &mut self,
        name: &str,
        content: &Value,
        container: &Container,
        schema: &Arc<SchemaNode>,
    ) -> Result<TypeRef, SynthesisError> {
        let extends = content.get("extends");
        let external = content.get("extendsExternalType").and_then(Value::as_str);
        match (extends, external) {
            (Some(_), Some(_)) => Err(SynthesisError::ConflictingSupertypes(describe(schema))),
            (None, Some(external)) => Ok(self.external_type(external)),
            (None, None) => Ok(TypeRef::Any),
            (Some(extends), None) => {
                let default_name = format!("{name}Parent");
                let node = match extends.get("$ref").and_then(Value::as_str) {
                    Some(reference) => self.store.resolve(Some(schema), reference)?,
                    None if owns(schema, content) => {
                        let fragment = schema.location().and_then(|l| l.fragment()).unwrap_or_default();
                        self.store.resolve(Some(schema), &format!("#{fragment}/extends"))?
                    }
                    // Inline object nested in another node: no location of its own.
                    None => Arc::new(SchemaNode::new(
                        None,
                        None,
                        extends.clone(),
                        Some(Arc::clone(schema)),
                    )),
                };
                let parent_name = supertype_name(&node, schema).unwrap_or(default_name);
                self.synthesize_node(&parent_name, container, &node)
            }
        }
    }

    fn declare_object(&mut self, name: &str, content: &Value, container: &Container) -> Declared {
        let has_members = content.get("properties").is_some()
            || content.get("oneOf").is_some()
            || content.get("additionalProperties").is_some_and(Value::is_object);
        let kind = if has_members {
            ClassKind::Class
        } else {
            ClassKind::Interface
        };

        if let Some(explicit) = content.get("externalType").and_then(Value::as_str) {
            if let TypeRef::Scalar(scalar) = self.external_type(explicit) {
                return Declared::Existing(TypeRef::Scalar(scalar));
            }
            if self.builder.external(explicit).is_some() {
                return Declared::Existing(TypeRef::External(explicit.to_string()));
            }
            let (package, simple) = match explicit.rsplit_once('.') {
                Some((package, simple)) => (package.to_string(), simple),
                None => (self.builder.package_of(container), explicit),
            };
            let target = Container::Package(package);
            let decorated = self.names.decorate(simple);
            if let Some(existing) = self.builder.lookup(&target, &decorated) {
                return Declared::Existing(existing);
            }
            return Declared::New(self.builder.declare_class(&target, &decorated, kind));
        }

        let class_name = self
            .names
            .class_name(name, |candidate| self.builder.type_exists(container, candidate));
        Declared::New(self.builder.declare_class(container, &class_name, kind))
    }
}

/// Name for a supertype resolved from `extends`. An in-place supertype
/// gets `None` so the caller falls back to `<name>Parent`.
fn supertype_name(supertype: &SchemaNode, schema: &SchemaNode) -> Option<String> {
    let parent = supertype.location()?;
    let current_document = schema.location().and_then(|l| l.document_url());
    if parent.document_url() != current_document {
        return parent.fragment_tail().or_else(|| parent.base_name());
    }
    let current = schema.location().and_then(|l| l.fragment()).unwrap_or_default();
    let in_place = format!("{current}/extends");
    let is_in_place = parent
        .fragment()
        .is_some_and(|f| f == in_place || f.starts_with(&format!("{in_place}/")));
    if is_in_place {
        return None;
    }
    parent.fragment_tail()
}
