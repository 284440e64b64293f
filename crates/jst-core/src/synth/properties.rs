use std::sync::Arc;

use log::warn;
use serde_json::Value;

use super::{Synthesizer, describe, text};
use crate::error::SynthesisError;
use crate::model::{ClassId, ClassKind, Container, Method, MethodKind, Property, TypeBuilder, TypeRef};
use crate::naming::{capitalize, normalize_name};
use crate::schema::SchemaNode;

impl<B: TypeBuilder> Synthesizer<'_, B> {
    /// Add every entry of a `properties` object to `class`. An entry named
    /// `oneOf` declares a set of mutually exclusive properties instead.
    pub(super) fn properties_rule(
        &mut self,
        properties: &Value,
        class: ClassId,
        schema: &Arc<SchemaNode>,
    ) -> Result<(), SynthesisError> {
        let Some(entries) = properties.as_object() else {
            warn!("Ignoring non-object properties at {}", describe(schema));
            return Ok(());
        };
        for (property, node) in entries {
            if property == "oneOf" {
                self.one_of_rule(node, class, schema)?;
            } else {
                self.property_rule(property, node, class, schema)?;
            }
        }
        Ok(())
    }

    /// Add one property with its accessors. Returns the field name. A
    /// property the class already has is left as is.
    pub(super) fn property_rule(
        &mut self,
        property: &str,
        node: &Value,
        class: ClassId,
        schema: &Arc<SchemaNode>,
    ) -> Result<String, SynthesisError> {
        if let Some(existing) = self.builder.class(class).property_by_json_name(property) {
            return Ok(existing.field.clone());
        }

        let type_name = self
            .reference_name(node, schema)?
            .unwrap_or_else(|| property.to_string());
        let ty = self.synthesize(&type_name, node, &Container::Class(class), schema)?;

        let def = self.builder.class(class);
        let field = self
            .names
            .field_name(property, |candidate| def.property(candidate).is_some());
        let accessor = capitalize(&field);
        let include_builders = self.config.include_builders;

        let def = self.builder.class_mut(class);
        def.properties.push(Property {
            json_name: property.to_string(),
            name: normalize_name(property),
            field: field.clone(),
            ty,
            required: node.get("required").and_then(Value::as_bool).unwrap_or(false),
            title: text(node, "title"),
            description: text(node, "description"),
        });
        def.methods.push(Method {
            name: format!("get{accessor}"),
            kind: MethodKind::Getter {
                field: field.clone(),
            },
        });
        def.methods.push(Method {
            name: format!("set{accessor}"),
            kind: MethodKind::Setter {
                field: field.clone(),
                clears: Vec::new(),
                skip_null: false,
            },
        });
        if include_builders {
            def.methods.push(Method {
                name: format!("with{accessor}"),
                kind: MethodKind::Builder {
                    field: field.clone(),
                    inherited: false,
                },
            });
        }
        Ok(field)
    }

    /// The catch-all map for undeclared properties. Absent or `true` means
    /// any value, `false` means none, a schema types the values.
    pub(super) fn additional_properties_rule(
        &mut self,
        content: &Value,
        class: ClassId,
        schema: &Arc<SchemaNode>,
    ) -> Result<(), SynthesisError> {
        if self.builder.class(class).kind == ClassKind::Interface {
            return Ok(());
        }
        let value_type = match content.get("additionalProperties") {
            Some(Value::Bool(false)) => return Ok(()),
            Some(node) if node.is_object() => {
                let class_name = self.builder.class(class).name.clone();
                let type_name = self
                    .reference_name(node, schema)?
                    .unwrap_or_else(|| format!("{class_name}Property"));
                let package = Container::Package(self.builder.class(class).package.clone());
                self.synthesize(&type_name, node, &package, schema)?
            }
            _ => TypeRef::Any,
        };
        self.builder.class_mut(class).additional_properties = Some(value_type);
        Ok(())
    }

    /// Mark the properties listed in a `required` array.
    pub(super) fn required_rule(&mut self, content: &Value, class: ClassId) {
        let Some(required) = content.get("required").and_then(Value::as_array) else {
            return;
        };
        let def = self.builder.class_mut(class);
        for name in required.iter().filter_map(Value::as_str) {
            match def.property_by_json_name_mut(name) {
                Some(property) => property.required = true,
                None => warn!("Required property {name} is not declared on {}", def.name),
            }
        }
    }
}
