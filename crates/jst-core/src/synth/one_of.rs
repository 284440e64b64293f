use std::sync::Arc;

use serde_json::Value;

use super::{Synthesizer, describe};
use crate::error::SynthesisError;
use crate::model::{ClassId, MethodKind, TypeBuilder};
use crate::schema::SchemaNode;

impl<B: TypeBuilder> Synthesizer<'_, B> {
    /// Mutually exclusive properties. Each variant contributes its properties
    /// to `class`; setting one of them through its setter clears the others,
    /// and setting null is a no-op. Builders keep plain assignment.
    pub(super) fn one_of_rule(
        &mut self,
        variants: &Value,
        class: ClassId,
        schema: &Arc<SchemaNode>,
    ) -> Result<(), SynthesisError> {
        let Some(variants) = variants.as_array() else {
            return Err(SynthesisError::InvalidOneOf(describe(schema)));
        };

        let mut choices: Vec<String> = Vec::new();
        for variant in variants {
            if variant.get("$ref").is_some() {
                return Err(SynthesisError::UnsupportedOneOfVariant {
                    location: describe(schema),
                    reason: "referenced variants are not supported",
                });
            }
            let Some(properties) = variant.get("properties").and_then(Value::as_object) else {
                return Err(SynthesisError::UnsupportedOneOfVariant {
                    location: describe(schema),
                    reason: "variants must declare properties",
                });
            };
            for (property, node) in properties {
                let field = self.property_rule(property, node, class, schema)?;
                if !choices.contains(&field) {
                    choices.push(field);
                }
            }
        }

        let def = self.builder.class_mut(class);
        for field in &choices {
            let others: Vec<String> = choices.iter().filter(|f| *f != field).cloned().collect();
            if let Some(setter) = def.setter_mut(field) {
                setter.kind = MethodKind::Setter {
                    field: field.clone(),
                    clears: others,
                    skip_null: true,
                };
            }
        }
        Ok(())
    }
}
