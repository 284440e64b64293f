use indexmap::IndexMap;
use serde_json::Value;

use super::{ClassDef, MethodKind};
use crate::error::InstanceError;

/// A value of a generated class, driven through the class's methods.
///
/// Lets callers observe the runtime behavior the model describes, such as
/// mutually exclusive choice properties.
#[derive(Debug, Clone)]
pub struct Instance<'a> {
    class: &'a ClassDef,
    values: IndexMap<String, Value>,
}

impl<'a> Instance<'a> {
    pub fn new(class: &'a ClassDef) -> Self {
        let values = class
            .properties
            .iter()
            .map(|p| (p.field.clone(), Value::Null))
            .collect();
        Self { class, values }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Call the named setter or builder with `value`.
    pub fn invoke(&mut self, method: &str, value: Value) -> Result<&mut Self, InstanceError> {
        let class: &'a ClassDef = self.class;
        let method = class
            .method(method)
            .ok_or_else(|| InstanceError::UnknownMethod(method.to_string()))?;
        match &method.kind {
            MethodKind::Setter {
                field,
                clears,
                skip_null,
            } => {
                if *skip_null && value.is_null() {
                    return Ok(self);
                }
                self.values.insert(field.clone(), value);
                for other in clears {
                    self.values.insert(other.clone(), Value::Null);
                }
            }
            MethodKind::Builder { field, .. } => {
                self.values.insert(field.clone(), value);
            }
            _ => return Err(InstanceError::NotAMutator(method.name.clone())),
        }
        Ok(self)
    }

    /// Assign a property through its setter.
    pub fn set(&mut self, field: &str, value: Value) -> Result<&mut Self, InstanceError> {
        let class: &'a ClassDef = self.class;
        let setter = class
            .methods
            .iter()
            .find(|m| matches!(&m.kind, MethodKind::Setter { field: f, .. } if f == field))
            .ok_or_else(|| InstanceError::NoSetter(field.to_string()))?;
        self.invoke(&setter.name, value)
    }
}
