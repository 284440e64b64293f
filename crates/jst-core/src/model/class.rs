use serde_json::Value;

use super::{ClassId, TypeRef};
use crate::naming::NormalizedName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    /// Declared for objects with no properties.
    Interface,
}

/// A property of a generated class.
#[derive(Debug, Clone)]
pub struct Property {
    /// Name as written in the schema.
    pub json_name: String,
    pub name: NormalizedName,
    /// Unique field identifier within the class.
    pub field: String,
    pub ty: TypeRef,
    pub required: bool,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub kind: MethodKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodKind {
    Getter {
        field: String,
    },
    /// Assigns `field`. When `skip_null` is set a null argument leaves the
    /// instance untouched; otherwise every field in `clears` is reset after
    /// the assignment.
    Setter {
        field: String,
        clears: Vec<String>,
        skip_null: bool,
    },
    /// Fluent setter returning the instance. `inherited` builders delegate
    /// to the supertype's builder of the same name.
    Builder {
        field: String,
        inherited: bool,
    },
    Constructor {
        params: Vec<String>,
    },
    Equals {
        fields: Vec<String>,
        call_super: bool,
    },
    HashCode {
        fields: Vec<String>,
        call_super: bool,
    },
    ToString {
        fields: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub package: String,
    /// The class this one is nested in, if any.
    pub outer: Option<ClassId>,
    pub kind: ClassKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub extends: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub properties: Vec<Property>,
    /// Value type of the catch-all map for undeclared properties.
    pub additional_properties: Option<TypeRef>,
    pub discriminator: Option<String>,
    pub methods: Vec<Method>,
}

impl ClassDef {
    pub fn new(name: &str, package: &str, outer: Option<ClassId>, kind: ClassKind) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            outer,
            kind,
            title: None,
            description: None,
            extends: None,
            interfaces: Vec::new(),
            properties: Vec::new(),
            additional_properties: None,
            discriminator: None,
            methods: Vec::new(),
        }
    }

    pub fn property(&self, field: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.field == field)
    }

    pub fn property_by_json_name(&self, json_name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.json_name == json_name)
    }

    pub fn property_by_json_name_mut(&mut self, json_name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.json_name == json_name)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn setter_mut(&mut self, field: &str) -> Option<&mut Method> {
        self.methods
            .iter_mut()
            .find(|m| matches!(&m.kind, MethodKind::Setter { field: f, .. } if f == field))
    }

    pub fn builders(&self) -> impl Iterator<Item = (&str, &str)> {
        self.methods.iter().filter_map(|m| match &m.kind {
            MethodKind::Builder { field, .. } => Some((m.name.as_str(), field.as_str())),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &[String]> {
        self.methods.iter().filter_map(|m| match &m.kind {
            MethodKind::Constructor { params } => Some(params.as_slice()),
            _ => None,
        })
    }

    /// Names of every field the class holds, including the additional
    /// properties map.
    pub fn field_names(&self) -> Vec<String> {
        let mut fields: Vec<String> = self.properties.iter().map(|p| p.field.clone()).collect();
        if self.additional_properties.is_some() {
            fields.push(ADDITIONAL_PROPERTIES_FIELD.to_string());
        }
        fields
    }

    pub fn has_fields(&self) -> bool {
        !self.properties.is_empty() || self.additional_properties.is_some()
    }
}

/// Field name of the map holding undeclared properties.
pub const ADDITIONAL_PROPERTIES_FIELD: &str = "additionalProperties";

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub package: String,
    pub outer: Option<ClassId>,
    pub description: Option<String>,
    pub members: Vec<EnumMember>,
}

impl EnumDef {
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }
}
