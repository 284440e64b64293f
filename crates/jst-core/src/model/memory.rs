use indexmap::{IndexMap, IndexSet};
use serde_json::{Value, json};

use super::{
    ClassDef, ClassId, ClassKind, Container, EnumDef, EnumId, EnumMember, ExternalKind, TypeBuilder,
    TypeRef,
};

/// Arena-backed [`TypeBuilder`]. Declarations are kept in creation order.
#[derive(Debug, Clone, Default)]
pub struct TypeModel {
    classes: Vec<ClassDef>,
    enums: Vec<EnumDef>,
    externals: IndexMap<String, ExternalKind>,
}

impl TypeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell the model about a type defined outside it.
    pub fn register_external(&mut self, name: &str, kind: ExternalKind) {
        self.externals.insert(name.to_string(), kind);
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassDef)> {
        self.classes.iter().enumerate().map(|(i, c)| (ClassId(i), c))
    }

    pub fn enums(&self) -> impl Iterator<Item = (EnumId, &EnumDef)> {
        self.enums.iter().enumerate().map(|(i, e)| (EnumId(i), e))
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    /// First class with the given simple name.
    pub fn find_class(&self, name: &str) -> Option<(ClassId, &ClassDef)> {
        self.classes().find(|(_, c)| c.name == name)
    }

    /// First enumeration with the given simple name.
    pub fn find_enum(&self, name: &str) -> Option<(EnumId, &EnumDef)> {
        self.enums().find(|(_, e)| e.name == name)
    }

    /// Packages holding at least one declaration, in first-use order.
    pub fn packages(&self) -> Vec<String> {
        let mut packages = IndexSet::new();
        for class in &self.classes {
            packages.insert(class.package.clone());
        }
        for enumeration in &self.enums {
            packages.insert(enumeration.package.clone());
        }
        packages.into_iter().collect()
    }

    /// Dotted name of a class, including enclosing classes.
    pub fn qualified_class_name(&self, id: ClassId) -> String {
        let class = &self.classes[id.0];
        self.qualify(&class.package, class.outer, &class.name)
    }

    pub fn qualified_enum_name(&self, id: EnumId) -> String {
        let enumeration = &self.enums[id.0];
        self.qualify(&enumeration.package, enumeration.outer, &enumeration.name)
    }

    fn qualify(&self, package: &str, outer: Option<ClassId>, name: &str) -> String {
        let mut parts = vec![name.to_string()];
        let mut current = outer;
        while let Some(id) = current {
            let class = &self.classes[id.0];
            parts.push(class.name.clone());
            current = class.outer;
        }
        if !package.is_empty() {
            parts.push(package.to_string());
        }
        parts.reverse();
        parts.join(".")
    }

    /// Human-readable rendering of a type reference.
    pub fn type_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Scalar(scalar) => scalar.name().to_string(),
            TypeRef::Any => "Object".to_string(),
            TypeRef::Class(id) => self.qualified_class_name(*id),
            TypeRef::Enum(id) => self.qualified_enum_name(*id),
            TypeRef::Array { element, unique } => {
                let collection = if *unique { "Set" } else { "List" };
                format!("{collection}<{}>", self.type_name(element))
            }
            TypeRef::Map(value) => format!("Map<String, {}>", self.type_name(value)),
            TypeRef::External(name) => name.clone(),
        }
    }

    /// Structured overview of every declaration.
    pub fn summary(&self) -> Value {
        let classes: Vec<Value> = self
            .classes()
            .map(|(id, class)| {
                let properties: Vec<Value> = class
                    .properties
                    .iter()
                    .map(|p| {
                        json!({
                            "name": p.json_name,
                            "field": p.field,
                            "type": self.type_name(&p.ty),
                            "required": p.required,
                        })
                    })
                    .collect();
                json!({
                    "name": self.qualified_class_name(id),
                    "kind": match class.kind {
                        ClassKind::Class => "class",
                        ClassKind::Interface => "interface",
                    },
                    "extends": class.extends.as_ref().map(|t| self.type_name(t)),
                    "interfaces": class.interfaces.iter().map(|t| self.type_name(t)).collect::<Vec<_>>(),
                    "properties": properties,
                    "additional_properties": class.additional_properties.as_ref().map(|t| self.type_name(t)),
                    "methods": class.methods.iter().map(|m| m.name.clone()).collect::<Vec<_>>(),
                })
            })
            .collect();
        let enums: Vec<Value> = self
            .enums()
            .map(|(id, e)| {
                json!({
                    "name": self.qualified_enum_name(id),
                    "members": e.members.iter().map(|m| m.name.clone()).collect::<Vec<_>>(),
                })
            })
            .collect();
        json!({
            "packages": self.packages(),
            "classes": classes,
            "enums": enums,
        })
    }

    fn outer_of(container: &Container) -> Option<ClassId> {
        match container {
            Container::Package(_) => None,
            Container::Class(id) => Some(*id),
        }
    }

    fn declared_in(&self, container: &Container, package: &str, outer: Option<ClassId>) -> bool {
        match container {
            Container::Package(p) => outer.is_none() && package == p,
            Container::Class(id) => outer == Some(*id),
        }
    }
}

impl TypeBuilder for TypeModel {
    fn lookup(&self, container: &Container, name: &str) -> Option<TypeRef> {
        let class = self
            .classes()
            .find(|(_, c)| c.name == name && self.declared_in(container, &c.package, c.outer))
            .map(|(id, _)| TypeRef::Class(id));
        class.or_else(|| {
            self.enums()
                .find(|(_, e)| e.name == name && self.declared_in(container, &e.package, e.outer))
                .map(|(id, _)| TypeRef::Enum(id))
        })
    }

    fn declare_class(&mut self, container: &Container, name: &str, kind: ClassKind) -> ClassId {
        let package = self.package_of(container);
        self.classes
            .push(ClassDef::new(name, &package, Self::outer_of(container), kind));
        ClassId(self.classes.len() - 1)
    }

    fn declare_enum(&mut self, container: &Container, name: &str, members: Vec<EnumMember>) -> EnumId {
        let package = self.package_of(container);
        self.enums.push(EnumDef {
            name: name.to_string(),
            package,
            outer: Self::outer_of(container),
            description: None,
            members,
        });
        EnumId(self.enums.len() - 1)
    }

    fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.0]
    }

    fn class_mut(&mut self, id: ClassId) -> &mut ClassDef {
        &mut self.classes[id.0]
    }

    fn enumeration(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.0]
    }

    fn enumeration_mut(&mut self, id: EnumId) -> &mut EnumDef {
        &mut self.enums[id.0]
    }

    fn external(&self, name: &str) -> Option<ExternalKind> {
        self.externals.get(name).copied()
    }
}
