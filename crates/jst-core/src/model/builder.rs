use super::{ClassDef, ClassId, ClassKind, Container, EnumDef, EnumId, EnumMember, ExternalKind, TypeRef};

/// The type-building backend synthesis writes into.
///
/// Implementations own the declared classes and enumerations and answer
/// questions about types declared elsewhere.
pub trait TypeBuilder {
    /// Look up a type declared directly in `container` by simple name.
    fn lookup(&self, container: &Container, name: &str) -> Option<TypeRef>;

    fn declare_class(&mut self, container: &Container, name: &str, kind: ClassKind) -> ClassId;

    fn declare_enum(&mut self, container: &Container, name: &str, members: Vec<EnumMember>) -> EnumId;

    fn class(&self, id: ClassId) -> &ClassDef;

    fn class_mut(&mut self, id: ClassId) -> &mut ClassDef;

    fn enumeration(&self, id: EnumId) -> &EnumDef;

    fn enumeration_mut(&mut self, id: EnumId) -> &mut EnumDef;

    /// Classification of an external type, if known.
    fn external(&self, name: &str) -> Option<ExternalKind>;

    /// The package a container belongs to.
    fn package_of(&self, container: &Container) -> String {
        match container {
            Container::Package(package) => package.clone(),
            Container::Class(id) => self.class(*id).package.clone(),
        }
    }

    fn type_exists(&self, container: &Container, name: &str) -> bool {
        self.lookup(container, name).is_some()
    }

    fn is_interface(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Class(id) => self.class(*id).kind == ClassKind::Interface,
            TypeRef::External(name) => self.external(name) == Some(ExternalKind::Interface),
            _ => false,
        }
    }

    /// Whether `ty` can not be extended.
    fn is_final(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Scalar(_) | TypeRef::Enum(_) => true,
            TypeRef::External(name) => self.external(name) == Some(ExternalKind::Final),
            _ => false,
        }
    }
}
