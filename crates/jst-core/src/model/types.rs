use serde::Serialize;

/// Handle to a class or interface declared in a [`super::TypeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub(crate) usize);

/// Handle to an enumeration declared in a [`super::TypeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EnumId(pub(crate) usize);

impl ClassId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl EnumId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Boolean,
}

impl ScalarKind {
    /// Whether a non-nullable primitive form of this kind exists.
    pub fn has_primitive(self) -> bool {
        !matches!(self, ScalarKind::String | ScalarKind::Decimal)
    }

    /// Parse a scalar type name. Lower-case names denote primitives,
    /// capitalized names their nullable counterparts.
    pub fn from_name(name: &str) -> Option<Scalar> {
        let scalar = match name {
            "int" => Scalar::primitive(ScalarKind::Int),
            "long" => Scalar::primitive(ScalarKind::Long),
            "float" => Scalar::primitive(ScalarKind::Float),
            "double" => Scalar::primitive(ScalarKind::Double),
            "boolean" => Scalar::primitive(ScalarKind::Boolean),
            "Integer" => Scalar::boxed(ScalarKind::Int),
            "Long" => Scalar::boxed(ScalarKind::Long),
            "Float" => Scalar::boxed(ScalarKind::Float),
            "Double" => Scalar::boxed(ScalarKind::Double),
            "Boolean" => Scalar::boxed(ScalarKind::Boolean),
            "String" => Scalar::boxed(ScalarKind::String),
            "Decimal" | "BigDecimal" => Scalar::boxed(ScalarKind::Decimal),
            _ => return None,
        };
        Some(scalar)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Scalar {
    pub kind: ScalarKind,
    pub primitive: bool,
}

impl Scalar {
    pub fn boxed(kind: ScalarKind) -> Self {
        Self {
            kind,
            primitive: false,
        }
    }

    /// Primitive form where one exists, boxed otherwise.
    pub fn primitive(kind: ScalarKind) -> Self {
        Self {
            kind,
            primitive: kind.has_primitive(),
        }
    }

    pub fn name(self) -> &'static str {
        match (self.kind, self.primitive) {
            (ScalarKind::String, _) => "String",
            (ScalarKind::Decimal, _) => "Decimal",
            (ScalarKind::Int, true) => "int",
            (ScalarKind::Int, false) => "Integer",
            (ScalarKind::Long, true) => "long",
            (ScalarKind::Long, false) => "Long",
            (ScalarKind::Float, true) => "float",
            (ScalarKind::Float, false) => "Float",
            (ScalarKind::Double, true) => "double",
            (ScalarKind::Double, false) => "Double",
            (ScalarKind::Boolean, true) => "boolean",
            (ScalarKind::Boolean, false) => "Boolean",
        }
    }
}

/// A reference to a type in the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Scalar(Scalar),
    /// The universal type: anything at all.
    Any,
    Class(ClassId),
    Enum(EnumId),
    Array {
        element: Box<TypeRef>,
        unique: bool,
    },
    /// String-keyed map with the given value type.
    Map(Box<TypeRef>),
    /// A type defined outside the model, by fully qualified name.
    External(String),
}

impl TypeRef {
    pub fn string() -> Self {
        TypeRef::Scalar(Scalar::boxed(ScalarKind::String))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Scalar(s) if s.primitive)
    }

    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            TypeRef::Class(id) => Some(*id),
            _ => None,
        }
    }
}

/// Where a declared type lives: directly in a package, or nested in a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    Package(String),
    Class(ClassId),
}

/// What the model knows about an externally defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalKind {
    Class,
    /// Cannot be extended.
    Final,
    Interface,
}
