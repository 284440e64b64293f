//! The in-memory type model that synthesis writes into and generators read.

mod builder;
mod class;
mod instance;
mod memory;
mod types;

pub use builder::TypeBuilder;
pub use class::{ADDITIONAL_PROPERTIES_FIELD, ClassDef, ClassKind, EnumDef, EnumMember, Method, MethodKind, Property};
pub use instance::Instance;
pub use memory::TypeModel;
pub use types::{ClassId, Container, EnumId, ExternalKind, Scalar, ScalarKind, TypeRef};
