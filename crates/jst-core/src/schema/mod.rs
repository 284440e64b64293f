//! Schema documents, their nodes, and the store that resolves references
//! between them.

mod location;
mod node;
pub mod pointer;
pub mod source;
mod store;

pub use location::SchemaLocation;
pub use node::SchemaNode;
pub use source::{DocumentSource, FileSystemSource, MemorySource};
pub use store::SchemaStore;
