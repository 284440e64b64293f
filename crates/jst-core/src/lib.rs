pub mod config;
pub mod error;
pub mod model;
pub mod naming;
pub mod schema;
pub mod synth;

pub use error::{ResolveError, SynthesisError};
pub use schema::{SchemaLocation, SchemaNode, SchemaStore};
pub use synth::Synthesizer;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from a synthesized type model.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        model: &model::TypeModel,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
