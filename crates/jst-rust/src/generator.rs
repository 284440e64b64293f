use jst_core::config::OutputOptions;
use jst_core::model::TypeModel;
use jst_core::{CodeGenerator, GeneratedFile};
use log::debug;
use thiserror::Error;

use crate::emitters;
use crate::type_mapper::module_name;

#[derive(Debug, Error)]
pub enum RustGeneratorError {
    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),
}

/// Configuration for the Rust generator.
#[derive(Debug, Clone)]
pub struct RustGeneratorConfig {
    pub serde: bool,
    pub mod_file: bool,
    pub no_docs: bool,
}

impl Default for RustGeneratorConfig {
    fn default() -> Self {
        Self::from(&OutputOptions::default())
    }
}

impl From<&OutputOptions> for RustGeneratorConfig {
    fn from(options: &OutputOptions) -> Self {
        Self {
            serde: options.serde,
            mod_file: options.mod_file,
            no_docs: options.no_docs,
        }
    }
}

/// Emits one Rust module per package of the type model.
pub struct RustGenerator;

impl CodeGenerator for RustGenerator {
    type Config = RustGeneratorConfig;
    type Error = RustGeneratorError;

    fn generate(
        &self,
        model: &TypeModel,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error> {
        let mut files = Vec::new();
        let mut modules = Vec::new();
        for package in model.packages() {
            let module = module_name(&package);
            debug!("Emitting package {package} as {module}.rs");
            files.push(GeneratedFile {
                path: format!("{module}.rs"),
                content: emitters::module::emit_module(model, &package, config)?,
            });
            modules.push(module);
        }

        if config.mod_file {
            files.push(GeneratedFile {
                path: "mod.rs".to_string(),
                content: emitters::index::emit_index(&modules)?,
            });
        }

        Ok(files)
    }
}
