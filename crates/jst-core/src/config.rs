use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.jst.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JstConfig {
    pub input: String,
    pub output: String,
    /// Package the root types are generated into.
    pub package: String,
    pub generation: GenerationConfig,
    pub sources: SourceConfig,
    pub output_options: OutputOptions,
}

impl Default for JstConfig {
    fn default() -> Self {
        Self {
            input: "schema.json".to_string(),
            output: "src/generated".to_string(),
            package: "generated".to_string(),
            generation: GenerationConfig::default(),
            sources: SourceConfig::default(),
            output_options: OutputOptions::default(),
        }
    }
}

/// Switches that shape the synthesized types.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Non-nullable primitives for integer, number and boolean.
    pub use_primitives: bool,
    /// `double` for `number`; arbitrary precision decimals otherwise.
    pub use_double_numbers: bool,
    pub include_builders: bool,
    pub include_constructors: bool,
    /// Constructors take only the required properties.
    pub constructors_required_only: bool,
    pub include_hashcode_and_equals: bool,
    pub include_to_string: bool,
    pub class_name_prefix: String,
    pub class_name_suffix: String,
    /// Map from schema id to the package its objects are generated into.
    pub id_mappings: IndexMap<String, String>,
    /// Map from string `format` to the external type used for it.
    pub format_bindings: IndexMap<String, String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            use_primitives: false,
            use_double_numbers: true,
            include_builders: false,
            include_constructors: false,
            constructors_required_only: false,
            include_hashcode_and_equals: true,
            include_to_string: true,
            class_name_prefix: String::new(),
            class_name_suffix: String::new(),
            id_mappings: IndexMap::new(),
            format_bindings: IndexMap::new(),
        }
    }
}

/// Where `resource:` and `classpath:` references are looked up.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub resource_roots: Vec<PathBuf>,
}

/// Options for emitted source files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Derive serde traits on generated types.
    pub serde: bool,
    /// Write a `mod.rs` declaring every generated module.
    pub mod_file: bool,
    pub no_docs: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            serde: true,
            mod_file: true,
            no_docs: false,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".jst.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<JstConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: JstConfig = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# jst configuration
input: schema.json
output: src/generated
package: generated

generation:
  use_primitives: false
  use_double_numbers: true      # false = arbitrary precision decimals
  include_builders: false
  include_constructors: false
  constructors_required_only: false
  include_hashcode_and_equals: true
  include_to_string: true
  class_name_prefix: ""
  class_name_suffix: ""
  id_mappings: {}
    # "http://example.com/schemas/billing": billing
  format_bindings: {}
    # date-time: chrono::DateTime<chrono::Utc>
    # uuid: uuid::Uuid

sources:
  resource_roots: []
    # - schemas/

output_options:
  serde: true           # derive Serialize/Deserialize
  mod_file: true        # generate mod.rs
  no_docs: false
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JstConfig::default();
        assert_eq!(config.input, "schema.json");
        assert_eq!(config.output, "src/generated");
        assert_eq!(config.package, "generated");
        assert!(!config.generation.use_primitives);
        assert!(config.generation.use_double_numbers);
        assert!(config.generation.include_hashcode_and_equals);
        assert!(config.generation.id_mappings.is_empty());
        assert!(config.output_options.serde);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: schemas/order.json
output: out
package: com.example.orders
generation:
  use_primitives: true
  use_double_numbers: false
  include_builders: true
  class_name_suffix: Dto
  id_mappings:
    "http://example.com/billing": billing
  format_bindings:
    uuid: uuid::Uuid
sources:
  resource_roots:
    - schemas
output_options:
  serde: false
"#;
        let config: JstConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "schemas/order.json");
        assert_eq!(config.package, "com.example.orders");
        assert!(config.generation.use_primitives);
        assert!(!config.generation.use_double_numbers);
        assert!(config.generation.include_builders);
        assert_eq!(config.generation.class_name_suffix, "Dto");
        assert_eq!(config.generation.id_mappings["http://example.com/billing"], "billing");
        assert_eq!(config.generation.format_bindings["uuid"], "uuid::Uuid");
        assert_eq!(config.sources.resource_roots, vec![PathBuf::from("schemas")]);
        assert!(!config.output_options.serde);
        assert!(config.output_options.mod_file);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.json\n";
        let config: JstConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.json");
        // Defaults applied
        assert_eq!(config.output, "src/generated");
        assert!(config.generation.include_to_string);
    }

    #[test]
    fn test_default_content_parses() {
        let config: JstConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.input, "schema.json");
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap().is_none());
    }
}
