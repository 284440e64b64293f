use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use heck::ToPascalCase;
use log::info;

use jst_core::config::{self, CONFIG_FILE_NAME, JstConfig};
use jst_core::model::{TypeBuilder, TypeModel, TypeRef};
use jst_core::schema::FileSystemSource;
use jst_core::{CodeGenerator, GeneratedFile, SchemaStore, Synthesizer};
use jst_rust::{RustGenerator, RustGeneratorConfig};

#[derive(Parser)]
#[command(name = "jst", about = "JSON Schema to Rust type generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Rust types from a JSON Schema
    Generate {
        /// Path or URL of the root schema (JSON or YAML)
        #[arg(short, long)]
        input: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Package for the root types
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Resolve and synthesize a schema without writing anything
    Validate {
        /// Path or URL of the root schema
        #[arg(short, long)]
        input: String,
    },

    /// Inspect the synthesized type model of a schema
    Inspect {
        /// Path or URL of the root schema
        #[arg(short, long)]
        input: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new jst configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            package,
        } => cmd_generate(input, output, package),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "jst", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<JstConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

/// Root type name derived from the schema's file name.
fn root_type_name(input: &str) -> String {
    let file = input.rsplit(['/', '\\']).next().unwrap_or(input);
    let stem = file.split('.').next().unwrap_or(file);
    let name = stem.split_once(':').map_or(stem, |(_, rest)| rest).to_pascal_case();
    if name.is_empty() { "Root".to_string() } else { name }
}

/// Resolve `input` and synthesize its types into a fresh model.
fn synthesize(input: &str, cfg: &JstConfig) -> Result<(TypeModel, TypeRef)> {
    let store = SchemaStore::new(FileSystemSource::new(cfg.sources.resource_roots.clone()));
    let mut model = TypeModel::new();
    let root = Synthesizer::new(&store, &cfg.generation, &mut model)
        .generate(&root_type_name(input), &cfg.package, input)
        .with_context(|| format!("failed to generate types for {input}"))?;
    info!(
        "Synthesized {} classes and {} enums from {} documents",
        model.class_count(),
        model.enum_count(),
        store.document_count()
    );
    Ok((model, root))
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

/// Try to run rustfmt on the generated files.
fn try_run_rustfmt(output_dir: &Path, files: &[GeneratedFile]) {
    let paths: Vec<PathBuf> = files.iter().map(|f| output_dir.join(&f.path)).collect();
    match Command::new("rustfmt")
        .args(["--edition", "2024"])
        .args(&paths)
        .output()
    {
        Ok(result) if result.status.success() => {
            eprintln!("  formatted with rustfmt");
        }
        Ok(_) => {
            eprintln!("  warning: rustfmt had issues (non-zero exit), output may need manual formatting");
        }
        Err(_) => {
            eprintln!(
                "  note: rustfmt not found, run `rustfmt` on {} to format",
                output_dir.display()
            );
        }
    }
}

/// Generate the "do not edit" README.
fn readme_content() -> &'static str {
    r#"# Generated Code: Do Not Edit

This directory is **auto-generated** by jst from JSON Schema.
Any manual changes will be overwritten the next time `jst generate` is run.

To regenerate, run:
```
jst generate
```

To customize the generated output, edit your `.jst.yaml` configuration file.
"#
}

fn cmd_generate(input: Option<String>, output: Option<PathBuf>, package: Option<String>) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(package) = package {
        cfg.package = package;
    }
    let input = input.unwrap_or_else(|| cfg.input.clone());
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&cfg.output));

    eprintln!("Generating {input} → {}", output_dir.display());
    let (model, _) = synthesize(&input, &cfg)?;

    let files = RustGenerator
        .generate(&model, &RustGeneratorConfig::from(&cfg.output_options))
        .context("failed to emit Rust sources")?;

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    write_files(&output_dir, &files)?;

    let readme_path = output_dir.join("README.md");
    fs::write(&readme_path, readme_content())
        .with_context(|| format!("failed to write {}", readme_path.display()))?;
    eprintln!("  wrote {}", readme_path.display());

    try_run_rustfmt(&output_dir, &files);

    eprintln!(
        "Generated {} files in {}",
        files.len() + 1, // +1 for README
        output_dir.display()
    );
    Ok(())
}

fn cmd_validate(input: String) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let (model, root) = synthesize(&input, &cfg)?;

    eprintln!("Valid schema: {input}");
    eprintln!("  Root type: {}", model.type_name(&root));
    eprintln!("  Classes: {}", model.class_count());
    eprintln!("  Enums: {}", model.enum_count());
    eprintln!("  Packages: {}", model.packages().join(", "));
    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: String, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let (model, root) = synthesize(&input, &cfg)?;

    let summary = build_inspect_summary(&model, &root);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(model: &TypeModel, root: &TypeRef) -> serde_json::Value {
    let mut summary = model.summary();
    summary["root"] = serde_json::Value::String(model.type_name(root));
    if let TypeRef::Class(id) = root {
        summary["root_kind"] = serde_json::json!(match model.class(*id).kind {
            jst_core::model::ClassKind::Class => "class",
            jst_core::model::ClassKind::Interface => "interface",
        });
    }
    summary
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_type_name() {
        assert_eq!(root_type_name("schemas/purchase-order.json"), "PurchaseOrder");
        assert_eq!(root_type_name("https://example.com/a/address.schema.json"), "Address");
        assert_eq!(root_type_name("resource:person.yaml"), "Person");
    }

    #[test]
    fn test_inspect_summary_names_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("person.json");
        fs::write(&path, r#"{"type": "object", "properties": {"name": {"type": "string"}}}"#).unwrap();

        let (model, root) = synthesize(path.to_str().unwrap(), &JstConfig::default()).unwrap();
        let summary = build_inspect_summary(&model, &root);
        assert_eq!(summary["root"], "generated.Person");
        assert_eq!(summary["root_kind"], "class");
    }
}
