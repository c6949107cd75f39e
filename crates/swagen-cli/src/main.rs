use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use swagen_core::config::{self, CONFIG_FILE_NAME, SwagenConfig};
use swagen_core::ir::IrSpec;
use swagen_core::parse::{self, spec::SwaggerSpec};
use swagen_core::transform;
use swagen_core::{CodeGenerator, GeneratedFile, GeneratorConfig, TargetLanguage};
use swagen_go::GoGenerator;
use swagen_typescript::TypeScriptGenerator;

#[derive(Parser)]
#[command(name = "swagen", about = "Swagger 2.0 code generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code from a Swagger document
    Generate(GenerateArgs),

    /// Validate a Swagger document
    Validate {
        /// Path to the Swagger document (YAML or JSON)
        #[arg(short, long)]
        swagger: PathBuf,
    },

    /// Inspect the operation model built from a Swagger document
    Inspect {
        /// Path to the Swagger document
        #[arg(short, long)]
        swagger: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Print the document after hoisting and defaulting
    Normalize {
        /// Path to the Swagger document
        #[arg(short, long)]
        swagger: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Initialize a new swagen configuration
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

#[derive(clap::Args, Default)]
struct GenerateArgs {
    /// Path to the Swagger document (YAML or JSON)
    #[arg(short, long)]
    swagger: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target language: golang or typescript
    #[arg(short, long)]
    lang: Option<String>,

    /// Type handed to secured handlers, optionally qualified with an import path
    #[arg(long)]
    credential_type: Option<String>,

    /// Skip the formatter
    #[arg(long)]
    no_format: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args),

        Commands::Validate { swagger } => cmd_validate(swagger),

        Commands::Inspect { swagger, format } => cmd_inspect(swagger, format),

        Commands::Normalize { swagger, format } => cmd_normalize(swagger, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swagen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Settings of one `generate` run after merging flags, config file and defaults.
#[derive(Debug)]
struct Settings {
    swagger: PathBuf,
    output: PathBuf,
    target: TargetLanguage,
    credential_type: Option<String>,
    format: bool,
}

impl Settings {
    /// Flags win over the config file; the file wins over built-in defaults.
    fn resolve(args: GenerateArgs, cfg: SwagenConfig) -> Result<Self> {
        let target = args.lang.unwrap_or(cfg.target);
        Ok(Self {
            swagger: args.swagger.unwrap_or_else(|| PathBuf::from(&cfg.input)),
            output: args.output.unwrap_or_else(|| PathBuf::from(&cfg.output)),
            target: target.parse()?,
            credential_type: args.credential_type.or(cfg.credential_type),
            format: cfg.format && !args.no_format,
        })
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SwagenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn read_document(path: &Path) -> Result<SwaggerSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let spec = parse::from_path_contents(path, &content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(spec)
}

fn load_spec(path: &Path) -> Result<IrSpec> {
    let spec = read_document(path)?;
    let ir = transform::transform(spec)
        .with_context(|| format!("failed to process {}", path.display()))?;
    Ok(ir)
}

/// Look up a generator by its target language.
fn get_generator(target: TargetLanguage) -> Box<dyn CodeGenerator> {
    match target {
        TargetLanguage::Golang => Box::new(GoGenerator),
        TargetLanguage::Typescript => Box::new(TypeScriptGenerator),
    }
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

/// Format generated Go code with goimports, falling back to gofmt.
fn try_run_go_formatter(output_dir: &Path) {
    let dir = output_dir.to_string_lossy();
    let candidates: [(&str, Vec<&str>); 2] = [
        ("goimports", vec!["-w", dir.as_ref()]),
        ("gofmt", vec!["-w", "-s", dir.as_ref()]),
    ];

    for (tool, args) in &candidates {
        match Command::new(tool).args(args).output() {
            Ok(result) if result.status.success() => {
                eprintln!("  formatted with {tool}");
                return;
            }
            Ok(result) => {
                log::debug!(
                    "{tool} failed: {}",
                    String::from_utf8_lossy(&result.stderr).trim()
                );
            }
            Err(e) => log::debug!("{tool} not runnable: {e}"),
        }
    }

    eprintln!(
        "  warning: neither goimports nor gofmt succeeded, {} is left unformatted",
        output_dir.display()
    );
}

/// Arguments of the current invocation, echoed into the generated-code header.
fn command_line() -> String {
    std::env::args().skip(1).collect::<Vec<_>>().join(" ")
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let settings = Settings::resolve(args, cfg)?;
    log::debug!("generate settings: {settings:?}");

    let ir = load_spec(&settings.swagger)?;

    eprintln!(
        "Generating {} → {}",
        settings.target,
        settings.output.display()
    );
    let generator = get_generator(settings.target);
    let gen_config = GeneratorConfig {
        output_dir: settings.output.clone(),
        credential_type: settings.credential_type.clone(),
        command_line: command_line(),
    };
    let files = generator
        .generate(&ir, &gen_config)
        .map_err(|e| anyhow::anyhow!(e))?;

    fs::create_dir_all(&settings.output).with_context(|| {
        format!(
            "failed to create output directory {}",
            settings.output.display()
        )
    })?;
    write_files(&settings.output, &files)?;

    if settings.format && generator.id() == TargetLanguage::Golang {
        try_run_go_formatter(&settings.output);
    }

    eprintln!(
        "Generated {} files in {}",
        files.len(),
        settings.output.display()
    );
    Ok(())
}

fn cmd_validate(swagger: PathBuf) -> Result<()> {
    let parsed = read_document(&swagger)?;

    eprintln!(
        "Valid Swagger {} document: {}",
        parsed.swagger, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());
    eprintln!("  Definitions: {}", parsed.definitions.len());

    // Also validate that it normalizes and builds a model
    let ir = transform::transform(parsed)
        .with_context(|| format!("failed to process {}", swagger.display()))?;
    eprintln!("  Operations: {}", ir.operations.len());
    eprintln!("  Definitions after hoisting: {}", ir.spec.definitions.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn print_value<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(value)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn cmd_inspect(swagger: PathBuf, format: OutputFormat) -> Result<()> {
    let ir = load_spec(&swagger)?;
    print_value(&build_inspect_summary(&ir), format)
}

fn cmd_normalize(swagger: PathBuf, format: OutputFormat) -> Result<()> {
    let mut spec = read_document(&swagger)?;
    transform::normalize(&mut spec)
        .with_context(|| format!("failed to normalize {}", swagger.display()))?;
    print_value(&spec, format)
}

fn build_inspect_summary(ir: &IrSpec) -> serde_json::Value {
    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "name": op.name.original,
                "method": op.method.as_str(),
                "path": op.path,
                "tags": op.tags,
                "security": op.security_schemes(),
                "returns": op.response_type().is_some(),
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
        },
        "enums": ir.enums.iter().map(|e| &e.name.original).collect::<Vec<_>>(),
        "objects": ir.objects.iter().map(|o| &o.name.original).collect::<Vec<_>>(),
        "aliases": ir.type_aliases.iter().map(|a| &a.name.original).collect::<Vec<_>>(),
        "operations": operations,
        "tags": ir.tags.iter().map(|t| &t.name.original).collect::<Vec<_>>(),
        "has_security": ir.has_security,
    })
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
