//! Command-line interface for fixturegen
//!
//! # Usage Examples
//!
//! ## Populate
//! ```bash
//! # Three people as JSON lines, seed 42
//! fixturegen populate --catalog beans.yaml --type Person --count 3 --seed 42
//!
//! # Parameters from a YAML file, with the depth overridden
//! fixturegen populate --catalog beans.yaml --type Node \
//!   --config parameters.yaml --depth 2
//!
//! # Container types use the catalog's object syntax
//! fixturegen populate --catalog beans.yaml --type '{type: list, element: Street}'
//!
//! # Parallel batch, reproducible regardless of thread count
//! fixturegen populate --catalog beans.yaml --type Person --count 10000 --parallel
//! ```
//!
//! ## Describe
//! ```bash
//! # Flattened fields of every catalog type
//! fixturegen describe --catalog beans.yaml
//!
//! # A single type
//! fixturegen describe --catalog beans.yaml --type Person
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use fixture_core::{JsonValue, TypeCatalog, TypeDescriptor, TypeKind, TypeRef, Value};
use fixture_generator::{FieldKey, ObjectGenerator, Parameters};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fixturegen")]
#[command(about = "A tool for populating object graphs with seeded random data")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate instances of a type and print them as JSON lines
    Populate {
        #[command(flatten)]
        args: PopulateArgs,
    },

    /// Print the flattened fields of catalog types
    Describe {
        /// Type catalog YAML file
        #[arg(long, value_name = "PATH")]
        catalog: PathBuf,

        /// Only describe this type
        #[arg(long = "type", value_name = "TYPE")]
        type_name: Option<String>,
    },
}

/// Arguments of the populate command.
///
/// Flags override the values loaded from `--config`.
#[derive(clap::Args)]
struct PopulateArgs {
    /// Type catalog YAML file
    #[arg(long, value_name = "PATH")]
    catalog: PathBuf,

    /// Type to populate: a catalog type, a leaf type, or a container in YAML form
    #[arg(long = "type", value_name = "TYPE")]
    type_ref: String,

    /// Number of instances
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    count: i64,

    /// Parameters YAML file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Session seed
    #[arg(long, env = "FIXTUREGEN_SEED")]
    seed: Option<u64>,

    /// How many times a type may occur on one path of the graph
    #[arg(long)]
    depth: Option<usize>,

    /// Minimum number of container elements
    #[arg(long)]
    min_collection_size: Option<usize>,

    /// Maximum number of container elements
    #[arg(long)]
    max_collection_size: Option<usize>,

    /// Resolve abstract types and interfaces to concrete catalog types
    #[arg(long)]
    scan_concrete_types: bool,

    /// Populate the batch in parallel
    #[arg(long)]
    parallel: bool,

    /// Write to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing on stderr so stdout stays valid JSON lines
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Populate { args } => run_populate(args),
        Commands::Describe { catalog, type_name } => run_describe(&catalog, type_name.as_deref()),
    }
}

fn load_catalog(path: &Path) -> anyhow::Result<TypeCatalog> {
    TypeCatalog::from_file(path).with_context(|| format!("Failed to load catalog from {path:?}"))
}

fn parameters(args: &PopulateArgs) -> anyhow::Result<Parameters> {
    let mut params = match &args.config {
        Some(path) => Parameters::from_file(path)
            .with_context(|| format!("Failed to load parameters from {path:?}"))?,
        None => Parameters::default(),
    };

    if let Some(seed) = args.seed {
        params = params.seed(seed);
    }
    if let Some(depth) = args.depth {
        params = params.randomization_depth(depth);
    }
    if args.min_collection_size.is_some() || args.max_collection_size.is_some() {
        let min = args
            .min_collection_size
            .unwrap_or(params.collection_size_range.min);
        let max = args
            .max_collection_size
            .unwrap_or(params.collection_size_range.max);
        params = params
            .collection_size_range(min, max)
            .context("Invalid collection size range")?;
    }
    if args.scan_concrete_types {
        params = params.scan_for_concrete_types(true);
    }

    params.validate().context("Invalid parameters")?;
    Ok(params)
}

fn run_populate(args: PopulateArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let params = parameters(&args)?;
    let ty: TypeRef = serde_yaml::from_str(&args.type_ref)
        .with_context(|| format!("Invalid type '{}'", args.type_ref))?;

    tracing::info!(
        "Populating {} instances of {} (seed={}, depth={})",
        args.count,
        ty,
        params.seed,
        params.randomization_depth
    );

    let count = u64::try_from(args.count)
        .map_err(|_| anyhow::anyhow!("count must be non-negative, got {}", args.count))?;
    let mut generator =
        ObjectGenerator::new(catalog, params).context("Failed to build object generator")?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file {path:?}"))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut out = BufWriter::new(out);

    if args.parallel {
        let values = generator
            .populate_many_par(&ty, args.count)
            .with_context(|| format!("Failed to populate {ty}"))?;
        for value in &values {
            write_json_line(&mut out, value)?;
        }
    } else {
        // Sequential batches are written as they are populated
        for value in generator.objects(&ty, count) {
            let value = value.with_context(|| format!("Failed to populate {ty}"))?;
            write_json_line(&mut out, &value)?;
        }
    }
    out.flush().context("Failed to write output")?;

    Ok(())
}

fn write_json_line(out: &mut impl Write, value: &Value) -> anyhow::Result<()> {
    let line = serde_json::to_string(JsonValue::from(value).as_inner())?;
    writeln!(out, "{line}")?;
    Ok(())
}

fn run_describe(path: &Path, type_name: Option<&str>) -> anyhow::Result<()> {
    let catalog = load_catalog(path)?;

    let types: Vec<&TypeDescriptor> = match type_name {
        Some(name) => vec![catalog
            .get_type(name)
            .with_context(|| format!("Type '{name}' is not in the catalog"))?],
        None => catalog.types().iter().collect(),
    };

    let mut out = std::io::stdout().lock();
    for ty in types {
        writeln!(out, "{}", describe_header(ty))?;
        if ty.kind == TypeKind::Enum {
            for variant in &ty.variants {
                writeln!(out, "  {variant}")?;
            }
            continue;
        }
        for field in catalog.fields_of(&ty.name)? {
            let mut line = format!("  {}", FieldKey::of(field));
            if !field.modifiers.is_empty() {
                let modifiers: Vec<String> =
                    field.modifiers.iter().map(|m| format!("{m:?}").to_lowercase()).collect();
                line.push_str(&format!(" [{}]", modifiers.join(", ")));
            }
            for annotation in &field.annotations {
                line.push_str(&format!(" @{annotation}"));
            }
            writeln!(out, "{line}")?;
        }
    }

    Ok(())
}

fn describe_header(ty: &TypeDescriptor) -> String {
    let kind = match ty.kind {
        TypeKind::Concrete => "concrete",
        TypeKind::Abstract => "abstract",
        TypeKind::Interface => "interface",
        TypeKind::Enum => "enum",
    };
    let mut header = format!("{} ({kind})", ty.name);
    if let Some(parent) = &ty.extends {
        header.push_str(&format!(" extends {parent}"));
    }
    if !ty.implements.is_empty() {
        header.push_str(&format!(" implements {}", ty.implements.join(", ")));
    }
    if !ty.constructible {
        header.push_str(" [not constructible]");
    }
    header
}
