use std::path::PathBuf;
use std::sync::Arc;

use atx_core::{JsonTransformer, KeyedJsonTransformer, MappingRegistry, Node, Transformer};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "atx-cli",
    about = "Shape generic serializer output into API JSON using type mappings",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Transform a serialized tree (JSON) with the given mappings
    Transform(TransformArgs),
    /// List the loaded mappings
    Mappings(MappingsArgs),
    /// Print identifiers converted to snake_case
    Snake(SnakeArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Plain objects, type tags dropped
    Plain,
    /// Every typed object keyed by its type name
    Keyed,
}

#[derive(ClapArgs, Debug)]
struct TransformArgs {
    /// Serializer output to transform (.json)
    input: PathBuf,
    /// Mapping file or directory of mapping files
    #[arg(long, short)]
    mappings: Option<PathBuf>,
    /// Output shape
    #[arg(long, value_enum, default_value_t = Format::Keyed)]
    format: Format,
    /// Fail on ambiguous aliases instead of warning
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Optional output path to write; otherwise prints to stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct MappingsArgs {
    /// Mapping file or directory of mapping files
    path: PathBuf,
    /// Exit non-zero when a mapping has ambiguous aliases
    #[arg(long, default_value_t = false)]
    check: bool,
}

#[derive(ClapArgs, Debug)]
struct SnakeArgs {
    /// Identifiers to convert, e.g. UserHTTPCode
    #[arg(required = true)]
    names: Vec<String>,
    /// Treat names as type tags and drop their namespace
    #[arg(long, default_value_t = false)]
    type_tag: bool,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Transform(a) => cmd_transform(a),
        Cmd::Mappings(a) => cmd_mappings(a),
        Cmd::Snake(a) => cmd_snake(a),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_registry(path: Option<&PathBuf>) -> MappingRegistry {
    let Some(p) = path else {
        tracing::info!("no mappings given; only generic shaping applies");
        return MappingRegistry::default();
    };
    MappingRegistry::load(p).unwrap_or_else(|e| {
        eprintln!("error loading mappings: {}", e);
        std::process::exit(2);
    })
}

fn cmd_transform(args: TransformArgs) {
    let registry = load_registry(args.mappings.as_ref());
    if args.strict
        && let Err(e) = registry.validate()
    {
        eprintln!("error: {}", e);
        std::process::exit(3);
    }
    let data = std::fs::read_to_string(&args.input).unwrap_or_else(|e| {
        eprintln!("error reading {}: {}", args.input.display(), e);
        std::process::exit(2);
    });
    let raw: serde_json::Value = serde_json::from_str(&data).unwrap_or_else(|e| {
        eprintln!("invalid JSON: {}", e);
        std::process::exit(3);
    });
    let node = Node::from_json(raw).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(3);
    });

    let registry = Arc::new(registry);
    let res = match args.format {
        Format::Plain => JsonTransformer::new(registry).serialize(node),
        Format::Keyed => KeyedJsonTransformer::new(registry).serialize(node),
    };
    let text = res.unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(4);
    });
    if let Some(out) = args.out {
        std::fs::write(&out, text).unwrap_or_else(|e| {
            eprintln!("error writing: {}", e);
            std::process::exit(5);
        });
    } else {
        println!("{}", text);
    }
}

fn cmd_mappings(args: MappingsArgs) {
    let registry = load_registry(Some(&args.path));
    for m in registry.iter() {
        println!(
            "{}\tid={}\taliases={}\thidden={}\tvisible={}",
            m.type_key,
            m.identifier_key,
            m.aliases.len(),
            m.hidden_properties.len(),
            m.visible_properties.len()
        );
    }
    if args.check
        && let Err(e) = registry.validate()
    {
        eprintln!("error: {}", e);
        std::process::exit(3);
    }
}

fn cmd_snake(args: SnakeArgs) {
    for name in &args.names {
        let converted = if args.type_tag {
            atx_core::namespace_as_key(name)
        } else {
            atx_core::to_snake_case(name)
        };
        println!("{}\t{}", name, converted);
    }
}
