use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use modeltree::attribute::{AccessError, Value, ValueKind};
use modeltree::config::Config;
use modeltree::file::loader::{load_tree_file, load_tree_from_stdin};
use modeltree::modelpath::{PathError, Resolved};
use modeltree::query::Selector;
use modeltree::tree::{ModelTree, NodeId};

/// modeltree - query a tree of simulation models by scope and path
#[derive(Parser)]
#[command(name = "modeltree")]
#[command(version)]
#[command(about = "Scope-bounded name and path resolution over a model tree", long_about = None)]
struct Cli {
    /// Tree description to load (YAML, optionally .gz; "-" reads stdin).
    /// Falls back to `default_file` from the config.
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Full path of the model queries start from (default: the root)
    #[arg(long, global = true)]
    from: Option<String>,

    /// Output format (default: the config's `output_format`)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a model path to a model or attribute value
    Get { path: String },
    /// Write an attribute through a model path and print the value read back
    Set { path: String, value: String },
    /// Find the first visible model with this name
    Find {
        name: String,
        #[arg(long)]
        kind: Option<String>,
    },
    /// List the models visible from the start model, in resolution order
    Scope {
        #[arg(long)]
        kind: Option<String>,
    },
    /// List the start model's direct children
    Children {
        #[arg(long)]
        kind: Option<String>,
    },
    /// List every model below the start model, in pre-order
    Descendants {
        #[arg(long)]
        kind: Option<String>,
    },
    /// List the other children of the start model's parent
    Siblings,
    /// Find the closest enclosing model of a kind
    Ancestor {
        #[arg(long)]
        kind: String,
    },
    /// Print the full path of every model in the tree
    Paths,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut tree = load(&cli, &config)?;
    let from = match &cli.from {
        Some(path) => start_node(&tree, path)?,
        None => tree.root(),
    };
    let format = cli.format.unwrap_or(if config.wants_json() {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    });

    let output = run(&mut tree, from, &cli.command)?;
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            for line in output.text_lines(&tree) {
                writeln!(stdout, "{}", line)?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output.to_json(&tree))?;
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

fn load(cli: &Cli, config: &Config) -> Result<ModelTree> {
    let path = cli.file.clone().or_else(|| config.default_file.clone());
    match path {
        Some(path) if path.as_os_str() == "-" => load_tree_from_stdin(&config.kinds),
        Some(path) => load_tree_file(&path, &config.kinds),
        None if !io::stdin().is_terminal() => load_tree_from_stdin(&config.kinds),
        None => bail!("No tree description given (use --file or set default_file in the config)"),
    }
}

fn start_node(tree: &ModelTree, path: &str) -> Result<NodeId> {
    match tree
        .get(tree.root(), path)
        .with_context(|| format!("Invalid --from path '{}'", path))?
    {
        Resolved::Node(id) => Ok(id),
        Resolved::Value(_) => Err(anyhow!("--from path '{}' names an attribute, not a model", path)),
    }
}

/// What a command produced, before formatting.
enum Output {
    Nodes(Vec<NodeId>),
    Resolved(Resolved),
}

fn run(tree: &mut ModelTree, from: NodeId, command: &Command) -> Result<Output> {
    let output = match command {
        Command::Get { path } => Output::Resolved(tree.get(from, path)?),
        Command::Set { path, value } => {
            let stored = set_literal(tree, from, path, value)?;
            tracing::debug!(path = %path, "attribute written");
            Output::Resolved(Resolved::Value(stored))
        }
        Command::Find { name, kind } => {
            let selector = match kind {
                Some(kind) => Selector::name(name.as_str()).with_kind(kind.as_str()),
                None => Selector::name(name.as_str()),
            };
            let Some(found) = tree.scoped_find(from, &selector) else {
                bail!("'{}' is not visible from {}", name, describe(tree, from));
            };
            Output::Nodes(vec![found])
        }
        Command::Scope { kind } => Output::Nodes(tree.scoped_find_all(from, kind.as_deref())),
        Command::Children { kind } => Output::Nodes(tree.children(from, kind.as_deref())),
        Command::Descendants { kind } => Output::Nodes(tree.descendants(from, kind.as_deref())),
        Command::Siblings => Output::Nodes(tree.siblings(from)),
        Command::Ancestor { kind } => {
            let Some(found) = tree.nearest_ancestor_of_kind(from, kind) else {
                bail!("{} has no enclosing {}", describe(tree, from), kind);
            };
            Output::Nodes(vec![found])
        }
        Command::Paths => {
            let root = tree.root();
            let mut nodes = vec![root];
            nodes.extend(tree.descendants(root, None));
            Output::Nodes(nodes)
        }
    };
    Ok(output)
}

/// Writes a command-line literal through `path`, retrying as text when the
/// target is a text attribute and the literal looked like another type.
fn set_literal(
    tree: &mut ModelTree,
    from: NodeId,
    path: &str,
    literal: &str,
) -> Result<Value, PathError> {
    match tree.set(from, path, Value::parse_literal(literal)) {
        Err(PathError::Access {
            source:
                AccessError::TypeMismatch {
                    expected: ValueKind::Text,
                    ..
                },
            ..
        }) => tree.set(from, path, Value::Text(literal.trim().to_string())),
        result => result,
    }
}

fn describe(tree: &ModelTree, id: NodeId) -> String {
    tree.full_path(id).unwrap_or_else(|| id.to_string())
}

impl Output {
    fn text_lines(&self, tree: &ModelTree) -> Vec<String> {
        match self {
            Output::Nodes(nodes) => nodes.iter().map(|id| describe(tree, *id)).collect(),
            Output::Resolved(Resolved::Node(id)) => vec![describe(tree, *id)],
            Output::Resolved(Resolved::Value(value)) => vec![value_text(tree, value)],
        }
    }

    fn to_json(&self, tree: &ModelTree) -> serde_json::Value {
        match self {
            Output::Nodes(nodes) => {
                serde_json::Value::Array(nodes.iter().map(|id| node_json(tree, *id)).collect())
            }
            Output::Resolved(Resolved::Node(id)) => node_json(tree, *id),
            Output::Resolved(Resolved::Value(value)) => value_json(tree, value),
        }
    }
}

fn node_json(tree: &ModelTree, id: NodeId) -> serde_json::Value {
    let (name, kind) = tree
        .node(id)
        .map(|node| (node.name(), node.kind()))
        .unwrap_or_default();
    serde_json::json!({
        "path": describe(tree, id),
        "name": name,
        "kind": kind,
    })
}

/// Renders a value for text output, showing links as model paths.
fn value_text(tree: &ModelTree, value: &Value) -> String {
    match value {
        Value::Node(id) => describe(tree, *id),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(|item| value_text(tree, item)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Record(record) => {
            let fields: Vec<String> = record
                .iter()
                .map(|(name, field)| format!("{}: {}", name, value_text(tree, field)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        other => other.to_string(),
    }
}

fn value_json(tree: &ModelTree, value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(|item| value_json(tree, item)).collect())
        }
        Value::Record(record) => serde_json::Value::Object(
            record
                .iter()
                .map(|(name, field)| (name.to_string(), value_json(tree, field)))
                .collect(),
        ),
        Value::Node(id) => serde_json::Value::String(describe(tree, *id)),
    }
}
