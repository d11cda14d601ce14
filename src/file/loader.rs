//! Tree description loading.
//!
//! A tree description is a YAML document with an optional `kinds` section
//! and a `root` node. Each node has a `name`, a `kind`, and optional
//! `attributes`, `readonly` attributes and `children`:
//!
//! ```yaml
//! kinds:
//!   - { name: Zone, scope_boundary: true }
//! root:
//!   name: Simulations
//!   kind: Simulations
//!   children:
//!     - name: Soil
//!       kind: Soil
//!       attributes:
//!         Depth: 1800.0
//!         Water: !child Water
//!       children:
//!         - { name: Water, kind: Water }
//! ```
//!
//! Scalars become `Bool`, `Int`, `Float` or `Text`, sequences `List`,
//! mappings `Record`, and `!child Name` a link to the owning model's first
//! child called `Name`. Descriptions are only read; nothing is written back.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::attribute::{Access, AttributeMap, Value};
use crate::query::Selector;
use crate::tree::{KindDecl, KindTable, ModelTree, NodeId, NodeSpec};

/// YAML tag marking an attribute as a link to a child model.
const CHILD_LINK_TAG: &str = "child";

/// A complete tree description.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeDescription {
    #[serde(default)]
    pub kinds: Vec<KindDecl>,
    pub root: NodeDescription,
}

/// One model in a tree description.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub attributes: serde_yaml::Mapping,
    #[serde(default)]
    pub readonly: serde_yaml::Mapping,
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

/// An attribute waiting for its target child to exist.
struct PendingLink {
    attribute: String,
    target: String,
    access: Access,
}

/// Loads and builds a tree description from the filesystem.
///
/// Files ending in `.gz` are decompressed first. `extra_kinds` are declared
/// before the description's own kinds, unless the description redeclares
/// them.
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read or decompressed
/// - The contents are not a valid tree description
/// - A kind declaration, parent constraint or child link is invalid
pub fn load_tree_file<P: AsRef<Path>>(path: P, extra_kinds: &[KindDecl]) -> Result<ModelTree> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref).context("Failed to read file")?
    };

    tracing::debug!(path = %path_ref.display(), gzipped = is_gzipped, "loading tree description");
    load_tree_str(&content, extra_kinds)
        .with_context(|| format!("Failed to load {}", path_ref.display()))
}

/// Loads and builds a tree description piped through stdin.
///
/// ```no_run
/// use modeltree::file::loader::load_tree_from_stdin;
///
/// // Usage: cat farm.yaml | modeltree --file - paths
/// let tree = load_tree_from_stdin(&[]).unwrap();
/// ```
pub fn load_tree_from_stdin(extra_kinds: &[KindDecl]) -> Result<ModelTree> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;
    load_tree_str(&content, extra_kinds)
}

/// Parses and builds a tree description held in memory.
pub fn load_tree_str(content: &str, extra_kinds: &[KindDecl]) -> Result<ModelTree> {
    let description: TreeDescription =
        serde_yaml::from_str(content).context("Failed to parse tree description")?;
    build_tree(&description, extra_kinds)
}

/// Builds a tree from an already parsed description.
pub fn build_tree(description: &TreeDescription, extra_kinds: &[KindDecl]) -> Result<ModelTree> {
    let mut kinds = KindTable::new();
    let redeclared = |name: &str| description.kinds.iter().any(|decl| decl.name == name);
    for decl in extra_kinds.iter().filter(|decl| !redeclared(&decl.name)) {
        kinds
            .declare(decl.clone())
            .with_context(|| format!("Invalid configured kind '{}'", decl.name))?;
    }
    for decl in &description.kinds {
        kinds
            .declare(decl.clone())
            .with_context(|| format!("Invalid kind '{}'", decl.name))?;
    }

    let (spec, links) = node_spec(&description.root)?;
    let mut tree = ModelTree::with_kinds(kinds, spec)
        .with_context(|| format!("Invalid root '{}'", description.root.name))?;
    let root = tree.root();
    populate(&mut tree, root, &description.root, links)?;

    tracing::debug!(nodes = tree.len(), "tree built");
    Ok(tree)
}

fn populate(
    tree: &mut ModelTree,
    id: NodeId,
    description: &NodeDescription,
    links: Vec<PendingLink>,
) -> Result<()> {
    for child in &description.children {
        let (spec, child_links) = node_spec(child)?;
        let child_id = tree
            .add_child(id, spec)
            .with_context(|| format!("Failed to add '{}' under '{}'", child.name, description.name))?;
        populate(tree, child_id, child, child_links)?;
    }

    for link in links {
        let target = tree
            .first_child(id, &Selector::name(link.target.as_str()))
            .ok_or_else(|| {
                anyhow!(
                    "'{}' links attribute '{}' to missing child '{}'",
                    description.name,
                    link.attribute,
                    link.target
                )
            })?;
        if let Some(node) = tree.node_mut(id) {
            node.attributes_mut()
                .declare(link.attribute, Value::Node(target), link.access);
        }
    }
    Ok(())
}

fn node_spec(description: &NodeDescription) -> Result<(NodeSpec, Vec<PendingLink>)> {
    let mut attributes = AttributeMap::new();
    let mut links = Vec::new();

    let sections = [
        (&description.attributes, Access::ReadWrite),
        (&description.readonly, Access::ReadOnly),
    ];
    for (mapping, access) in sections {
        for (key, raw) in mapping {
            let name = key
                .as_str()
                .ok_or_else(|| anyhow!("'{}' has a non-string attribute name", description.name))?
                .to_string();

            if let Some(target) = child_link(raw) {
                // Placeholder keeps declaration order until the child exists
                attributes.declare(name.clone(), Value::Null, access);
                links.push(PendingLink {
                    attribute: name,
                    target,
                    access,
                });
                continue;
            }

            let value = convert_value(raw)
                .with_context(|| format!("Invalid attribute '{}' on '{}'", name, description.name))?;
            attributes.declare(name, value, access);
        }
    }

    let spec = NodeSpec::new(description.name.clone(), description.kind.clone())
        .with_attributes(attributes);
    Ok((spec, links))
}

fn child_link(raw: &serde_yaml::Value) -> Option<String> {
    match raw {
        serde_yaml::Value::Tagged(tagged) if tagged.tag == CHILD_LINK_TAG => {
            tagged.value.as_str().map(str::to_string)
        }
        _ => None,
    }
}

/// Converts a YAML value into an attribute value.
pub fn convert_value(raw: &serde_yaml::Value) -> Result<Value> {
    Ok(match raw {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_yaml::Value::String(s) => Value::Text(s.clone()),
        serde_yaml::Value::Sequence(items) => Value::List(
            items
                .iter()
                .map(convert_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut record = AttributeMap::new();
            for (key, value) in mapping {
                let name = key
                    .as_str()
                    .ok_or_else(|| anyhow!("Record keys must be strings"))?;
                record.insert(name, convert_value(value)?);
            }
            Value::Record(record)
        }
        serde_yaml::Value::Tagged(tagged) => {
            bail!("Unsupported tag {} (child links are only allowed as attributes)", tagged.tag)
        }
    })
}

/// Reads and decompresses a gzipped file to a UTF-8 string.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}
