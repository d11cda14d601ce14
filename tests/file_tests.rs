//! Integration tests for loading tree descriptions.

mod common;

use std::fs;
use std::io::Write;

use common::{all_nodes, SIMULATION_YAML};
use flate2::write::GzEncoder;
use flate2::Compression;
use modeltree::attribute::{Access, Value};
use modeltree::file::loader::{load_tree_file, load_tree_str};
use modeltree::tree::KindDecl;
use tempfile::{NamedTempFile, TempDir};

fn full_paths(tree: &modeltree::tree::ModelTree) -> Vec<String> {
    all_nodes(tree)
        .into_iter()
        .filter_map(|id| tree.full_path(id))
        .collect()
}

#[test]
fn test_load_simulation_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", SIMULATION_YAML).unwrap();

    let tree = load_tree_file(temp_file.path(), &[]).unwrap();
    assert_eq!(tree.len(), 13);
    assert_eq!(
        full_paths(&tree),
        vec![
            ".Simulations",
            ".Simulations.Test",
            ".Simulations.Test.WeatherFile",
            ".Simulations.Test.Clock",
            ".Simulations.Test.Summary",
            ".Simulations.Test.Field1",
            ".Simulations.Test.Field1.Field1Report",
            ".Simulations.Test.Field2",
            ".Simulations.Test.Field2.Graph1",
            ".Simulations.Test.Field2.Soil",
            ".Simulations.Test.Field2.Soil.Water",
            ".Simulations.Test.Field2.Field2SubZone",
            ".Simulations.Test.Field2.Field2SubZone.Field2SubZoneReport",
        ]
    );
}

#[test]
fn test_loaded_kinds_and_boundaries() {
    let tree = load_tree_str(SIMULATION_YAML, &[]).unwrap();
    let kinds = tree.kinds();
    assert!(kinds.is_a("Simulation", "Zone"));
    assert!(kinds.is_scope_boundary("Simulation"));
    assert!(!kinds.is_scope_boundary("Simulations"));
    assert!(!kinds.contains("Clock"));

    let test = tree.get(tree.root(), ".Simulations.Test").unwrap().as_node().unwrap();
    assert!(tree.node(test).unwrap().is_scope_boundary());
}

#[test]
fn test_loaded_attribute_values() {
    let tree = load_tree_str(SIMULATION_YAML, &[]).unwrap();
    let root = tree.root();
    let value = |path: &str| tree.get(root, path).unwrap().into_value().unwrap();

    assert_eq!(value("WeatherFile.Rain"), Value::Float(0.0));
    assert_eq!(value("Field1.Area"), Value::Int(1));
    assert_eq!(value("Field2.Area"), Value::Float(2.5));
    assert_eq!(value("Clock.StartDate"), Value::from("1990-01-01"));
    assert_eq!(value("Summary.Name"), Value::from("Summary"));

    let weather = tree.get(root, "WeatherFile").unwrap().as_node().unwrap();
    let attributes = tree.node(weather).unwrap().attributes();
    assert_eq!(
        attributes.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        vec!["Rain", "Location", "FileName"]
    );
    assert_eq!(attributes.get("FileName").unwrap().access(), Access::ReadOnly);
    assert_eq!(attributes.get("Rain").unwrap().access(), Access::ReadWrite);
}

#[test]
fn test_child_link_points_at_child() {
    let tree = load_tree_str(SIMULATION_YAML, &[]).unwrap();
    let soil = tree.get(tree.root(), "Soil").unwrap().as_node().unwrap();
    let water = tree.get(tree.root(), "Water").unwrap().as_node().unwrap();
    assert_eq!(
        tree.node(soil).unwrap().attributes().get("Water").unwrap().value(),
        &Value::Node(water)
    );
}

#[test]
fn test_load_gzipped_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let gz_path = temp_dir.path().join("simulation.yaml.gz");

    let file = fs::File::create(&gz_path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(SIMULATION_YAML.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let tree = load_tree_file(&gz_path, &[]).unwrap();
    let plain = load_tree_str(SIMULATION_YAML, &[]).unwrap();
    assert_eq!(full_paths(&tree), full_paths(&plain));
}

#[test]
fn test_corrupted_gzip_fails() {
    let temp_dir = TempDir::new().unwrap();
    let gz_path = temp_dir.path().join("broken.yaml.gz");
    fs::write(&gz_path, b"not gzip at all").unwrap();

    let err = load_tree_file(&gz_path, &[]).unwrap_err();
    assert!(format!("{:#}", err).contains("decompress"));
}

#[test]
fn test_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    assert!(load_tree_file(temp_dir.path().join("nope.yaml"), &[]).is_err());
}

#[test]
fn test_extra_kinds_are_merged() {
    let yaml = r#"
root:
  name: Farm
  kind: Paddock
  children:
    - { name: Crop, kind: Wheat }
"#;
    let extra = vec![
        KindDecl::new("Paddock").scope_boundary(),
        KindDecl::new("Crop"),
        KindDecl::new("Wheat").bases(["Crop"]),
    ];
    let tree = load_tree_str(yaml, &extra).unwrap();
    let crop = tree.children_of(tree.root())[0];
    assert!(tree.node(tree.root()).unwrap().is_scope_boundary());
    assert_eq!(tree.children(tree.root(), Some("Crop")), vec![crop]);
}

#[test]
fn test_description_kinds_override_extra_kinds() {
    let yaml = r#"
kinds:
  - { name: Paddock }
root: { name: Farm, kind: Paddock }
"#;
    let extra = vec![KindDecl::new("Paddock").scope_boundary()];
    let tree = load_tree_str(yaml, &extra).unwrap();
    assert!(!tree.node(tree.root()).unwrap().is_scope_boundary());
}

#[test]
fn test_invalid_descriptions() {
    // Undeclared base kind
    assert!(load_tree_str(
        "kinds: [{ name: Wheat, bases: [Crop] }]\nroot: { name: Farm, kind: Farm }",
        &[]
    )
    .is_err());
    // Parent constraint violated
    assert!(load_tree_str(
        "kinds: [{ name: Soil, valid_parents: [Zone] }]\nroot:\n  name: Farm\n  kind: Farm\n  children: [{ name: Soil, kind: Soil }]",
        &[]
    )
    .is_err());
    // No root
    assert!(load_tree_str("kinds: []", &[]).is_err());
}
