//! Shared fixture for the integration tests.

#![allow(dead_code)]

use modeltree::file::loader::load_tree_str;
use modeltree::tree::{ModelTree, NodeId};

pub const SIMULATION_YAML: &str = include_str!("../fixtures/simulation.yaml");

/// The standard simulation tree with handles to the models tests poke at.
pub struct Simulation {
    pub tree: ModelTree,
    pub test: NodeId,
    pub weather: NodeId,
    pub clock: NodeId,
    pub summary: NodeId,
    pub field1: NodeId,
    pub field1_report: NodeId,
    pub field2: NodeId,
    pub graph1: NodeId,
    pub soil: NodeId,
    pub water: NodeId,
    pub sub_zone: NodeId,
    pub sub_zone_report: NodeId,
}

pub fn simulation() -> Simulation {
    let tree = load_tree_str(SIMULATION_YAML, &[]).unwrap();
    let at = |path: &str| {
        tree.get(tree.root(), path)
            .unwrap()
            .as_node()
            .unwrap_or_else(|| panic!("{} is not a model", path))
    };

    Simulation {
        test: at(".Simulations.Test"),
        weather: at(".Simulations.Test.WeatherFile"),
        clock: at(".Simulations.Test.Clock"),
        summary: at(".Simulations.Test.Summary"),
        field1: at(".Simulations.Test.Field1"),
        field1_report: at(".Simulations.Test.Field1.Field1Report"),
        field2: at(".Simulations.Test.Field2"),
        graph1: at(".Simulations.Test.Field2.Graph1"),
        soil: at(".Simulations.Test.Field2.Soil"),
        water: at(".Simulations.Test.Field2.Soil.Water"),
        sub_zone: at(".Simulations.Test.Field2.Field2SubZone"),
        sub_zone_report: at(".Simulations.Test.Field2.Field2SubZone.Field2SubZoneReport"),
        tree,
    }
}

/// Every node in the tree, root first, in pre-order.
pub fn all_nodes(tree: &ModelTree) -> Vec<NodeId> {
    let mut nodes = vec![tree.root()];
    nodes.extend(tree.descendants(tree.root(), None));
    nodes
}
