//! Scope visibility and the structural queries built on it.

mod common;

use std::collections::HashSet;

use common::{all_nodes, simulation};
use modeltree::query::Selector;
use modeltree::tree::{ModelTree, NodeId};

fn names(tree: &ModelTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|id| tree.name_of(*id).to_string()).collect()
}

fn subtree_size(tree: &ModelTree, id: NodeId) -> usize {
    1 + tree
        .children_of(id)
        .iter()
        .map(|child| subtree_size(tree, *child))
        .sum::<usize>()
}

#[test]
fn test_scope_visible_from_graph() {
    let sim = simulation();
    assert_eq!(
        names(&sim.tree, &sim.tree.scope_visible(sim.graph1)),
        vec![
            "Graph1",
            "Soil",
            "Field2SubZone",
            "Field2",
            "WeatherFile",
            "Clock",
            "Summary",
            "Field1",
            "Test",
        ]
    );
}

#[test]
fn test_scope_visible_from_nested_zone() {
    let sim = simulation();
    assert_eq!(
        names(&sim.tree, &sim.tree.scope_visible(sim.sub_zone_report)),
        vec![
            "Field2SubZoneReport",
            "Field2SubZone",
            "Graph1",
            "Soil",
            "Field2",
            "WeatherFile",
            "Clock",
            "Summary",
            "Field1",
            "Test",
        ]
    );
}

#[test]
fn test_scope_stops_at_outermost_boundary() {
    let sim = simulation();
    for id in all_nodes(&sim.tree) {
        assert!(
            !sim.tree.scope_visible(id).contains(&sim.tree.root()),
            "root visible from {}",
            sim.tree.name_of(id)
        );
    }
}

#[test]
fn test_scope_visible_has_no_duplicates() {
    let sim = simulation();
    for id in all_nodes(&sim.tree) {
        let visible = sim.tree.scope_visible(id);
        let unique: HashSet<_> = visible.iter().collect();
        assert_eq!(unique.len(), visible.len(), "duplicates from {}", sim.tree.name_of(id));
    }
}

#[test]
fn test_sibling_containers_are_opaque() {
    let sim = simulation();
    let visible = sim.tree.scope_visible(sim.graph1);

    assert!(visible.contains(&sim.soil));
    assert!(!visible.contains(&sim.water));
    assert!(visible.contains(&sim.sub_zone));
    assert!(!visible.contains(&sim.sub_zone_report));
    assert!(visible.contains(&sim.field1));
    assert!(!visible.contains(&sim.field1_report));

    // Expanding every frame fully would reach into Soil and the sub zone
    let expanded = sim.tree.descendants(sim.test, None);
    assert_ne!(expanded.len() + 1, visible.len());
    assert!(expanded.contains(&sim.water));
}

#[test]
fn test_scoped_find_from_zone_and_simulation() {
    let sim = simulation();
    assert_eq!(
        sim.tree.scoped_find(sim.field2, &Selector::name("Soil")),
        Some(sim.soil)
    );
    assert_eq!(
        sim.tree.scoped_find(sim.test, &Selector::name("WeatherFile")),
        Some(sim.weather)
    );
    assert_eq!(
        sim.tree.scoped_find(sim.field1, &Selector::name("WeatherFile")),
        Some(sim.weather)
    );
    assert_eq!(sim.tree.scoped_find(sim.field1, &Selector::name("Water")), None);
}

#[test]
fn test_scoped_find_by_kind_includes_subkinds() {
    let sim = simulation();
    // A frame's children come before the frame itself
    assert_eq!(
        sim.tree.scoped_find(sim.graph1, &Selector::kind("Zone")),
        Some(sim.sub_zone)
    );
    assert_eq!(
        names(&sim.tree, &sim.tree.scoped_find_all(sim.graph1, Some("Zone"))),
        vec!["Field2SubZone", "Field2", "Field1", "Test"]
    );
    assert_eq!(
        sim.tree.scoped_find(sim.graph1, &Selector::kind("Report")),
        None
    );
}

#[test]
fn test_relative_get_is_not_scoped_find() {
    let sim = simulation();
    let err = sim.tree.get(sim.field1, "WeatherFile").unwrap_err();
    assert!(err.is_not_found());
    assert!(sim
        .tree
        .scoped_find(sim.field1, &Selector::name("WeatherFile"))
        .is_some());
}

#[test]
fn test_nearest_ancestor_of_kind() {
    let sim = simulation();
    assert_eq!(
        sim.tree.nearest_ancestor_of_kind(sim.graph1, "Zone"),
        Some(sim.field2)
    );
    assert_eq!(
        sim.tree.nearest_ancestor_of_kind(sim.field2, "Zone"),
        Some(sim.test)
    );
    assert_eq!(
        sim.tree.nearest_ancestor_of_kind(sim.water, "Simulation"),
        Some(sim.test)
    );
    assert_eq!(sim.tree.nearest_ancestor_of_kind(sim.test, "Zone"), None);
    assert_eq!(sim.tree.nearest_ancestor_of_kind(sim.tree.root(), "Zone"), None);
}

#[test]
fn test_sibling_counts() {
    let sim = simulation();
    for id in all_nodes(&sim.tree) {
        let siblings = sim.tree.siblings(id);
        assert!(!siblings.contains(&id));
        match sim.tree.parent(id) {
            Some(parent) => {
                assert_eq!(siblings.len(), sim.tree.children_of(parent).len() - 1)
            }
            None => assert!(siblings.is_empty()),
        }
    }
    assert_eq!(
        names(&sim.tree, &sim.tree.siblings(sim.soil)),
        vec!["Graph1", "Field2SubZone"]
    );
}

#[test]
fn test_descendant_counts() {
    let sim = simulation();
    for id in all_nodes(&sim.tree) {
        assert_eq!(
            sim.tree.descendants(id, None).len(),
            subtree_size(&sim.tree, id) - 1
        );
    }
}

#[test]
fn test_descendants_cross_scope_boundaries() {
    let sim = simulation();
    assert_eq!(
        names(&sim.tree, &sim.tree.descendants(sim.field2, None)),
        vec!["Graph1", "Soil", "Water", "Field2SubZone", "Field2SubZoneReport"]
    );
    assert_eq!(
        names(&sim.tree, &sim.tree.descendants(sim.test, Some("Report"))),
        vec!["Field1Report", "Field2SubZoneReport"]
    );
}

#[test]
fn test_children_by_kind() {
    let sim = simulation();
    assert_eq!(
        names(&sim.tree, &sim.tree.children(sim.test, Some("Zone"))),
        vec!["Field1", "Field2"]
    );
    assert_eq!(sim.tree.children(sim.test, None).len(), 5);
}

#[test]
fn test_full_path_round_trip() {
    let sim = simulation();
    for id in all_nodes(&sim.tree) {
        let path = sim.tree.full_path(id).unwrap();
        for start in all_nodes(&sim.tree) {
            assert_eq!(
                sim.tree.get(start, &path).unwrap().as_node(),
                Some(id),
                "{} from {}",
                path,
                sim.tree.name_of(start)
            );
        }
    }
    assert_eq!(
        sim.tree.full_path(sim.water).unwrap(),
        ".Simulations.Test.Field2.Soil.Water"
    );
}

#[test]
fn test_scope_reflects_mutation() {
    let mut sim = simulation();
    assert!(!sim.tree.scope_visible(sim.graph1).contains(&sim.water));

    sim.tree.move_node(sim.water, sim.field2, 0).unwrap();
    let visible = sim.tree.scope_visible(sim.graph1);
    assert_eq!(visible.first(), Some(&sim.water));

    sim.tree.remove(sim.water).unwrap();
    assert!(!sim.tree.scope_visible(sim.graph1).contains(&sim.water));
}
