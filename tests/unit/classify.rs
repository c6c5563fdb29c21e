//! Tests for the tree-walking lineage classifier.

use cantyper::classify::TreeWalker;
use cantyper::error::TyperError;
use cantyper::model::MarkerCall::{Ancestral, Derived, NotFound};

use super::helpers::{calls, tree_from_paths};

#[test]
fn test_strict_descent_reaches_leaf_with_empty_forced_list() {
    let tree = tree_from_paths(&["R;A;L", "R;S1", "R;A;S2"]);
    let map = calls(&[
        ("R", Derived),
        ("A", Derived),
        ("L", Derived),
        ("S1", Ancestral),
        ("S2", Ancestral),
    ]);
    let result = TreeWalker::new(&tree, &map, 0).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("L"));
    assert!(result.forced.is_empty());
    assert!(result.missing.is_empty());
}

#[test]
fn test_single_ancestral_marker_forced_within_threshold() {
    let tree = tree_from_paths(&["R;A;L"]);
    let map = calls(&[("R", Derived), ("A", Ancestral), ("L", Derived)]);

    let result = TreeWalker::new(&tree, &map, 1).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("L"));
    assert_eq!(result.forced, vec!["A".to_string()]);
}

#[test]
fn test_zero_threshold_stops_at_deepest_unforced_node() {
    let tree = tree_from_paths(&["R;A;L"]);
    let map = calls(&[("R", Derived), ("A", Ancestral), ("L", Derived)]);

    let result = TreeWalker::new(&tree, &map, 0).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("R"));
    assert!(result.forced.is_empty());
}

#[test]
fn test_forcing_budget_is_global_not_per_branch() {
    // Two consecutive gaps need a budget of two.
    let tree = tree_from_paths(&["R;A;B;L"]);
    let map = calls(&[
        ("R", Derived),
        ("A", Ancestral),
        ("B", Ancestral),
        ("L", Derived),
    ]);

    let result = TreeWalker::new(&tree, &map, 2).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("L"));
    assert_eq!(result.forced, vec!["A".to_string(), "B".to_string()]);

    // With a budget of one the walk is stopped after the first forced
    // marker, and the dead-end node's speculative entry is withdrawn.
    let result = TreeWalker::new(&tree, &map, 1).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("R"));
    assert!(result.forced.is_empty());
}

#[test]
fn test_missing_marker_stops_descent_and_is_reported() {
    let tree = tree_from_paths(&["R;A;L"]);
    // A is in the tree but was never called.
    let map = calls(&[("R", Derived), ("L", Derived)]);

    let result = TreeWalker::new(&tree, &map, 1).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("R"));
    assert!(result.forced.is_empty());
    assert_eq!(result.missing, vec!["A".to_string()]);
}

#[test]
fn test_missing_root_rejects_whole_classification() {
    let tree = tree_from_paths(&["R;A"]);
    let map = calls(&[("A", Derived)]);

    let result = TreeWalker::new(&tree, &map, 0).classify().unwrap();
    assert_eq!(result.node, None);
    assert_eq!(result.missing, vec!["R".to_string()]);
}

#[test]
fn test_ancestral_root_rejects_whole_classification() {
    let tree = tree_from_paths(&["R;A"]);
    let map = calls(&[("R", Ancestral), ("A", Derived)]);

    let result = TreeWalker::new(&tree, &map, 0).classify().unwrap();
    assert_eq!(result.node, None);
    assert!(result.forced.is_empty());
}

#[test]
fn test_derived_sibling_wins_over_notfound_sibling() {
    let tree = tree_from_paths(&["Root;A;B", "Root;A;C"]);
    let map = calls(&[
        ("Root", Derived),
        ("A", Derived),
        ("B", Derived),
        ("C", NotFound),
    ]);

    let result = TreeWalker::new(&tree, &map, 0).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("B"));
    assert!(result.forced.is_empty());
}

#[test]
fn test_no_consistent_child_bottoms_out_at_parent() {
    let tree = tree_from_paths(&["Root;A;B", "Root;A;C"]);
    let map = calls(&[
        ("Root", Derived),
        ("A", Derived),
        ("B", Ancestral),
        ("C", NotFound),
    ]);

    let result = TreeWalker::new(&tree, &map, 0).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("A"));
    assert!(result.forced.is_empty());
}

#[test]
fn test_forced_leaf_is_accepted_and_listed() {
    let tree = tree_from_paths(&["R;A;L"]);
    let map = calls(&[("R", Derived), ("A", Ancestral), ("L", Ancestral)]);

    let result = TreeWalker::new(&tree, &map, 5).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("L"));
    assert_eq!(result.forced, vec!["A".to_string(), "L".to_string()]);
}

#[test]
fn test_probing_missing_children_warns_once() {
    let tree = tree_from_paths(&["R;A", "R;B"]);
    let map = calls(&[("R", Derived)]);

    let result = TreeWalker::new(&tree, &map, 0).classify().unwrap();
    assert_eq!(result.node.as_deref(), Some("R"));
    assert_eq!(result.missing, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_no_root_is_fatal() {
    // Every node is somebody's child.
    let tree = tree_from_paths(&["A;B", "B;A"]);
    let map = calls(&[("A", Derived), ("B", Derived)]);
    assert!(matches!(
        TreeWalker::new(&tree, &map, 0).classify(),
        Err(TyperError::NoRoot)
    ));
}

#[test]
fn test_multiple_roots_are_fatal() {
    let tree = tree_from_paths(&["R1;A", "R2;B"]);
    let map = calls(&[("R1", Derived), ("A", Derived)]);
    assert!(matches!(
        TreeWalker::new(&tree, &map, 0).classify(),
        Err(TyperError::MalformedTree(_))
    ));
}

#[test]
fn test_cycle_below_root_is_detected() {
    let tree = tree_from_paths(&["R;A;B", "B;A"]);
    let map = calls(&[("R", Derived), ("A", Derived), ("B", Derived)]);
    assert!(matches!(
        TreeWalker::new(&tree, &map, 0).classify(),
        Err(TyperError::MalformedTree(_))
    ));
}
