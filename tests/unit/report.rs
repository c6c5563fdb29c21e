//! Tests for report rendering and Newick export.

use cantyper::classify::Classification;
use cantyper::error::TyperError;
use cantyper::model::MarkerCall::{Ancestral, Derived};
use cantyper::report::{to_newick, write_calls, write_report};
use cantyper::runner::RunSummary;

use super::helpers::{calls, tree_from_paths};

fn summary(node: Option<&str>, forced: &[&str], missing: &[&str]) -> RunSummary {
    RunSummary {
        classification: Classification {
            node: node.map(|n| n.to_string()),
            forced: forced.iter().map(|s| s.to_string()).collect(),
            missing: missing.iter().map(|s| s.to_string()).collect(),
        },
        calls: calls(&[]),
        reference_warnings: Vec::new(),
    }
}

fn render(summary: &RunSummary, tab_sep: bool) -> String {
    let mut buf = Vec::new();
    write_report(&mut buf, "query.fa", summary, tab_sep).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_human_report_successful_classification() {
    let text = render(&summary(Some("B.6"), &[], &[]), false);
    assert!(text.contains("Classified as: B.6"));
    assert!(!text.contains("forced"));
}

#[test]
fn test_human_report_lists_forced_and_missing_markers() {
    let text = render(&summary(Some("B.6"), &["B.3", "B.5"], &["B.9"]), false);
    assert!(text.contains("Classified as: B.6 (2 forced marker(s): B.3, B.5)"));
    assert!(text.contains("Markers not in database: B.9"));
}

#[test]
fn test_human_report_failure() {
    let text = render(&summary(None, &[], &[]), false);
    assert!(text.contains("Classification failed"));
}

#[test]
fn test_tab_separated_report_line() {
    let text = render(&summary(Some("B.6"), &["B.3"], &[]), true);
    assert_eq!(text, "query.fa\tB.6\tB.3\t-\n");

    let text = render(&summary(None, &[], &[]), true);
    assert_eq!(text, "query.fa\t-\t-\t-\n");
}

#[test]
fn test_reference_warnings_are_rendered() {
    let mut s = summary(Some("B.6"), &[], &[]);
    s.reference_warnings
        .push("OSU18: aligner failed".to_string());
    let text = render(&s, false);
    assert!(text.contains("Reference warning: OSU18: aligner failed"));
}

#[test]
fn test_write_calls_sorted_by_marker_id() {
    let map = calls(&[("B.2", Ancestral), ("B.1", Derived)]);
    let mut buf = Vec::new();
    write_calls(&mut buf, &map).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "B.1\tderived\nB.2\tancestral\n"
    );
}

#[test]
fn test_newick_serialization() {
    let tree = tree_from_paths(&["ROOT;N1", "ROOT;N2;N3", "ROOT;N2;N4"]);
    assert_eq!(to_newick(&tree).unwrap(), "(N1,(N3,N4)N2)ROOT;");
}

#[test]
fn test_newick_single_node_tree() {
    let tree = tree_from_paths(&["ROOT"]);
    assert_eq!(to_newick(&tree).unwrap(), "ROOT;");
}

#[test]
fn test_newick_detects_cycles() {
    let tree = tree_from_paths(&["R;A;B", "B;A"]);
    assert!(matches!(
        to_newick(&tree),
        Err(TyperError::MalformedTree(_))
    ));
}
