//! Shared fixtures: markers, trees, call maps and synthetic XMFA blocks.

use cantyper::model::{CallMap, Marker, MarkerCall, MarkerTree};

pub fn marker(id: &str, position: usize, derived: u8, ancestral: u8) -> Marker {
    Marker {
        id: id.to_string(),
        strain: "FSC200".to_string(),
        position,
        derived,
        ancestral,
    }
}

pub fn tree_from_paths(paths: &[&str]) -> MarkerTree {
    let mut tree = MarkerTree::new();
    for path in paths {
        let nodes: Vec<&str> = path.split(';').collect();
        tree.add_path(&nodes);
    }
    tree
}

pub fn calls(entries: &[(&str, MarkerCall)]) -> CallMap {
    entries
        .iter()
        .map(|(id, call)| (id.to_string(), *call))
        .collect()
}

/// One two-sequence XMFA block with its trailing `=` delimiter. `start` and
/// `end` describe the reference span on the original strand.
pub fn xmfa_block(
    start: usize,
    end: usize,
    strand: &str,
    ref_row: &str,
    target_row: &str,
) -> String {
    format!(
        "> 1:{start}-{end} {strand} ref.fa\n{ref_row}\n> 2:1-{len} + query.fa\n{target_row}\n=\n",
        len = target_row.len()
    )
}
