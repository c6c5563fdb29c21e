//! Result rendering: human-readable and tab-separated reports, per-marker
//! call listings, and Newick export of a marker tree.

use std::io::Write;

use crate::error::TyperError;
use crate::model::{CallMap, MarkerTree};
use crate::runner::RunSummary;

/// Write the classification report for one query.
///
/// Human-readable by default; `tab_sep` switches to a single
/// `query  node  forced  missing` line ("-" for empty fields) for
/// downstream tooling.
pub fn write_report<W: Write>(
    w: &mut W,
    query: &str,
    summary: &RunSummary,
    tab_sep: bool,
) -> std::io::Result<()> {
    let c = &summary.classification;
    if tab_sep {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            query,
            c.node.as_deref().unwrap_or("-"),
            join_or_dash(&c.forced),
            join_or_dash(&c.missing),
        )?;
        return Ok(());
    }

    writeln!(w, "# cantyper report for {query}")?;
    match &c.node {
        Some(node) => {
            if c.forced.is_empty() {
                writeln!(w, "Classified as: {node}")?;
            } else {
                writeln!(
                    w,
                    "Classified as: {node} ({} forced marker(s): {})",
                    c.forced.len(),
                    c.forced.join(", ")
                )?;
            }
        }
        None => writeln!(w, "Classification failed: no derived call at the tree root")?,
    }
    if !c.missing.is_empty() {
        writeln!(w, "Markers not in database: {}", c.missing.join(", "))?;
    }
    for warning in &summary.reference_warnings {
        writeln!(w, "Reference warning: {warning}")?;
    }
    Ok(())
}

/// List every marker's call state, sorted by marker id.
pub fn write_calls<W: Write>(w: &mut W, calls: &CallMap) -> std::io::Result<()> {
    let mut ids: Vec<&String> = calls.keys().collect();
    ids.sort();
    for id in ids {
        writeln!(w, "{id}\t{}", calls[id].as_str())?;
    }
    Ok(())
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(",")
    }
}

/// Serialize a marker tree in Newick format, e.g. `(N1,(N6)N5)ROOT;`.
pub fn to_newick(tree: &MarkerTree) -> Result<String, TyperError> {
    let root = tree.root()?;
    let mut out = String::new();
    node_newick(tree, root, 0, &mut out)?;
    out.push(';');
    Ok(out)
}

fn node_newick(
    tree: &MarkerTree,
    node: &str,
    depth: usize,
    out: &mut String,
) -> Result<(), TyperError> {
    if depth > tree.node_count() {
        return Err(TyperError::MalformedTree(format!(
            "cycle detected while serializing through '{node}'"
        )));
    }
    let children = tree.children(node);
    if !children.is_empty() {
        out.push('(');
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            node_newick(tree, child, depth + 1, out)?;
        }
        out.push(')');
    }
    out.push_str(node);
    Ok(())
}
