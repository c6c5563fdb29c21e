//! Lineage classification: greedy depth-first descent of the marker tree.
//!
//! Real sequencing data has coverage gaps and occasional miscalls; a strict
//! all-derived descent would halt at the first gap. The walker therefore
//! carries a global forcing budget (`threshold`): a node whose call
//! contradicts the derived path can still be forced through, up to that many
//! markers across the whole accepted path.
//!
//! The descent is an explicit DFS over immutable state. Accumulators are
//! passed by value and a failed branch simply drops its copy, so probing a
//! subtree never leaks partial forced markers into the final result.

use rustc_hash::FxHashSet;

use crate::error::TyperError;
use crate::model::{CallMap, MarkerCall, MarkerTree};

/// Terminal output of a classification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Best-supported tree node, or `None` when not even the root held.
    pub node: Option<String>,
    /// Markers accepted despite a non-derived call, in descent order.
    pub forced: Vec<String>,
    /// Markers the tree names but the call map never saw, in probe order.
    pub missing: Vec<String>,
}

/// Outcome of descending into one subtree.
struct Descent {
    node: Option<String>,
    forced: Vec<String>,
}

/// Missing-marker log, ordered and deduplicated.
#[derive(Default)]
struct MissingLog {
    seen: FxHashSet<String>,
    order: Vec<String>,
}

impl MissingLog {
    fn record(&mut self, marker: &str) {
        if self.seen.insert(marker.to_string()) {
            self.order.push(marker.to_string());
        }
    }
}

pub struct TreeWalker<'a> {
    tree: &'a MarkerTree,
    calls: &'a CallMap,
    threshold: usize,
}

impl<'a> TreeWalker<'a> {
    pub fn new(tree: &'a MarkerTree, calls: &'a CallMap, threshold: usize) -> Self {
        Self {
            tree,
            calls,
            threshold,
        }
    }

    /// Walk from the tree root to the most specific supported node.
    pub fn classify(&self) -> Result<Classification, TyperError> {
        let root = self.tree.root()?;
        let mut missing = MissingLog::default();
        let outcome = self.descend(root, Vec::new(), false, 0, &mut missing)?;
        Ok(Classification {
            node: outcome.node,
            forced: outcome.forced,
            missing: missing.order,
        })
    }

    /// Quiet single-node probe: does `node` alone let the walk continue?
    ///
    /// Unforced, only a derived call passes. Forced, any recorded call
    /// passes (the mismatch is charged to the budget during the real
    /// descent). A marker absent from the call map never passes and is
    /// logged once as missing.
    fn probe(&self, node: &str, force: bool, missing: &mut MissingLog) -> bool {
        match self.calls.get(node) {
            Some(MarkerCall::Derived) => true,
            Some(_) => force,
            None => {
                missing.record(node);
                false
            }
        }
    }

    fn descend(
        &self,
        node: &str,
        mut forced: Vec<String>,
        force: bool,
        depth: usize,
        missing: &mut MissingLog,
    ) -> Result<Descent, TyperError> {
        // Depth is bounded by the node count in any acyclic tree.
        if depth > self.tree.node_count() {
            return Err(TyperError::MalformedTree(format!(
                "cycle detected while descending through '{node}'"
            )));
        }

        let call = match self.calls.get(node) {
            Some(call) => *call,
            None => {
                missing.record(node);
                return Ok(Descent { node: None, forced });
            }
        };
        let derived = call == MarkerCall::Derived;
        if !derived && !force {
            return Ok(Descent { node: None, forced });
        }
        if !derived && !forced.iter().any(|f| f == node) {
            forced.push(node.to_string());
        }

        let children = self.tree.children(node);
        if children.is_empty() {
            return Ok(Descent {
                node: Some(node.to_string()),
                forced,
            });
        }

        // Unforced pass: first child consistent on its own wins the descent.
        for child in children {
            if self.probe(child, false, missing) {
                let result = self.descend(child, forced.clone(), false, depth + 1, missing)?;
                if result.node.is_some() {
                    return Ok(result);
                }
            }
        }

        // No clean child and no forcing budget left: the walk bottoms out.
        if forced.len() >= self.threshold {
            return Ok(self.settle(node, derived, forced));
        }

        // Forced pass: tolerate a mismatch at the child to push through a
        // gap in coverage.
        for child in children {
            if self.probe(child, true, missing) {
                let result = self.descend(child, forced.clone(), true, depth + 1, missing)?;
                if result.node.is_some() {
                    return Ok(result);
                }
            }
        }

        Ok(self.settle(node, derived, forced))
    }

    /// Accept `node` itself if its own call was derived, otherwise reject it
    /// and withdraw its speculative forced-list entry.
    fn settle(&self, node: &str, derived: bool, mut forced: Vec<String>) -> Descent {
        if derived {
            Descent {
                node: Some(node.to_string()),
                forced,
            }
        } else {
            forced.retain(|f| f != node);
            Descent { node: None, forced }
        }
    }
}
