use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::TyperError;

/// Rooted tree over marker ids.
///
/// Node and child order is insertion order: not semantically significant, but
/// kept deterministic so traversal and reporting are reproducible. The tree
/// is read-only input to the classifier.
#[derive(Debug, Clone, Default)]
pub struct MarkerTree {
    children: FxHashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl MarkerTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node without attaching it to a parent.
    pub fn add_node(&mut self, name: &str) {
        if !self.children.contains_key(name) {
            self.children.insert(name.to_string(), Vec::new());
            self.order.push(name.to_string());
        }
    }

    /// Register `child` under `parent`, creating either node as needed.
    /// Re-adding an existing edge is a no-op.
    pub fn add_edge(&mut self, parent: &str, child: &str) {
        self.add_node(parent);
        self.add_node(child);
        let siblings = self.children.get_mut(parent).unwrap();
        if !siblings.iter().any(|c| c == child) {
            siblings.push(child.to_string());
        }
    }

    /// Register a root-to-node path (consecutive parent/child pairs).
    pub fn add_path(&mut self, path: &[&str]) {
        match path {
            [] => {}
            [single] => self.add_node(single),
            _ => {
                for pair in path.windows(2) {
                    self.add_edge(pair[0], pair[1]);
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Ordered children of `node`; empty for leaves and unknown nodes.
    pub fn children(&self, node: &str) -> &[String] {
        self.children.get(node).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// The unique node never listed as a child of any other node.
    ///
    /// Several rootless nodes mean the stored tree is a forest, which is
    /// rejected outright instead of silently picking the first candidate.
    pub fn root(&self) -> Result<&str, TyperError> {
        let mut child_set: FxHashSet<&str> = FxHashSet::default();
        for kids in self.children.values() {
            child_set.extend(kids.iter().map(|c| c.as_str()));
        }
        let mut candidates = self.order.iter().filter(|n| !child_set.contains(n.as_str()));
        let root = candidates.next().ok_or(TyperError::NoRoot)?;
        if let Some(second) = candidates.next() {
            return Err(TyperError::MalformedTree(format!(
                "multiple rootless nodes: '{root}' and '{second}'"
            )));
        }
        Ok(root)
    }
}
