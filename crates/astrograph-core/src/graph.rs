//! The labeled directed graph every language plugin compiles a code unit
//! down to before fingerprinting.
//!
//! Node identity is positional (dense indices from 0), and children are
//! stored in the exact order a plugin inserted them — that order is part
//! of the structural identity the fingerprinter hashes over, so this type
//! deliberately does not use an adjacency structure whose iteration order
//! can diverge from insertion order (petgraph's `StableDiGraph` prepends
//! to per-node edge lists, which would invert it).

use serde::{Deserialize, Serialize};

/// Stable, dense-from-0 identifier for a node within one `LabeledGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// An opaque structural label. Plugins derive these from syntax node kinds
/// only — never from source text — per the labeling discipline in
/// `LanguagePlugin`: identifiers collapse to one token, literals to
/// another, and operators collapse to a generic class when normalization
/// is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(pub String);

impl Label {
    pub fn new(s: impl Into<String>) -> Self {
        Label(s.into())
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    label: Label,
    children: Vec<NodeId>,
}

/// A directed graph with a single root, ordered children, and no edge
/// payload. See module docs for why node ordering is load-bearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledGraph {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl LabeledGraph {
    pub fn new() -> Self {
        LabeledGraph { nodes: Vec::new(), root: None }
    }

    /// Add a node and return its id. The first node added becomes the root
    /// unless `set_root` is called explicitly afterwards.
    pub fn add_node(&mut self, label: Label) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { label, children: Vec::new() });
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    pub fn set_root(&mut self, id: NodeId) {
        debug_assert!((id.0 as usize) < self.nodes.len());
        self.root = Some(id);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Record `child` as the next child of `parent`, in insertion order.
    ///
    /// # Panics
    /// Panics if either id is out of range — both ids must come from
    /// `add_node` calls on this same graph.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0 as usize].children.push(child);
    }

    pub fn label(&self, id: NodeId) -> Option<&Label> {
        self.nodes.get(id.0 as usize).map(|n| &n.label)
    }

    /// Children of `id`, in the order they were added.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0 as usize).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate node ids in ascending (insertion) order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    /// `true` iff every edge references an existing node id, every node
    /// except possibly the root is reachable at most once from the root
    /// (the graph is a tree, matching the CST it was derived from), and a
    /// root is designated when the graph is non-empty.
    pub fn is_well_formed(&self) -> bool {
        if self.nodes.is_empty() {
            return self.root.is_none();
        }
        let Some(root) = self.root else { return false };
        if root.0 as usize >= self.nodes.len() {
            return false;
        }
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let idx = id.0 as usize;
            if idx >= self.nodes.len() {
                return false;
            }
            if visited[idx] {
                return false; // a CST-derived tree never revisits a node
            }
            visited[idx] = true;
            for &child in &self.nodes[idx].children {
                stack.push(child);
            }
        }
        true
    }
}

impl Default for LabeledGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_defaults_to_first_node() {
        let mut g = LabeledGraph::new();
        let root = g.add_node(Label::new("function_definition"));
        let child = g.add_node(Label::new("identifier"));
        g.add_child(root, child);

        assert_eq!(g.root(), Some(root));
        assert_eq!(g.children(root), &[child]);
        assert!(g.is_well_formed());
    }

    #[test]
    fn children_preserve_insertion_order() {
        let mut g = LabeledGraph::new();
        let root = g.add_node(Label::new("block"));
        let a = g.add_node(Label::new("identifier"));
        let b = g.add_node(Label::new("literal"));
        let c = g.add_node(Label::new("binary_op"));
        g.add_child(root, a);
        g.add_child(root, b);
        g.add_child(root, c);

        assert_eq!(g.children(root), &[a, b, c]);
    }

    #[test]
    fn empty_graph_is_well_formed() {
        assert!(LabeledGraph::new().is_well_formed());
    }
}
