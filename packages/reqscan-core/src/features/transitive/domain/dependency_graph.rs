//! Working dependency graph (petgraph)
//!
//! Lives for one expansion only. Nodes are normalized distribution names;
//! an edge A → B means A declares a dependency on B.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Declared dependency between two closure members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    /// Version specifier as declared, possibly empty
    pub constraint: String,
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, DependencyEdge>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node for a normalized name, created on first use
    pub fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn add_edge(&mut self, edge: DependencyEdge) {
        let from = self.node(&edge.from);
        let to = self.node(&edge.to);
        self.graph.add_edge(from, to, edge);
    }

    /// Dependency cycles (SCCs with more than one member, or self-loops)
    pub fn cycles(&self) -> Vec<Vec<String>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut names: Vec<String> = scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                names.sort();
                names
            })
            .collect()
    }

    /// Direct dependencies of a node, in declaration order
    pub fn dependencies(&self, name: &str) -> Vec<&DependencyEdge> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut edges: Vec<&DependencyEdge> = self
            .graph
            .edges(idx)
            .map(|e| e.weight())
            .collect();
        // petgraph iterates outgoing edges newest first
        edges.reverse();
        edges
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
