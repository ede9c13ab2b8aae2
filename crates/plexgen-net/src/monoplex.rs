use std::collections::{BTreeMap, BTreeSet};

use plexgen_core::errors::{ErrorInfo, PlexError};
use plexgen_core::{ordered_pair, Network, NodeId};

/// Undirected weighted network with a single layer.
///
/// Adjacency is stored symmetrically so degree queries are a map lookup. A self-loop is
/// stored once under its node and counts as one neighbour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonoplexNetwork {
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
    edge_count: usize,
}

impl MonoplexNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a network holding the nodes `0..n` and no edges.
    pub fn with_nodes(n: u64) -> Self {
        let mut net = Self::new();
        for raw in 0..n {
            net.adjacency.insert(NodeId::from_raw(raw), BTreeMap::new());
        }
        net
    }

    /// Returns the number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the neighbours of `node` with the weights of the connecting edges.
    pub fn neighbours(&self, node: NodeId) -> Result<&BTreeMap<NodeId, f64>, PlexError> {
        self.adjacency.get(&node).ok_or_else(|| {
            network_error("unknown-node", "node does not exist").with_context("node", node.as_raw())
        })
    }

    /// Returns every edge once as `(a, b, weight)` with `a <= b`, in ascending order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (node, neighbours) in &self.adjacency {
            for (other, weight) in neighbours.range(*node..) {
                edges.push((*node, *other, *weight));
            }
        }
        edges
    }

    /// Returns whether any node is connected to itself.
    pub fn has_self_loops(&self) -> bool {
        self.adjacency
            .iter()
            .any(|(node, neighbours)| neighbours.contains_key(node))
    }

    /// Returns the set of nodes whose degree is positive.
    pub fn connected_nodes(&self) -> BTreeSet<NodeId> {
        self.adjacency
            .iter()
            .filter(|(_, neighbours)| !neighbours.is_empty())
            .map(|(node, _)| *node)
            .collect()
    }

    fn insert_half(&mut self, from: NodeId, to: NodeId, weight: f64) -> Option<f64> {
        self.adjacency.entry(from).or_default().insert(to, weight)
    }

    fn remove_half(&mut self, from: NodeId, to: NodeId) -> Option<f64> {
        self.adjacency
            .get_mut(&from)
            .and_then(|neighbours| neighbours.remove(&to))
    }
}

impl Network for MonoplexNetwork {
    fn add_node(&mut self, node: NodeId) -> Result<(), PlexError> {
        self.adjacency.entry(node).or_default();
        Ok(())
    }

    fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    fn nodes(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_> {
        Box::new(self.adjacency.keys().copied())
    }

    fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.adjacency
            .get(&a)
            .and_then(|neighbours| neighbours.get(&b))
            .copied()
    }

    fn set_edge_weight(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<(), PlexError> {
        if !weight.is_finite() {
            return Err(network_error("invalid-weight", "edge weight must be finite")
                .with_context("a", a.as_raw())
                .with_context("b", b.as_raw()));
        }
        if weight == 0.0 {
            if self.has_edge(a, b) {
                self.remove_edge(a, b)?;
            }
            return Ok(());
        }
        let (a, b) = ordered_pair(a, b);
        self.add_node(a)?;
        self.add_node(b)?;
        let previous = self.insert_half(a, b, weight);
        if a != b {
            self.insert_half(b, a, weight);
        }
        if previous.is_none() {
            self.edge_count += 1;
        }
        Ok(())
    }

    fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), PlexError> {
        if self.remove_half(a, b).is_none() {
            return Err(network_error("missing-edge", "edge is not present")
                .with_context("a", a.as_raw())
                .with_context("b", b.as_raw()));
        }
        if a != b {
            self.remove_half(b, a);
        }
        self.edge_count -= 1;
        Ok(())
    }

    fn degree(&self, node: NodeId) -> Result<usize, PlexError> {
        Ok(self.neighbours(node)?.len())
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }
}

pub(crate) fn network_error(code: impl Into<String>, message: impl Into<String>) -> PlexError {
    PlexError::Network(ErrorInfo::new(code, message))
}
