use std::collections::{BTreeMap, BTreeSet};

use plexgen_core::errors::PlexError;
use plexgen_core::{ordered_pair, Network, NodeId, RngHandle};
use rand::seq::SliceRandom;

use crate::degree_sequence::DegreeSequence;

/// Unordered node pair in canonical order.
pub(crate) type Pair = (NodeId, NodeId);

/// Flat list of node stubs. Positions `2k` and `2k + 1` form slot `k`, one candidate edge.
#[derive(Debug, Clone)]
pub(crate) struct StubPool {
    stubs: Vec<NodeId>,
    node_count: usize,
    connected_nodes: usize,
}

impl StubPool {
    /// Unrolls the histogram: node `i` appears once per unit of its target degree.
    pub(crate) fn from_degree_sequence(degs: &DegreeSequence) -> Self {
        let mut stubs = Vec::with_capacity(degs.stub_count());
        for (idx, degree) in degs.node_degrees().enumerate() {
            let node = NodeId::from_raw(idx as u64);
            stubs.extend(std::iter::repeat(node).take(degree));
        }
        Self {
            stubs,
            node_count: degs.node_count(),
            connected_nodes: degs.connected_node_count(),
        }
    }

    pub(crate) fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count as u64).map(NodeId::from_raw)
    }

    pub(crate) fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of distinct nodes owning at least one stub.
    pub(crate) fn connected_nodes(&self) -> usize {
        self.connected_nodes
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.stubs.len() / 2
    }

    pub(crate) fn shuffle(&mut self, rng: &mut RngHandle) {
        self.stubs.shuffle(rng);
    }

    /// Returns the two endpoints stored at the slot starting at `position`.
    pub(crate) fn slot(&self, position: usize) -> (NodeId, NodeId) {
        (self.stubs[position], self.stubs[position + 1])
    }

    /// Overwrites the slot starting at `position` with the canonical pair `(a, b)`.
    pub(crate) fn write_slot(&mut self, position: usize, a: NodeId, b: NodeId) {
        let (a, b) = ordered_pair(a, b);
        self.stubs[position] = a;
        self.stubs[position + 1] = b;
    }

    /// Returns the canonical pair of every slot with the slot's starting position.
    pub(crate) fn pairs(&self) -> impl Iterator<Item = (usize, Pair)> + '_ {
        self.stubs
            .chunks_exact(2)
            .enumerate()
            .map(|(slot, pair)| (2 * slot, ordered_pair(pair[0], pair[1])))
    }

    #[cfg(test)]
    pub(crate) fn stub_histogram(&self) -> BTreeMap<NodeId, usize> {
        let mut histogram = BTreeMap::new();
        for node in &self.stubs {
            *histogram.entry(*node).or_insert(0) += 1;
        }
        histogram
    }
}

/// Classification of the initial random matching.
#[derive(Debug, Default)]
pub(crate) struct Pairing {
    /// Slot positions whose pairing produced each node pair.
    pub(crate) edge_index: BTreeMap<Pair, Vec<usize>>,
    /// Slot positions where a node was paired with itself.
    pub(crate) self_edges: BTreeMap<NodeId, Vec<usize>>,
    /// Pairs produced by more than one slot. Frozen for the rest of the generation.
    pub(crate) multi_edges: BTreeSet<Pair>,
}

impl Pairing {
    /// Scans the slots in order, committing the first copy of each simple edge to `net`.
    pub(crate) fn classify<N: Network + ?Sized>(
        pool: &StubPool,
        net: &mut N,
    ) -> Result<Self, PlexError> {
        let mut pairing = Pairing::default();
        for (position, (a, b)) in pool.pairs() {
            pairing
                .edge_index
                .entry((a, b))
                .or_default()
                .push(position);
            if a == b {
                pairing.self_edges.entry(a).or_default().push(position);
            } else if net.has_edge(a, b) {
                pairing.multi_edges.insert((a, b));
            } else {
                net.set_edge_weight(a, b, 1.0)?;
            }
        }
        Ok(pairing)
    }

    pub(crate) fn self_loop_count(&self) -> usize {
        self.self_edges.values().map(Vec::len).sum()
    }

    /// Number of duplicate pairings beyond the first copy, summed over all multi-edges.
    pub(crate) fn excess_pairings(&self) -> usize {
        self.multi_edges
            .iter()
            .filter_map(|pair| self.edge_index.get(pair))
            .map(|positions| positions.len() - 1)
            .sum()
    }
}

/// Returns whether no node occurs twice.
pub(crate) fn all_distinct(nodes: &[NodeId]) -> bool {
    nodes
        .iter()
        .enumerate()
        .all(|(idx, node)| !nodes[idx + 1..].contains(node))
}
