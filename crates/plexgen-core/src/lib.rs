#![deny(missing_docs)]
#![doc = "Core identifiers, the mutable network contract, errors and deterministic seeding shared by the plexgen crates."]

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod rng;
pub mod schema;

pub use errors::{ErrorInfo, PlexError};
pub use rng::{derive_substream_seed, RngHandle};
pub use schema::SchemaVersion;

/// Identifier for a node within a network layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Identifier for a layer of a multiplex network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(u64);

impl LayerId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Returns the unordered pair `(a, b)` in canonical (ascending) order.
pub fn ordered_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Mutable, undirected, weighted network that generators write into.
///
/// Edges are keyed by unordered node pairs. An absent edge reads as `None`; there is no
/// stored zero weight.
pub trait Network {
    /// Registers a node. Adding a node that already exists is a no-op.
    fn add_node(&mut self, node: NodeId) -> Result<(), PlexError>;

    /// Returns whether the node is registered.
    fn contains_node(&self, node: NodeId) -> bool;

    /// Returns an iterator over all registered nodes in ascending order.
    fn nodes(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_>;

    /// Returns the weight of the edge between `a` and `b`, if present.
    fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64>;

    /// Sets the weight of the edge between `a` and `b`, registering both endpoints.
    ///
    /// A weight of zero removes the edge.
    fn set_edge_weight(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<(), PlexError>;

    /// Removes the edge between `a` and `b`, failing when it is absent.
    fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), PlexError>;

    /// Returns the number of distinct neighbours of `node`.
    fn degree(&self, node: NodeId) -> Result<usize, PlexError>;

    /// Returns the number of stored edges.
    fn edge_count(&self) -> usize;

    /// Returns whether an edge between `a` and `b` is present.
    fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_weight(a, b).is_some()
    }
}
