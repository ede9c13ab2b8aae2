use std::collections::BTreeMap;

use plexgen_core::errors::PlexError;
use plexgen_core::{LayerId, Network, NodeId};

use crate::couplings::Coupling;
use crate::monoplex::{network_error, MonoplexNetwork};

/// Fully interconnected multiplex network with a single aspect.
///
/// Every layer holds its own [`MonoplexNetwork`] of intra-layer edges over a shared node set;
/// inter-layer edges are implied by the [`Coupling`] and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiplexNetwork {
    coupling: Coupling,
    layers: BTreeMap<LayerId, MonoplexNetwork>,
}

impl MultiplexNetwork {
    /// Creates an empty multiplex network with the provided coupling.
    pub fn new(coupling: Coupling) -> Self {
        Self {
            coupling,
            layers: BTreeMap::new(),
        }
    }

    /// Returns the coupling configuration.
    pub fn coupling(&self) -> &Coupling {
        &self.coupling
    }

    /// Adds an empty layer holding every node already present in the other layers.
    pub fn add_layer(&mut self, layer: LayerId) -> Result<(), PlexError> {
        if self.layers.contains_key(&layer) {
            return Err(network_error("duplicate-layer", "layer already exists")
                .with_context("layer", layer.as_raw()));
        }
        let mut net = MonoplexNetwork::new();
        for node in self.shared_nodes() {
            net.add_node(node)?;
        }
        self.layers.insert(layer, net);
        Ok(())
    }

    /// Adds a node to every layer.
    pub fn add_node(&mut self, node: NodeId) -> Result<(), PlexError> {
        for net in self.layers.values_mut() {
            net.add_node(node)?;
        }
        Ok(())
    }

    /// Returns the intra-layer network of `layer`.
    pub fn layer(&self, layer: LayerId) -> Result<&MonoplexNetwork, PlexError> {
        self.layers.get(&layer).ok_or_else(|| unknown_layer(layer))
    }

    /// Returns the mutable intra-layer network of `layer`.
    pub fn layer_mut(&mut self, layer: LayerId) -> Result<&mut MonoplexNetwork, PlexError> {
        self.layers.get_mut(&layer).ok_or_else(|| unknown_layer(layer))
    }

    /// Replaces the intra-layer network of an existing layer.
    pub fn replace_layer(&mut self, layer: LayerId, net: MonoplexNetwork) -> Result<(), PlexError> {
        *self.layer_mut(layer)? = net;
        Ok(())
    }

    /// Returns the layers in ascending order.
    pub fn layers(&self) -> impl ExactSizeIterator<Item = (LayerId, &MonoplexNetwork)> + '_ {
        self.layers.iter().map(|(id, net)| (*id, net))
    }

    /// Returns the number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns the union of the nodes of all layers.
    pub fn shared_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .layers
            .values()
            .flat_map(|net| net.nodes())
            .collect();
        nodes.sort();
        nodes.dedup();
        nodes
    }

    /// Returns the weight of the coupling edge joining `node` in `layer_a` to `node` in `layer_b`.
    pub fn interlayer_weight(
        &self,
        node: NodeId,
        layer_a: LayerId,
        layer_b: LayerId,
    ) -> Result<Option<f64>, PlexError> {
        let a = self.layer(layer_a)?;
        let b = self.layer(layer_b)?;
        if !a.contains_node(node) || !b.contains_node(node) {
            return Ok(None);
        }
        Ok(self
            .coupling
            .weight_between(layer_a.as_raw(), layer_b.as_raw()))
    }

    /// Returns the total number of intra-layer edges.
    pub fn intra_edge_count(&self) -> usize {
        self.layers.values().map(|net| net.edge_count()).sum()
    }
}

fn unknown_layer(layer: LayerId) -> PlexError {
    network_error("unknown-layer", "layer does not exist").with_context("layer", layer.as_raw())
}
