use plexgen_core::errors::{ErrorInfo, PlexError};
use plexgen_core::{LayerId, Network, NodeId, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::couplings::Coupling;
use crate::monoplex::MonoplexNetwork;
use crate::multiplex::MultiplexNetwork;

/// Serializes the network to a compact binary representation using `bincode`.
pub fn network_to_bytes(net: &MonoplexNetwork) -> Result<Vec<u8>, PlexError> {
    bincode::serialize(&SerializableNetwork::from_network(net))
        .map_err(|err| PlexError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a network from its binary representation.
pub fn network_from_bytes(bytes: &[u8]) -> Result<MonoplexNetwork, PlexError> {
    let serializable: SerializableNetwork = bincode::deserialize(bytes)
        .map_err(|err| PlexError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_network()
}

/// Serializes the network to a JSON string.
pub fn network_to_json(net: &MonoplexNetwork) -> Result<String, PlexError> {
    serde_json::to_string_pretty(&SerializableNetwork::from_network(net))
        .map_err(|err| PlexError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a network from a JSON string.
pub fn network_from_json(json: &str) -> Result<MonoplexNetwork, PlexError> {
    let serializable: SerializableNetwork = serde_json::from_str(json)
        .map_err(|err| PlexError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_network()
}

/// Serializes a multiplex network to a JSON string.
pub fn multiplex_to_json(net: &MultiplexNetwork) -> Result<String, PlexError> {
    serde_json::to_string_pretty(&SerializableMultiplex::from_network(net))
        .map_err(|err| PlexError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a multiplex network from a JSON string.
pub fn multiplex_from_json(json: &str) -> Result<MultiplexNetwork, PlexError> {
    let serializable: SerializableMultiplex = serde_json::from_str(json)
        .map_err(|err| PlexError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_network()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableNetwork {
    schema_version: SchemaVersion,
    nodes: Vec<u64>,
    edges: Vec<(u64, u64, f64)>,
}

impl SerializableNetwork {
    fn from_network(net: &MonoplexNetwork) -> Self {
        Self {
            schema_version: SchemaVersion::CURRENT,
            nodes: net.nodes().map(|node| node.as_raw()).collect(),
            edges: net
                .edges()
                .into_iter()
                .map(|(a, b, weight)| (a.as_raw(), b.as_raw(), weight))
                .collect(),
        }
    }

    fn into_network(self) -> Result<MonoplexNetwork, PlexError> {
        ensure_schema(&self.schema_version)?;
        let mut net = MonoplexNetwork::new();
        for node in self.nodes {
            net.add_node(NodeId::from_raw(node))?;
        }
        for (a, b, weight) in self.edges {
            net.set_edge_weight(NodeId::from_raw(a), NodeId::from_raw(b), weight)?;
        }
        Ok(net)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableMultiplex {
    schema_version: SchemaVersion,
    coupling: Coupling,
    layers: Vec<(u64, SerializableNetwork)>,
}

impl SerializableMultiplex {
    fn from_network(net: &MultiplexNetwork) -> Self {
        Self {
            schema_version: SchemaVersion::CURRENT,
            coupling: *net.coupling(),
            layers: net
                .layers()
                .map(|(id, layer)| (id.as_raw(), SerializableNetwork::from_network(layer)))
                .collect(),
        }
    }

    fn into_network(self) -> Result<MultiplexNetwork, PlexError> {
        ensure_schema(&self.schema_version)?;
        let mut net = MultiplexNetwork::new(self.coupling);
        for (id, layer) in self.layers {
            let layer_id = LayerId::from_raw(id);
            net.add_layer(layer_id)?;
            net.replace_layer(layer_id, layer.into_network()?)?;
        }
        Ok(net)
    }
}

fn ensure_schema(found: &SchemaVersion) -> Result<(), PlexError> {
    if SchemaVersion::CURRENT.is_compatible_with(found) {
        return Ok(());
    }
    Err(PlexError::Serde(
        ErrorInfo::new("schema-version", "unsupported schema version")
            .with_context("expected", SchemaVersion::CURRENT)
            .with_context("found", found),
    ))
}
