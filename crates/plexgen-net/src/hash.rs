use sha2::{Digest, Sha256};

use plexgen_core::Network;

use crate::couplings::Coupling;
use crate::monoplex::MonoplexNetwork;
use crate::multiplex::MultiplexNetwork;

/// Computes the canonical structural hash of a monoplex network.
///
/// Two networks hash equal exactly when they hold the same nodes and the same weighted edges.
pub fn canonical_hash(net: &MonoplexNetwork) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"monoplex");
    encode_layer(net, &mut hasher);
    format!("{:x}", hasher.finalize())
}

/// Computes the canonical structural hash of a multiplex network, coupling included.
pub fn multiplex_hash(net: &MultiplexNetwork) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"multiplex");
    encode_coupling(net.coupling(), &mut hasher);
    hasher.update((net.layer_count() as u64).to_le_bytes());
    for (layer, layer_net) in net.layers() {
        hasher.update(layer.as_raw().to_le_bytes());
        encode_layer(layer_net, &mut hasher);
    }
    format!("{:x}", hasher.finalize())
}

fn encode_layer(net: &MonoplexNetwork, hasher: &mut Sha256) {
    hasher.update((net.node_count() as u64).to_le_bytes());
    for node in net.nodes() {
        hasher.update(node.as_raw().to_le_bytes());
    }
    let edges = net.edges();
    hasher.update((edges.len() as u64).to_le_bytes());
    for (a, b, weight) in edges {
        hasher.update(a.as_raw().to_le_bytes());
        hasher.update(b.as_raw().to_le_bytes());
        hasher.update(weight.to_bits().to_le_bytes());
    }
}

fn encode_coupling(coupling: &Coupling, hasher: &mut Sha256) {
    hasher.update(coupling.kind().as_bytes());
    match coupling {
        Coupling::Categorical { weight } | Coupling::Ordinal { weight } => {
            hasher.update(weight.to_bits().to_le_bytes());
        }
        Coupling::None => {}
    }
}
