//! Degree and density summaries of built networks.

use std::collections::BTreeMap;

use plexgen_core::errors::PlexError;
use plexgen_core::{LayerId, Network};

use crate::monoplex::MonoplexNetwork;
use crate::multiplex::MultiplexNetwork;

/// Returns the degree distribution: degree value mapped to the number of nodes with that degree.
pub fn degree_distribution<N: Network + ?Sized>(
    net: &N,
) -> Result<BTreeMap<usize, usize>, PlexError> {
    let mut distribution = BTreeMap::new();
    for node in net.nodes() {
        *distribution.entry(net.degree(node)?).or_insert(0) += 1;
    }
    Ok(distribution)
}

/// Returns the fraction of node pairs that are connected. Empty networks have density zero.
pub fn density(net: &MonoplexNetwork) -> f64 {
    let n = net.node_count() as f64;
    if n < 2.0 {
        return 0.0;
    }
    net.edge_count() as f64 / (n * (n - 1.0) / 2.0)
}

/// Returns the degree distribution of every intra-layer network.
pub fn multiplex_degree_distributions(
    net: &MultiplexNetwork,
) -> Result<BTreeMap<LayerId, BTreeMap<usize, usize>>, PlexError> {
    net.layers()
        .map(|(id, layer)| Ok((id, degree_distribution(layer)?)))
        .collect()
}

/// Returns the density of every intra-layer network.
pub fn multiplex_density(net: &MultiplexNetwork) -> BTreeMap<LayerId, f64> {
    net.layers().map(|(id, layer)| (id, density(layer))).collect()
}

#[cfg(test)]
mod tests {
    use plexgen_core::NodeId;

    use super::*;
    use crate::couplings::Coupling;

    fn path(n: u64) -> MonoplexNetwork {
        let mut net = MonoplexNetwork::with_nodes(n);
        for raw in 1..n {
            net.set_edge_weight(NodeId::from_raw(raw - 1), NodeId::from_raw(raw), 1.0)
                .unwrap();
        }
        net
    }

    #[test]
    fn path_distribution_and_density() {
        let net = path(4);
        let distribution = degree_distribution(&net).unwrap();
        assert_eq!(distribution, BTreeMap::from([(1, 2), (2, 2)]));
        assert!((density(&net) - 0.5).abs() < 1e-12);
        assert_eq!(density(&MonoplexNetwork::with_nodes(1)), 0.0);
    }

    #[test]
    fn isolated_nodes_are_counted() {
        let net = MonoplexNetwork::with_nodes(3);
        assert_eq!(degree_distribution(&net).unwrap(), BTreeMap::from([(0, 3)]));
    }

    #[test]
    fn per_layer_summaries() {
        let mut net = MultiplexNetwork::new(Coupling::default());
        net.add_layer(LayerId::from_raw(0)).unwrap();
        net.add_layer(LayerId::from_raw(1)).unwrap();
        net.replace_layer(LayerId::from_raw(1), path(3)).unwrap();
        let distributions = multiplex_degree_distributions(&net).unwrap();
        assert!(distributions[&LayerId::from_raw(0)].is_empty());
        assert_eq!(
            distributions[&LayerId::from_raw(1)],
            BTreeMap::from([(1, 2), (2, 1)])
        );
        let densities = multiplex_density(&net);
        assert!((densities[&LayerId::from_raw(1)] - 2.0 / 3.0).abs() < 1e-12);
    }
}
