use std::collections::BTreeSet;

use plexgen_core::{Network, NodeId, PlexError, RngHandle};
use plexgen_models::{generate_configuration_model, DegreeSequence, RewirePolicy};
use plexgen_net::{degree_distribution, MonoplexNetwork};
use proptest::prelude::*;

/// Degree list of a random simple graph, so the sequence is always graphical.
fn graphical_degrees() -> impl Strategy<Value = Vec<usize>> {
    (6usize..24).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..3 * n).prop_map(move |pairs| {
            let edges: BTreeSet<(usize, usize)> = pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect();
            let mut degrees = vec![0; n];
            for (a, b) in edges {
                degrees[a] += 1;
                degrees[b] += 1;
            }
            degrees
        })
    })
}

fn check_realization(net: &MonoplexNetwork, degs: &DegreeSequence) {
    assert!(!net.has_self_loops());
    assert_eq!(net.node_count(), degs.node_count());
    assert_eq!(net.edge_count(), degs.stub_count() / 2);
    for (idx, expected) in degs.node_degrees().enumerate() {
        let node = NodeId::from_raw(idx as u64);
        assert_eq!(net.degree(node).unwrap(), expected, "degree of node {idx}");
    }
    for (_, _, weight) in net.edges() {
        assert_eq!(weight, 1.0);
    }
    assert_eq!(&degree_distribution(net).unwrap(), degs.counts());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn realizations_match_the_degree_sequence(degrees in graphical_degrees(), seed in any::<u64>()) {
        let degs = DegreeSequence::from_degrees(degrees);
        let policy = RewirePolicy::default().with_max_attempts(5_000).with_max_restarts(50);
        let mut net = MonoplexNetwork::new();
        let mut rng = RngHandle::from_seed(seed);
        match generate_configuration_model(&mut net, &degs, &policy, &mut rng) {
            Ok(report) => {
                check_realization(&net, &degs);
                prop_assert_eq!(report.edges, net.edge_count());
                prop_assert!(report.restarts <= 50);
            }
            Err(err) => {
                prop_assert!(matches!(err, PlexError::RewireExhaustion(_)), "unexpected error {}", err);
                prop_assert_eq!(net.node_count(), 0);
                prop_assert_eq!(net.edge_count(), 0);
            }
        }
    }

    #[test]
    fn odd_sums_never_build_anything(
        degrees in prop::collection::vec(0usize..6, 1..20),
        seed in any::<u64>(),
    ) {
        let mut degrees = degrees;
        if degrees.iter().sum::<usize>() % 2 == 0 {
            degrees[0] += 1;
        }
        let degs = DegreeSequence::from_degrees(degrees);
        let mut net = MonoplexNetwork::new();
        let err = generate_configuration_model(
            &mut net,
            &degs,
            &RewirePolicy::default(),
            &mut RngHandle::from_seed(seed),
        )
        .unwrap_err();
        prop_assert!(matches!(err, PlexError::DegreeSequence(_)));
        prop_assert_eq!(err.code(), "odd-degree-sum");
        prop_assert_eq!(net.node_count(), 0);
    }
}

#[test]
fn sparse_sequence_realizes_with_fixed_seed() {
    let degs = DegreeSequence::new().with(1, 40).with(2, 30).with(3, 20).with(5, 8);
    let mut net = MonoplexNetwork::new();
    let report = generate_configuration_model(
        &mut net,
        &degs,
        &RewirePolicy::default(),
        &mut RngHandle::from_seed(2024),
    )
    .unwrap();
    check_realization(&net, &degs);
    assert_eq!(report.nodes, 98);
    assert_eq!(report.edges, 100);
}

#[test]
fn same_seed_same_graph() {
    let degs = DegreeSequence::new().with(2, 30).with(4, 10);
    let build = |seed| {
        let mut net = MonoplexNetwork::new();
        generate_configuration_model(
            &mut net,
            &degs,
            &RewirePolicy::default(),
            &mut RngHandle::from_seed(seed),
        )
        .unwrap();
        net
    };
    assert_eq!(build(17), build(17));
}
