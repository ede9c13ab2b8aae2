use plexgen_core::errors::{ErrorInfo, PlexError};
use plexgen_core::{LayerId, NodeId, RngHandle};
use plexgen_net::{canonical_hash, multiplex_hash, Coupling, MonoplexNetwork, MultiplexNetwork};
use std::fmt;

use rand::RngCore;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::conf::generate_configuration_model;
use crate::degree_sequence::{DegreeSequence, HistogramVisitor};
use crate::policy::RewirePolicy;

/// Degree input for [`conf`]: one sequence for a monoplex network or one per layer.
///
/// Serialized as a single `degree -> count` map or as a list of such maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegreeSpec {
    /// A single degree sequence.
    Single(DegreeSequence),
    /// One degree sequence per layer, in layer order.
    Layered(Vec<DegreeSequence>),
}

impl Serialize for DegreeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DegreeSpec::Single(degs) => degs.serialize(serializer),
            DegreeSpec::Layered(layers) => layers.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DegreeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DegreeSpecVisitor)
    }
}

struct DegreeSpecVisitor;

impl<'de> Visitor<'de> for DegreeSpecVisitor {
    type Value = DegreeSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a degree histogram or a list of per-layer degree histograms")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        HistogramVisitor.visit_map(map).map(DegreeSpec::Single)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut layers = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(layer) = seq.next_element::<DegreeSequence>()? {
            layers.push(layer);
        }
        Ok(DegreeSpec::Layered(layers))
    }
}

impl From<DegreeSequence> for DegreeSpec {
    fn from(degs: DegreeSequence) -> Self {
        DegreeSpec::Single(degs)
    }
}

impl From<Vec<DegreeSequence>> for DegreeSpec {
    fn from(layers: Vec<DegreeSequence>) -> Self {
        DegreeSpec::Layered(layers)
    }
}

/// Network produced by [`conf`], shaped by the requested aspect count.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedNetwork {
    /// Zero aspects.
    Monoplex(MonoplexNetwork),
    /// One aspect.
    Multiplex(MultiplexNetwork),
}

impl GeneratedNetwork {
    /// Returns the number of aspects of the network.
    pub fn aspects(&self) -> usize {
        match self {
            GeneratedNetwork::Monoplex(_) => 0,
            GeneratedNetwork::Multiplex(_) => 1,
        }
    }

    /// Returns the monoplex network, if any.
    pub fn as_monoplex(&self) -> Option<&MonoplexNetwork> {
        match self {
            GeneratedNetwork::Monoplex(net) => Some(net),
            GeneratedNetwork::Multiplex(_) => None,
        }
    }

    /// Returns the multiplex network, if any.
    pub fn as_multiplex(&self) -> Option<&MultiplexNetwork> {
        match self {
            GeneratedNetwork::Multiplex(net) => Some(net),
            GeneratedNetwork::Monoplex(_) => None,
        }
    }

    /// Returns the canonical hash of the wrapped network.
    pub fn canonical_hash(&self) -> String {
        match self {
            GeneratedNetwork::Monoplex(net) => canonical_hash(net),
            GeneratedNetwork::Multiplex(net) => multiplex_hash(net),
        }
    }
}

/// Generates one configuration-model layer per degree sequence over a shared node set.
///
/// Every layer must describe the same number of nodes; this and the parity of every layer
/// are checked before any layer is generated. Layer `i` is seeded from substream `i` of a
/// master value drawn once from `rng`, so its realization does not depend on the others.
pub fn generate_multiplex_configuration_model(
    layers: &[DegreeSequence],
    coupling: Coupling,
    policy: &RewirePolicy,
    rng: &mut RngHandle,
) -> Result<MultiplexNetwork, PlexError> {
    let node_count = check_layer_node_counts(layers)?;
    for (idx, degs) in layers.iter().enumerate() {
        degs.validate()
            .map_err(|err| err.with_context("layer", idx))?;
    }

    let master = rng.next_u64();
    let mut net = MultiplexNetwork::new(coupling);
    for idx in 0..layers.len() {
        net.add_layer(LayerId::from_raw(idx as u64))?;
    }
    for raw in 0..node_count as u64 {
        net.add_node(NodeId::from_raw(raw))?;
    }
    for (idx, degs) in layers.iter().enumerate() {
        let layer = LayerId::from_raw(idx as u64);
        let mut layer_rng = RngHandle::substream(master, idx as u64);
        let target = net.layer_mut(layer)?;
        let report = generate_configuration_model(target, degs, policy, &mut layer_rng)
            .map_err(|err| err.with_context("layer", idx))?;
        log::debug!(
            "layer {} realized with {} edges after {} restarts",
            idx,
            report.edges,
            report.restarts
        );
    }
    Ok(net)
}

/// Generates a configuration-model network with `aspects` aspects.
///
/// Zero aspects take a single degree sequence and produce a monoplex network; one aspect
/// takes a sequence per layer and produces a multiplex network with `coupling`. The aspect
/// count is validated first.
pub fn conf(
    degrees: &DegreeSpec,
    aspects: usize,
    coupling: Coupling,
    policy: &RewirePolicy,
    rng: &mut RngHandle,
) -> Result<GeneratedNetwork, PlexError> {
    match (aspects, degrees) {
        (0, DegreeSpec::Single(degs)) => {
            let mut net = MonoplexNetwork::new();
            generate_configuration_model(&mut net, degs, policy, rng)?;
            Ok(GeneratedNetwork::Monoplex(net))
        }
        (1, DegreeSpec::Layered(layers)) => Ok(GeneratedNetwork::Multiplex(
            generate_multiplex_configuration_model(layers, coupling, policy, rng)?,
        )),
        (0 | 1, _) => Err(PlexError::DegreeSequence(
            ErrorInfo::new("shape-mismatch", "degree input does not match the aspect count")
                .with_context("aspects", aspects)
                .with_hint("use one sequence for 0 aspects and a list of sequences for 1"),
        )),
        _ => Err(PlexError::UnsupportedAspect(
            ErrorInfo::new("unsupported-aspects", "only 0 or 1 aspects are supported")
                .with_context("aspects", aspects),
        )),
    }
}

fn check_layer_node_counts(layers: &[DegreeSequence]) -> Result<usize, PlexError> {
    let Some(first) = layers.first() else {
        return Ok(0);
    };
    let expected = first.node_count();
    for (idx, degs) in layers.iter().enumerate().skip(1) {
        if degs.node_count() != expected {
            return Err(PlexError::LayerMismatch(
                ErrorInfo::new("layer-node-count", "every layer must describe the same nodes")
                    .with_context("layer", idx)
                    .with_context("expected", expected)
                    .with_context("found", degs.node_count()),
            ));
        }
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_counts_are_compared_against_the_first_layer() {
        let layers = [
            DegreeSequence::new().with(1, 4),
            DegreeSequence::new().with(2, 4),
            DegreeSequence::new().with(1, 2),
        ];
        let err = check_layer_node_counts(&layers).unwrap_err();
        assert_eq!(err.code(), "layer-node-count");
        assert_eq!(err.info().context.get("layer"), Some(&"2".to_string()));
        assert_eq!(check_layer_node_counts(&layers[..2]).unwrap(), 4);
        assert_eq!(check_layer_node_counts(&[]).unwrap(), 0);
    }

    #[test]
    fn odd_layer_is_reported_with_its_index() {
        let layers = [
            DegreeSequence::new().with(1, 2),
            DegreeSequence::new().with(1, 1).with(0, 1),
        ];
        let err = generate_multiplex_configuration_model(
            &layers,
            Coupling::default(),
            &RewirePolicy::default(),
            &mut RngHandle::from_seed(1),
        )
        .unwrap_err();
        assert_eq!(err.code(), "odd-degree-sum");
        assert_eq!(err.info().context.get("layer"), Some(&"1".to_string()));
    }

    #[test]
    fn aspect_count_is_checked_first() {
        let spec = DegreeSpec::Single(DegreeSequence::new().with(1, 3));
        let err = conf(
            &spec,
            2,
            Coupling::default(),
            &RewirePolicy::default(),
            &mut RngHandle::from_seed(0),
        )
        .unwrap_err();
        assert!(matches!(err, PlexError::UnsupportedAspect(_)));
    }

    #[test]
    fn shape_must_match_aspects() {
        let spec = DegreeSpec::Layered(vec![DegreeSequence::new().with(1, 2)]);
        let err = conf(
            &spec,
            0,
            Coupling::default(),
            &RewirePolicy::default(),
            &mut RngHandle::from_seed(0),
        )
        .unwrap_err();
        assert_eq!(err.code(), "shape-mismatch");
    }

    #[test]
    fn degree_spec_deserializes_both_shapes() {
        let single: DegreeSpec = serde_json::from_str(r#"{"2": 4}"#).unwrap();
        assert_eq!(single, DegreeSpec::Single(DegreeSequence::new().with(2, 4)));
        let layered: DegreeSpec = serde_json::from_str(r#"[{"1": 2}, {"0": 2}]"#).unwrap();
        assert_eq!(
            layered,
            DegreeSpec::Layered(vec![
                DegreeSequence::new().with(1, 2),
                DegreeSequence::new().with(0, 2),
            ])
        );
        let empty: DegreeSpec = serde_json::from_str("[]").unwrap();
        assert_eq!(empty, DegreeSpec::Layered(Vec::new()));
    }

    #[test]
    fn degree_spec_rejects_other_shapes() {
        for json in [r#""2: 4""#, "7", r#"[{"1": 2}, 3]"#, r#"{"1": "two"}"#] {
            assert!(serde_json::from_str::<DegreeSpec>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn degree_spec_serializes_to_its_input_shape() {
        let layered = DegreeSpec::Layered(vec![
            DegreeSequence::new().with(1, 2),
            DegreeSequence::new().with(0, 1).with(2, 3),
        ]);
        let json = serde_json::to_string(&layered).unwrap();
        assert_eq!(json, r#"[{"1":2},{"0":1,"2":3}]"#);
        assert_eq!(serde_json::from_str::<DegreeSpec>(&json).unwrap(), layered);
    }
}
