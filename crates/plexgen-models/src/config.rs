use plexgen_core::errors::{ErrorInfo, PlexError};
use plexgen_core::RngHandle;
use plexgen_net::Coupling;
use serde::{Deserialize, Serialize};

use crate::multiplex::{conf, DegreeSpec, GeneratedNetwork};
use crate::policy::RewirePolicy;

/// JSON-configurable description of one configuration-model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfModelConfig {
    /// Number of aspects: 0 for a monoplex network, 1 for a multiplex network.
    #[serde(default)]
    pub aspects: usize,
    /// Degree sequence, or one per layer.
    pub degrees: DegreeSpec,
    /// Coupling between layers. Ignored for monoplex networks.
    #[serde(default)]
    pub couplings: Coupling,
    /// Termination policy of the rewires.
    #[serde(default)]
    pub rewire: RewirePolicy,
    /// Master seed.
    #[serde(default)]
    pub seed: u64,
}

impl ConfModelConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, PlexError> {
        serde_json::from_str(json)
            .map_err(|err| PlexError::Serde(ErrorInfo::new("config-parse", err.to_string())))
    }

    /// Runs the generation with a fresh handle seeded from `seed`.
    pub fn run(&self) -> Result<GeneratedNetwork, PlexError> {
        let mut rng = RngHandle::from_seed(self.seed);
        conf(
            &self.degrees,
            self.aspects,
            self.couplings,
            &self.rewire,
            &mut rng,
        )
    }
}
