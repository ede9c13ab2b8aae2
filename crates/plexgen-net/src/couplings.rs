use serde::{Deserialize, Serialize};

/// Describes how the copies of a node are coupled across the layers of a multiplex network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Coupling {
    /// Every pair of layers is coupled with the same weight.
    Categorical {
        /// Weight of each inter-layer coupling edge.
        #[serde(default = "default_weight")]
        weight: f64,
    },
    /// Only consecutive layers (by layer index) are coupled.
    Ordinal {
        /// Weight of each inter-layer coupling edge.
        #[serde(default = "default_weight")]
        weight: f64,
    },
    /// Layers are not coupled.
    None,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for Coupling {
    fn default() -> Self {
        Coupling::Categorical {
            weight: default_weight(),
        }
    }
}

impl Coupling {
    /// Returns the coupling weight between two distinct layer indices, if they are coupled.
    pub fn weight_between(&self, layer_a: u64, layer_b: u64) -> Option<f64> {
        if layer_a == layer_b {
            return None;
        }
        match *self {
            Coupling::Categorical { weight } => Some(weight),
            Coupling::Ordinal { weight } if layer_a.abs_diff(layer_b) == 1 => Some(weight),
            Coupling::Ordinal { .. } | Coupling::None => None,
        }
    }

    /// Short label used in hashes and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Coupling::Categorical { .. } => "categorical",
            Coupling::Ordinal { .. } => "ordinal",
            Coupling::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_couples_every_pair() {
        let coupling = Coupling::Categorical { weight: 0.5 };
        assert_eq!(coupling.weight_between(0, 3), Some(0.5));
        assert_eq!(coupling.weight_between(2, 2), None);
    }

    #[test]
    fn ordinal_couples_neighbours_only() {
        let coupling = Coupling::Ordinal { weight: 2.0 };
        assert_eq!(coupling.weight_between(1, 2), Some(2.0));
        assert_eq!(coupling.weight_between(2, 1), Some(2.0));
        assert_eq!(coupling.weight_between(0, 2), None);
    }

    #[test]
    fn parses_tagged_json_with_default_weight() {
        let coupling: Coupling = serde_json::from_str(r#"{"type":"ordinal"}"#).unwrap();
        assert_eq!(coupling, Coupling::Ordinal { weight: 1.0 });
        let none: Coupling = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none.weight_between(0, 1), None);
    }
}
