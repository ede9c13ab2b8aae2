#![deny(missing_docs)]

//! Concrete monoplex and multiplex networks implementing the `plexgen-core` network contract.

mod couplings;
pub mod diagnostics;
mod hash;
mod monoplex;
mod multiplex;
mod serialization;

pub use couplings::Coupling;
pub use diagnostics::{
    degree_distribution, density, multiplex_degree_distributions, multiplex_density,
};
pub use hash::{canonical_hash, multiplex_hash};
pub use monoplex::MonoplexNetwork;
pub use multiplex::MultiplexNetwork;
pub use serialization::{
    multiplex_from_json, multiplex_to_json, network_from_bytes, network_from_json,
    network_to_bytes, network_to_json,
};
