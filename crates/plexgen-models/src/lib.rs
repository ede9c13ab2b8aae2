#![deny(missing_docs)]
#![doc = include_str!("../docs/conf-model.md")]

//! Configuration-model generators for monoplex and multiplex networks.

mod conf;
mod config;
mod degree_sequence;
mod multiplex;
mod policy;
mod rewire;
mod stubs;

pub use conf::{generate_configuration_model, ConfModelReport};
pub use config::ConfModelConfig;
pub use degree_sequence::DegreeSequence;
pub use multiplex::{conf, generate_multiplex_configuration_model, DegreeSpec, GeneratedNetwork};
pub use policy::RewirePolicy;
