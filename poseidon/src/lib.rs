//! The Poseidon2 hash over prime fields: the plain permutation and sponge,
//! plus a compiler from the hash to a circuit graph.

pub mod circuit;
pub mod instance;
pub mod params;
pub mod permutation;
pub mod sponge;

pub use circuit::hash_circuit;
pub use params::Poseidon2Params;
pub use sponge::{hash, Poseidon2};
