//! Field element types used across witcalc

#[macro_use]
mod macros;
mod bls12_381;
mod bn254;
mod serialize;
mod traits;

pub use serialize::buffered_write_file;

pub use bls12_381::Bls12_381Field;
pub use bn254::Bn254Field;

pub use num_bigint::BigUint;
pub use traits::{FieldElement, KnownField};
