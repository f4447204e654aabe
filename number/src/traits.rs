use std::{
    fmt,
    hash::Hash,
    ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub},
};

use num_bigint::BigUint;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// The fields supported by the graph file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnownField {
    Bn254,
    Bls12_381,
}

impl fmt::Display for KnownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownField::Bn254 => write!(f, "bn254"),
            KnownField::Bls12_381 => write!(f, "bls12_381"),
        }
    }
}

/// A field element
pub trait FieldElement:
    'static
    + Copy
    + Send
    + Sync
    + Default
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Hash
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + MulAssign
    + fmt::Debug
    + fmt::Display
    + fmt::LowerHex
    + From<u32>
    + From<u64>
    + From<i32>
    + From<i64>
    + From<bool>
    + From<BigUint>
    + Serialize
    + DeserializeOwned
{
    /// The field this element belongs to.
    fn known_field() -> KnownField;

    /// The prime modulus of the field.
    fn modulus() -> BigUint;

    fn to_biguint(&self) -> BigUint;

    /// The multiplicative inverse, or None for zero.
    fn inverse(&self) -> Option<Self>;

    /// The canonical little-endian byte encoding. Always
    /// `modulus().to_bytes_le().len()` bytes long.
    fn to_bytes_le(&self) -> Vec<u8>;

    /// Parses a little-endian byte encoding, rejecting values that are
    /// not smaller than the modulus.
    fn from_bytes_le(bytes: &[u8]) -> Result<Self, String>;

    /// Parses a decimal string. The value is reduced modulo the field order.
    fn from_str(s: &str) -> Result<Self, String>;

    /// Parses a string in the given radix. The value is reduced modulo the
    /// field order.
    fn from_str_radix(s: &str, radix: u32) -> Result<Self, String>;

    fn zero() -> Self {
        0u32.into()
    }

    fn one() -> Self {
        1u32.into()
    }

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}
