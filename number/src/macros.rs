macro_rules! witcalc_field {
    ($name:ident, $ark_type:ty, $known_field:expr) => {
        use ark_ff::{BigInteger, Field, PrimeField};
        use num_bigint::BigUint;
        use num_traits::Num;
        use serde::{Deserialize, Serialize};
        use std::fmt;
        use std::ops::*;

        use crate::{FieldElement, KnownField};

        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Debug,
            Default,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        pub struct $name {
            #[serde(serialize_with = "crate::serialize::ark_se")]
            #[serde(deserialize_with = "crate::serialize::ark_de")]
            value: $ark_type,
        }

        impl From<$ark_type> for $name {
            #[inline]
            fn from(value: $ark_type) -> Self {
                Self { value }
            }
        }

        impl From<BigUint> for $name {
            fn from(n: BigUint) -> Self {
                Self { value: n.into() }
            }
        }

        impl From<u32> for $name {
            fn from(n: u32) -> Self {
                (<$ark_type>::from(n)).into()
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                (<$ark_type>::from(n)).into()
            }
        }

        impl From<i32> for $name {
            fn from(n: i32) -> Self {
                (<$ark_type>::from(n)).into()
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                (<$ark_type>::from(n)).into()
            }
        }

        impl From<bool> for $name {
            fn from(n: bool) -> Self {
                (<$ark_type>::from(n)).into()
            }
        }

        impl FieldElement for $name {
            fn known_field() -> KnownField {
                $known_field
            }

            fn modulus() -> BigUint {
                <$ark_type>::MODULUS.into()
            }

            fn to_biguint(&self) -> BigUint {
                self.value.into_bigint().into()
            }

            fn inverse(&self) -> Option<Self> {
                self.value.inverse().map(Into::into)
            }

            fn to_bytes_le(&self) -> Vec<u8> {
                self.value.into_bigint().to_bytes_le()
            }

            fn from_bytes_le(bytes: &[u8]) -> Result<Self, String> {
                let n = BigUint::from_bytes_le(bytes);
                if n >= Self::modulus() {
                    return Err(format!(
                        "Value 0x{n:x} is not a canonical {} element",
                        Self::known_field()
                    ));
                }
                Ok(n.into())
            }

            fn from_str(s: &str) -> Result<Self, String> {
                Self::from_str_radix(s, 10)
            }

            fn from_str_radix(s: &str, radix: u32) -> Result<Self, String> {
                BigUint::from_str_radix(s, radix)
                    .map(|n| n.into())
                    .map_err(|e| e.to_string())
            }
        }

        // Add

        impl std::ops::Add for $name {
            type Output = $name;

            fn add(self, rhs: Self) -> Self::Output {
                (self.value + rhs.value).into()
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.value.add_assign(rhs.value);
            }
        }

        // Sub

        impl std::ops::Sub for $name {
            type Output = $name;

            fn sub(self, rhs: Self) -> Self::Output {
                (self.value - rhs.value).into()
            }
        }

        // Mul

        impl std::ops::Mul for $name {
            type Output = $name;

            fn mul(self, rhs: Self) -> Self::Output {
                (self.value * rhs.value).into()
            }
        }

        impl MulAssign for $name {
            fn mul_assign(&mut self, rhs: Self) {
                self.value.mul_assign(rhs.value);
            }
        }

        // Div

        impl std::ops::Div for $name {
            type Output = $name;

            fn div(self, rhs: Self) -> Self::Output {
                (self.value / rhs.value).into()
            }
        }

        impl std::ops::Neg for $name {
            type Output = $name;

            fn neg(self) -> Self::Output {
                (-self.value).into()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let value = self.value.into_bigint();
                if value > <$ark_type>::MODULUS_MINUS_ONE_DIV_TWO {
                    let mut res = <$ark_type>::MODULUS;
                    assert!(!res.sub_with_borrow(&value));
                    write!(f, "-{res}")
                } else {
                    write!(f, "{value}")
                }
            }
        }

        impl fmt::LowerHex for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::LowerHex::fmt(&self.to_biguint(), f)
            }
        }
    };
}
