witcalc_field!(Bls12_381Field, ark_bls12_381::Fr, KnownField::Bls12_381);

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn modulus() {
        assert_eq!(
            Bls12_381Field::modulus().to_string(),
            "52435875175126190479447740508185965837690552500527637822603658699938581184513"
        );
    }

    #[test]
    fn arithmetic() {
        let x = Bls12_381Field::from(1234567891011121314u64);
        assert_eq!(x - x, Bls12_381Field::zero());
        assert_eq!(x * x.inverse().unwrap(), Bls12_381Field::one());
        assert_eq!(Bls12_381Field::from(-7) + Bls12_381Field::from(7), 0u32.into());
    }
}
