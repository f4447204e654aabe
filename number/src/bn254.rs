witcalc_field!(Bn254Field, ark_bn254::Fr, KnownField::Bn254);

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn modulus() {
        assert_eq!(
            Bn254Field::modulus().to_string(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
    }

    #[test]
    fn display_is_signed() {
        assert_eq!(Bn254Field::from(5).to_string(), "5");
        assert_eq!(Bn254Field::from(-1).to_string(), "-1");
        assert_eq!((-Bn254Field::from(12)).to_string(), "-12");
        assert_eq!(format!("{:x}", Bn254Field::from(255)), "ff");
    }

    #[test]
    fn byte_encoding_is_canonical() {
        let one = Bn254Field::one();
        let bytes = one.to_bytes_le();
        assert_eq!(bytes.len(), 32);
        assert_eq!(Bn254Field::from_bytes_le(&bytes).unwrap(), one);
        assert!(Bn254Field::from_bytes_le(&[0xff; 32]).is_err());
    }

    #[test]
    fn inverse() {
        let x = Bn254Field::from(7);
        assert_eq!(x * x.inverse().unwrap(), Bn254Field::one());
        assert_eq!(Bn254Field::zero().inverse(), None);
    }

    #[test]
    fn parse_reduces_mod_p() {
        let above_p = Bn254Field::modulus() + 3u32;
        assert_eq!(
            Bn254Field::from_str(&above_p.to_string()).unwrap(),
            Bn254Field::from(3)
        );
        assert_eq!(
            Bn254Field::from_str_radix("ff", 16).unwrap(),
            Bn254Field::from(255)
        );
        assert!(Bn254Field::from_str("12abc").is_err());
    }
}
