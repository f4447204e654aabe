use witcalc_number::FieldElement;

/// State width of the permutation.
pub const WIDTH: usize = 3;
/// Number of state elements that absorb input per block.
pub const RATE: usize = 2;
/// Number of state elements reserved for the capacity.
pub const CAPACITY: usize = WIDTH - RATE;

/// Round parameters of a Poseidon2 instance with `x^5` S-box.
///
/// The full rounds are split evenly around the partial rounds, so
/// `rounds_f` must be even. The constants table has one row per round;
/// partial rounds only consume the first entry of their row.
#[derive(Clone, Debug)]
pub struct Poseidon2Params<T> {
    pub rounds_f: usize,
    pub rounds_p: usize,
    pub round_constants: Vec<[T; WIDTH]>,
}

impl<T: FieldElement> Poseidon2Params<T> {
    pub fn new(rounds_f: usize, rounds_p: usize, round_constants: Vec<[T; WIDTH]>) -> Self {
        assert_eq!(rounds_f % 2, 0, "full rounds must be split evenly");
        assert_eq!(
            round_constants.len(),
            rounds_f + rounds_p,
            "one constants row per round"
        );
        Poseidon2Params {
            rounds_f,
            rounds_p,
            round_constants,
        }
    }

    /// Total number of rounds.
    pub fn rounds(&self) -> usize {
        self.rounds_f + self.rounds_p
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use witcalc_number::Bn254Field;

    #[test]
    #[should_panic = "full rounds must be split evenly"]
    fn odd_full_rounds_are_rejected() {
        let constants = vec![[Bn254Field::from(0); WIDTH]; 5];
        Poseidon2Params::new(3, 2, constants);
    }

    #[test]
    #[should_panic = "one constants row per round"]
    fn constants_row_count_must_match() {
        let constants = vec![[Bn254Field::from(0); WIDTH]; 4];
        Poseidon2Params::new(4, 2, constants);
    }
}
