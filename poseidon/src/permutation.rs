use witcalc_number::FieldElement;

use crate::params::{Poseidon2Params, WIDTH};

/// Applies the Poseidon2 permutation to `state` in place.
///
/// The schedule is the one from the Poseidon2 paper: an initial external
/// matrix multiplication, the first half of the full rounds, all partial
/// rounds, then the second half of the full rounds.
pub fn permute<T: FieldElement>(params: &Poseidon2Params<T>, state: &mut [T; WIDTH]) {
    matmul_external(state);

    let rounds_f_half = params.rounds_f / 2;
    for round in 0..rounds_f_half {
        add_round_constants(params, state, round);
        for element in state.iter_mut() {
            sbox(element);
        }
        matmul_external(state);
    }

    for round in rounds_f_half..rounds_f_half + params.rounds_p {
        state[0] += params.round_constants[round][0];
        sbox(&mut state[0]);
        matmul_internal(state);
    }

    for round in rounds_f_half + params.rounds_p..params.rounds() {
        add_round_constants(params, state, round);
        for element in state.iter_mut() {
            sbox(element);
        }
        matmul_external(state);
    }
}

/// Multiplies the state by the external matrix `circ(2, 1, 1)`.
fn matmul_external<T: FieldElement>(state: &mut [T; WIDTH]) {
    let sum = state[0] + state[1] + state[2];
    for element in state.iter_mut() {
        *element += sum;
    }
}

/// Multiplies the state by the internal matrix `[[2, 1, 1], [1, 2, 1], [1, 1, 3]]`.
fn matmul_internal<T: FieldElement>(state: &mut [T; WIDTH]) {
    let sum = state[0] + state[1] + state[2];
    // The last diagonal entry is 3, so the last element is doubled before
    // the sum is added.
    state[2] += state[2];
    for element in state.iter_mut() {
        *element += sum;
    }
}

fn add_round_constants<T: FieldElement>(
    params: &Poseidon2Params<T>,
    state: &mut [T; WIDTH],
    round: usize,
) {
    for (element, constant) in state.iter_mut().zip(&params.round_constants[round]) {
        *element += *constant;
    }
}

/// The `x^5` S-box.
fn sbox<T: FieldElement>(element: &mut T) {
    let x = *element;
    let x2 = x * x;
    let x4 = x2 * x2;
    *element = x4 * x;
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use witcalc_number::{Bn254Field, FieldElement};

    use super::*;
    use crate::instance;

    fn hex(s: &str) -> Bn254Field {
        Bn254Field::from_str_radix(s, 16).unwrap()
    }

    #[test]
    fn known_permutation_of_zero_one_two() {
        let params = instance::bn254_t3();
        let mut state = [0, 1, 2].map(Bn254Field::from);
        permute(&params, &mut state);
        assert_eq!(
            state,
            [
                hex("0bb61d24daca55eebcb1929a82650f328134334da98ea4f847f760054f4a3033"),
                hex("303b6f7c86d043bfcbcc80214f26a30277a15d3f74ca654992defe7ff8d03570"),
                hex("1ed25194542b12eef8617361c3ba7c52e660b145994427cc86296242cf766ec8"),
            ]
        );
    }

    #[test]
    fn external_matrix() {
        let mut state = [1, 2, 3].map(Bn254Field::from);
        matmul_external(&mut state);
        assert_eq!(state, [7, 8, 9].map(Bn254Field::from));
    }

    #[test]
    fn internal_matrix() {
        let mut state = [1, 2, 3].map(Bn254Field::from);
        matmul_internal(&mut state);
        assert_eq!(state, [7, 8, 12].map(Bn254Field::from));
    }

    #[test]
    fn sbox_is_the_fifth_power() {
        let mut x = Bn254Field::from(2);
        sbox(&mut x);
        assert_eq!(x, Bn254Field::from(32));
    }
}
