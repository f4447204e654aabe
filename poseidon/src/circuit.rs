use witcalc_graph::{Graph, GraphBuilder, NodeId};
use witcalc_number::FieldElement;

use crate::params::{Poseidon2Params, CAPACITY, WIDTH};

/// Upper bound on the number of hash inputs a circuit is built for.
pub const MAX_INPUTS: u32 = 16;

/// Compiles the Poseidon2 hash of `n_inputs` field elements into a circuit
/// graph.
///
/// The resulting graph takes a single input signal `in` of length `n_inputs`
/// and exposes the digest as its only output, so after witness generation
/// the digest sits at witness index 1. The sponge is fully unrolled: every
/// round becomes a run of constant, addition and multiplication nodes.
pub fn hash_circuit<T: FieldElement>(
    params: &Poseidon2Params<T>,
    n_inputs: u32,
) -> Result<Graph<T>, String> {
    if n_inputs == 0 || n_inputs > MAX_INPUTS {
        return Err(format!(
            "number of hash inputs must be between 1 and {MAX_INPUTS}, got {n_inputs}"
        ));
    }

    let mut builder = GraphBuilder::new();
    let inputs = builder.input("in", n_inputs)?;

    let zero = builder.constant(T::zero());
    let mut state = [zero; WIDTH];
    let mut index = CAPACITY;
    for input in inputs {
        if index == WIDTH {
            permute_nodes(params, &mut builder, &mut state);
            index = CAPACITY;
        }
        state[index] = builder.add(state[index], input);
        index += 1;
    }
    permute_nodes(params, &mut builder, &mut state);

    builder.output(state[CAPACITY]);
    builder.build()
}

/// Unrolls one application of the permutation on a symbolic state.
fn permute_nodes<T: FieldElement>(
    params: &Poseidon2Params<T>,
    builder: &mut GraphBuilder<T>,
    state: &mut [NodeId; WIDTH],
) {
    matmul_external_nodes(builder, state);

    let rounds_f_half = params.rounds_f / 2;
    for round in 0..rounds_f_half {
        add_round_constants_nodes(params, builder, state, round);
        for element in state.iter_mut() {
            *element = sbox_node(builder, *element);
        }
        matmul_external_nodes(builder, state);
    }

    for round in rounds_f_half..rounds_f_half + params.rounds_p {
        let constant = builder.constant(params.round_constants[round][0]);
        state[0] = builder.add(state[0], constant);
        state[0] = sbox_node(builder, state[0]);
        matmul_internal_nodes(builder, state);
    }

    for round in rounds_f_half + params.rounds_p..params.rounds() {
        add_round_constants_nodes(params, builder, state, round);
        for element in state.iter_mut() {
            *element = sbox_node(builder, *element);
        }
        matmul_external_nodes(builder, state);
    }
}

fn matmul_external_nodes<T: FieldElement>(
    builder: &mut GraphBuilder<T>,
    state: &mut [NodeId; WIDTH],
) {
    let sum = builder.add(state[0], state[1]);
    let sum = builder.add(sum, state[2]);
    for element in state.iter_mut() {
        *element = builder.add(*element, sum);
    }
}

fn matmul_internal_nodes<T: FieldElement>(
    builder: &mut GraphBuilder<T>,
    state: &mut [NodeId; WIDTH],
) {
    let sum = builder.add(state[0], state[1]);
    let sum = builder.add(sum, state[2]);
    state[2] = builder.add(state[2], state[2]);
    for element in state.iter_mut() {
        *element = builder.add(*element, sum);
    }
}

fn add_round_constants_nodes<T: FieldElement>(
    params: &Poseidon2Params<T>,
    builder: &mut GraphBuilder<T>,
    state: &mut [NodeId; WIDTH],
    round: usize,
) {
    for (element, constant) in state.iter_mut().zip(&params.round_constants[round]) {
        let constant = builder.constant(*constant);
        *element = builder.add(*element, constant);
    }
}

fn sbox_node<T: FieldElement>(builder: &mut GraphBuilder<T>, x: NodeId) -> NodeId {
    let x2 = builder.mul(x, x);
    let x4 = builder.mul(x2, x2);
    builder.mul(x4, x)
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use witcalc_executor::witgen::WitnessGenerator;
    use witcalc_number::Bn254Field;

    use super::*;
    use crate::{instance, sponge};

    fn evaluate(graph: &Graph<Bn254Field>, inputs: Vec<Bn254Field>) -> Vec<Bn254Field> {
        let inputs = BTreeMap::from([("in".to_string(), inputs)]);
        WitnessGenerator::new(graph)
            .with_inputs(inputs)
            .generate()
            .unwrap()
            .values()
            .to_vec()
    }

    #[test]
    fn circuit_matches_the_direct_hash() {
        let params = instance::bn254_t3();
        for n in [1u32, 2, 3, 5, 8] {
            let graph = hash_circuit(&params, n).unwrap();
            let inputs = (1..=u64::from(n)).map(Bn254Field::from).collect::<Vec<_>>();
            let witness = evaluate(&graph, inputs.clone());
            assert_eq!(witness[1], sponge::hash(&params, &inputs), "{n} inputs");
        }
    }

    #[test]
    fn witness_starts_with_one_and_the_digest() {
        let params = instance::bn254_t3();
        let graph = hash_circuit(&params, 3).unwrap();
        let inputs = [1, 2, 3].map(Bn254Field::from).to_vec();
        let witness = evaluate(&graph, inputs.clone());

        assert_eq!(witness[0], Bn254Field::from(1));
        assert_eq!(
            format!("{:x}", witness[1]),
            "1573c000a10b74fe7922d5fc079b5b0147ffff2260028dfed14d5706be0ddd36"
        );
        // The inputs follow the outputs in the witness.
        assert_eq!(witness[2..5], inputs[..]);
    }

    #[test]
    fn input_count_is_bounded() {
        let params = instance::bn254_t3();
        assert!(hash_circuit(&params, 0).is_err());
        assert!(hash_circuit(&params, MAX_INPUTS).is_ok());
        assert!(hash_circuit(&params, MAX_INPUTS + 1).is_err());
    }
}
