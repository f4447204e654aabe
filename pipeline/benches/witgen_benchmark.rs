use witcalc_executor::witgen::WitnessGenerator;
use witcalc_number::Bn254Field;
use witcalc_poseidon::{hash_circuit, instance, sponge};

use criterion::{criterion_group, criterion_main, Criterion};

fn witgen_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("witgen-benchmark");

    let params = instance::bn254_t3();
    for n_inputs in [1u32, 3, 8, 16] {
        let graph = hash_circuit::<Bn254Field>(&params, n_inputs).unwrap();
        let inputs = (1..=u64::from(n_inputs))
            .map(Bn254Field::from)
            .collect::<Vec<_>>();
        group.bench_with_input(format!("poseidon2_graph_{n_inputs}"), &graph, |b, graph| {
            b.iter(|| {
                WitnessGenerator::new(graph)
                    .with_inputs([("in".to_string(), inputs.clone())].into())
                    .generate()
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn permutation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("permutation-benchmark");

    let params = instance::bn254_t3();
    for n_inputs in [3u64, 16] {
        let inputs = (1..=n_inputs).map(Bn254Field::from).collect::<Vec<_>>();
        group.bench_with_input(format!("poseidon2_direct_{n_inputs}"), &inputs, |b, inputs| {
            b.iter(|| sponge::hash(&params, inputs));
        });
    }

    group.finish();
}

criterion_group!(benches_witgen, witgen_benchmark, permutation_benchmark);
criterion_main!(benches_witgen);
