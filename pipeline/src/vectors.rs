//! Running suites of test vectors against a circuit graph.

use std::{collections::BTreeMap, fs, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use witcalc_executor::witgen::WitnessGenerator;
use witcalc_graph::Graph;
use witcalc_number::FieldElement;

use crate::{inputs, Pipeline};

/// A single test vector: input signal values and the expected witness value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Case {
    /// An optional name to report the case under.
    #[serde(default)]
    pub name: Option<String>,
    /// Signal values, in the format of an input file.
    pub inputs: BTreeMap<String, Value>,
    /// The expected witness value, as a decimal or `0x` prefixed hex string.
    pub expected: String,
}

/// A collection of test vectors that are all checked against the same
/// witness position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VectorSuite {
    /// The witness index the expected value is compared against. Defaults
    /// to 1, the position of the first circuit output.
    #[serde(default = "default_position")]
    pub position: usize,
    pub cases: Vec<Case>,
}

fn default_position() -> usize {
    1
}

impl VectorSuite {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Error reading vector file {}: {e}", path.display()))?;
        serde_json::from_str(&contents)
            .map_err(|e| format!("Invalid vector file {}: {e}", path.display()))
    }
}

/// The built-in suite for the standard 3 input Poseidon2 circuit.
pub fn poseidon2_default_suite() -> VectorSuite {
    let case = |name: &str, inputs: [u64; 3], expected: &str| Case {
        name: Some(name.to_string()),
        inputs: BTreeMap::from([("in".to_string(), Value::from(inputs.to_vec()))]),
        expected: expected.to_string(),
    };
    VectorSuite {
        position: default_position(),
        cases: vec![
            case(
                "poseidon2([1, 2, 3])",
                [1, 2, 3],
                "0x1573c000a10b74fe7922d5fc079b5b0147ffff2260028dfed14d5706be0ddd36",
            ),
            case(
                "poseidon2([4, 5, 6])",
                [4, 5, 6],
                "0x01fec39be4f8276bf8b152c06102332102607c325a9f9be12d817ff308a8938d",
            ),
        ],
    }
}

/// Loads a vector suite from a file and checks it against a compiled graph
/// file.
///
/// Returns the number of cases executed.
pub fn run_from_file<T: FieldElement>(
    graph_file: &Path,
    vectors_file: &Path,
) -> Result<usize, Vec<String>> {
    let suite = VectorSuite::from_file(vectors_file).map_err(|e| vec![e])?;
    let mut pipeline = Pipeline::<T>::default().from_graph_file(graph_file.to_path_buf());
    run_suite(pipeline.compute_graph_ref()?, &suite)
}

#[allow(clippy::print_stdout)]
/// Checks every case of the suite against the given graph.
///
/// Returns the number of cases executed.
pub fn run_suite<T: FieldElement>(
    graph: &Graph<T>,
    suite: &VectorSuite,
) -> Result<usize, Vec<String>> {
    let mut errors = vec![];
    let field_name = T::known_field();
    println!("Running {} cases using field {field_name}...", suite.cases.len());
    println!("{}", "-".repeat(85));
    for (i, case) in suite.cases.iter().enumerate() {
        let name = match &case.name {
            Some(name) => name.clone(),
            None => format!("case {i}"),
        };
        let name_len = name.len();
        let padding = if name_len >= 75 {
            " ".to_string()
        } else {
            " ".repeat(76 - name_len)
        };
        print!("{name}...");
        match run_case(graph, case, suite.position) {
            Err(e) => {
                println!("{padding}failed\n  {e}");
                errors.push((name, e));
            }
            Ok(_) => println!("{padding}ok"),
        }
    }

    println!("{}", "-".repeat(85));
    if errors.is_empty() {
        println!("All {} cases passed!", suite.cases.len());
        Ok(suite.cases.len())
    } else {
        println!(
            "Failed cases: {} / {}\n{}",
            errors.len(),
            suite.cases.len(),
            errors.iter().map(|(n, e)| format!("  {n}: {e}")).join("\n")
        );
        Err(vec![format!("{} case(s) failed.", errors.len())])
    }
}

fn run_case<T: FieldElement>(
    graph: &Graph<T>,
    case: &Case,
    position: usize,
) -> Result<(), String> {
    let expected = inputs::parse_element::<T>(&case.expected)?;
    let signals = case
        .inputs
        .iter()
        .map(|(name, value)| Ok((name.clone(), inputs::parse_signal(name, value)?)))
        .collect::<Result<BTreeMap<_, _>, String>>()?;
    let witness = WitnessGenerator::new(graph)
        .with_inputs(signals)
        .generate()
        .map_err(|e| e.to_string())?;
    let computed = *witness
        .get(position)
        .ok_or_else(|| format!("witness has no entry at position {position}"))?;
    if computed != expected {
        log::debug!("- expected 0x{expected:x}");
        log::debug!("+ computed 0x{computed:x}");
        return Err(format!("expected 0x{expected:x}, got 0x{computed:x}"));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use test_log::test;
    use witcalc_number::Bn254Field;
    use witcalc_poseidon::{hash_circuit, instance};

    use super::*;

    fn poseidon2_graph(n_inputs: u32) -> Graph<Bn254Field> {
        hash_circuit(&instance::bn254_t3(), n_inputs).unwrap()
    }

    #[test]
    fn default_suite_passes_on_the_standard_circuit() {
        let count = run_suite(&poseidon2_graph(3), &poseidon2_default_suite()).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn mismatch_is_reported() {
        let mut suite = poseidon2_default_suite();
        suite.cases[0].expected = "7".to_string();
        let errors = run_suite(&poseidon2_graph(3), &suite).unwrap_err();
        assert_eq!(errors, vec!["1 case(s) failed.".to_string()]);
    }

    #[test]
    fn position_defaults_to_the_first_output() {
        let suite: VectorSuite = serde_json::from_str(
            r#"{"cases": [{"inputs": {"in": [0]}, "expected":
                "0x1e21e979cc3fd844b88c2016fd18f4db07a698aa27deca67ca509f5b0a4480d0"}]}"#,
        )
        .unwrap();
        assert_eq!(suite.position, 1);
        assert_eq!(run_suite(&poseidon2_graph(1), &suite).unwrap(), 1);
    }

    #[test]
    fn unnamed_cases_are_numbered() {
        let mut suite = poseidon2_default_suite();
        suite.cases[1].name = None;
        suite.cases[1].expected = "7".to_string();
        let errors = run_suite(&poseidon2_graph(3), &suite).unwrap_err();
        assert_eq!(errors, vec!["1 case(s) failed.".to_string()]);
    }

    #[test]
    fn wrong_signal_name_fails_the_case() {
        let mut suite = poseidon2_default_suite();
        suite.cases[0].inputs = BTreeMap::from([("out".to_string(), Value::from(vec![1, 2, 3]))]);
        assert!(run_suite(&poseidon2_graph(3), &suite).is_err());
    }
}
