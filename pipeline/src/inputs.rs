//! Parsing of circuit input files.

use std::{collections::BTreeMap, fs, path::Path};

use serde_json::Value;
use witcalc_number::FieldElement;

/// Reads input signal values from a JSON file.
///
/// The file maps signal names to values the way circom input files do: a
/// value is an integer, a decimal or `0x` prefixed hex string, or an
/// arbitrarily nested array of values, which is flattened depth first.
pub fn read_inputs_file<T: FieldElement>(path: &Path) -> Result<BTreeMap<String, Vec<T>>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Error reading input file {}: {e}", path.display()))?;
    parse_inputs(&contents)
}

/// Parses the contents of an input file.
pub fn parse_inputs<T: FieldElement>(contents: &str) -> Result<BTreeMap<String, Vec<T>>, String> {
    let json: Value = serde_json::from_str(contents).map_err(|e| format!("Invalid JSON: {e}"))?;
    let Value::Object(signals) = json else {
        return Err("Expected a JSON object mapping signal names to values".to_string());
    };
    signals
        .into_iter()
        .map(|(name, value)| {
            let values = parse_signal(&name, &value)?;
            Ok((name, values))
        })
        .collect()
}

/// Parses the value of a single signal, flattening nested arrays depth first.
pub fn parse_signal<T: FieldElement>(name: &str, value: &Value) -> Result<Vec<T>, String> {
    let mut values = Vec::new();
    flatten_value(name, value, &mut values)?;
    Ok(values)
}

fn flatten_value<T: FieldElement>(
    name: &str,
    value: &Value,
    values: &mut Vec<T>,
) -> Result<(), String> {
    match value {
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                values.push(T::from(n));
            } else if let Some(n) = n.as_i64() {
                values.push(T::from(n));
            } else {
                return Err(format!("Signal {name}: expected an integer, got {n}"));
            }
            Ok(())
        }
        Value::String(s) => {
            values.push(parse_element(s).map_err(|e| format!("Signal {name}: {e}"))?);
            Ok(())
        }
        Value::Array(elements) => {
            for element in elements {
                flatten_value(name, element, values)?;
            }
            Ok(())
        }
        other => Err(format!("Signal {name}: unsupported value {other}")),
    }
}

/// Parses a single field element from a decimal or `0x` prefixed hex string.
/// A leading `-` negates the value in the field.
pub fn parse_element<T: FieldElement>(input: &str) -> Result<T, String> {
    let (negative, rest) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let element = match rest.strip_prefix("0x") {
        Some(hex) => T::from_str_radix(hex, 16),
        None => T::from_str(rest),
    }?;
    Ok(if negative { -element } else { element })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use witcalc_number::Bn254Field;

    use super::*;

    fn parse(contents: &str) -> Result<BTreeMap<String, Vec<Bn254Field>>, String> {
        parse_inputs(contents)
    }

    #[test]
    fn numbers_strings_and_arrays() {
        let inputs = parse(r#"{"a": 5, "b": ["1", "0x0a"], "c": [[1, 2], [3, 4]]}"#).unwrap();
        assert_eq!(
            inputs,
            BTreeMap::from([
                ("a".to_string(), vec![Bn254Field::from(5)]),
                ("b".to_string(), [1u64, 10].map(Bn254Field::from).to_vec()),
                (
                    "c".to_string(),
                    [1u64, 2, 3, 4].map(Bn254Field::from).to_vec()
                ),
            ])
        );
    }

    #[test]
    fn negative_values_wrap_around() {
        let inputs = parse(r#"{"a": [-1, "-2"]}"#).unwrap();
        assert_eq!(
            inputs["a"],
            vec![-Bn254Field::from(1), -Bn254Field::from(2)]
        );
    }

    #[test]
    fn values_larger_than_u64() {
        let inputs =
            parse(r#"{"a": ["21888242871839275222246405745257275088548364400416034343698204186575808495616"]}"#)
                .unwrap();
        assert_eq!(inputs["a"], vec![-Bn254Field::from(1)]);
    }

    #[test]
    fn floats_are_rejected() {
        assert!(parse(r#"{"a": 1.5}"#).is_err());
    }

    #[test]
    fn booleans_are_rejected() {
        assert!(parse(r#"{"a": true}"#).is_err());
    }

    #[test]
    fn top_level_must_be_an_object() {
        assert!(parse("[1, 2]").is_err());
    }
}
