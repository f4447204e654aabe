//! Witness generation: a single sequential pass over the nodes of a
//! validated graph.

use std::collections::BTreeMap;
use std::time::Instant;

use witcalc_graph::{BinaryOperation, Graph, Node, NodeId, UnaryOperation};
use witcalc_number::FieldElement;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    #[error("unknown input signal {0}")]
    UnknownInput(String),
    #[error("missing value for input signal {0}")]
    MissingInput(String),
    #[error("input signal {name} has {actual} components, expected {expected}")]
    InputLength {
        name: String,
        expected: u32,
        actual: usize,
    },
    #[error("division by zero at node {0}")]
    DivisionByZero(NodeId),
}

/// The ordered value sequence produced by evaluating a graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness<T> {
    values: Vec<T>,
}

impl<T: FieldElement> Witness<T> {
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }
}

pub struct WitnessGenerator<'a, T: FieldElement> {
    graph: &'a Graph<T>,
    inputs: BTreeMap<String, Vec<T>>,
}

impl<'a, T: FieldElement> WitnessGenerator<'a, T> {
    pub fn new(graph: &'a Graph<T>) -> Self {
        WitnessGenerator {
            graph,
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_inputs(self, inputs: BTreeMap<String, Vec<T>>) -> Self {
        WitnessGenerator { inputs, ..self }
    }

    /// Computes the witness.
    ///
    /// Nodes are evaluated strictly in order; the forward-reference
    /// invariant of [Graph::validate] guarantees all operands are already
    /// available.
    pub fn generate(self) -> Result<Witness<T>, EvalError> {
        self.graph.validate().map_err(EvalError::InvalidGraph)?;
        let input_vector = self.flatten_inputs()?;

        let start = Instant::now();
        let mut values: Vec<T> = Vec::with_capacity(self.graph.nodes.len());
        for (i, node) in self.graph.nodes.iter().enumerate() {
            let value = match node {
                Node::Constant(c) => *c,
                Node::Input { index } => input_vector[*index as usize],
                Node::Unary { op, operand } => {
                    let v = values[operand.0 as usize];
                    match op {
                        UnaryOperation::Neg => -v,
                    }
                }
                Node::Binary { op, left, right } => {
                    let l = values[left.0 as usize];
                    let r = values[right.0 as usize];
                    match op {
                        BinaryOperation::Add => l + r,
                        BinaryOperation::Sub => l - r,
                        BinaryOperation::Mul => l * r,
                        BinaryOperation::Div => {
                            let inverse = r
                                .inverse()
                                .ok_or_else(|| EvalError::DivisionByZero(NodeId(i as u32)))?;
                            l * inverse
                        }
                    }
                }
            };
            values.push(value);
        }
        log::debug!(
            "Evaluated {} nodes in {}s",
            values.len(),
            start.elapsed().as_secs_f32()
        );

        Ok(Witness {
            values: self
                .graph
                .witness
                .iter()
                .map(|id| values[id.0 as usize])
                .collect(),
        })
    }

    /// Binds the named inputs to the flattened input vector, checking that
    /// exactly the declared signals are provided with their declared
    /// lengths.
    fn flatten_inputs(&self) -> Result<Vec<T>, EvalError> {
        for name in self.inputs.keys() {
            if !self.graph.inputs.contains_key(name) {
                return Err(EvalError::UnknownInput(name.clone()));
            }
        }

        let mut vector = vec![T::zero(); self.graph.input_count as usize];
        for (name, range) in &self.graph.inputs {
            let values = self
                .inputs
                .get(name)
                .ok_or_else(|| EvalError::MissingInput(name.clone()))?;
            if values.len() != range.len as usize {
                return Err(EvalError::InputLength {
                    name: name.clone(),
                    expected: range.len,
                    actual: values.len(),
                });
            }
            vector[range.offset as usize..(range.offset + range.len) as usize]
                .copy_from_slice(values);
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;
    use witcalc_graph::GraphBuilder;
    use witcalc_number::{Bls12_381Field, Bn254Field};

    fn inputs<T: FieldElement>(values: &[(&str, Vec<T>)]) -> BTreeMap<String, Vec<T>> {
        values
            .iter()
            .map(|(name, v)| (name.to_string(), v.clone()))
            .collect()
    }

    fn sum_graph<T: FieldElement>() -> Graph<T> {
        let mut builder = GraphBuilder::new();
        let xs = builder.input("x", 3).unwrap();
        let partial = builder.add(xs[0], xs[1]);
        let sum = builder.add(partial, xs[2]);
        builder.output(sum);
        builder.build().unwrap()
    }

    #[test]
    fn witness_layout_and_values() {
        let graph = sum_graph::<Bn254Field>();
        let witness = WitnessGenerator::new(&graph)
            .with_inputs(inputs(&[("x", vec![1u32.into(), 2u32.into(), 3u32.into()])]))
            .generate()
            .unwrap();

        // [one, output, inputs..]
        let expected: Vec<Bn254Field> =
            [1u32, 6, 1, 2, 3].iter().map(|n| (*n).into()).collect();
        assert_eq!(witness.values(), expected);
        assert_eq!(witness.get(1), Some(&6u32.into()));
    }

    #[test]
    fn division_uses_the_field_inverse() {
        let mut builder = GraphBuilder::<Bn254Field>::new();
        let a = builder.input("a", 1).unwrap()[0];
        let b = builder.input("b", 1).unwrap()[0];
        let quotient = builder.div(a, b);
        builder.output(quotient);
        let graph = builder.build().unwrap();

        let witness = WitnessGenerator::new(&graph)
            .with_inputs(inputs(&[("a", vec![3u32.into()]), ("b", vec![4u32.into()])]))
            .generate()
            .unwrap();

        let expected = Bn254Field::from(3) * Bn254Field::from(4).inverse().unwrap();
        assert_eq!(*witness.get(1).unwrap(), expected);
        assert_eq!(expected * 4u32.into(), 3u32.into());
    }

    #[test]
    fn division_by_zero_reports_the_node() {
        let mut builder = GraphBuilder::<Bn254Field>::new();
        let a = builder.input("a", 1).unwrap()[0];
        let zero = builder.constant(Bn254Field::zero());
        let quotient = builder.div(a, zero);
        builder.output(quotient);
        let graph = builder.build().unwrap();

        let err = WitnessGenerator::new(&graph)
            .with_inputs(inputs(&[("a", vec![3u32.into()])]))
            .generate()
            .unwrap_err();

        assert!(matches!(err, EvalError::DivisionByZero(node) if node == quotient));
    }

    #[test]
    fn negation() {
        let mut builder = GraphBuilder::<Bls12_381Field>::new();
        let x = builder.input("x", 1).unwrap()[0];
        let negated = builder.neg(x);
        let sum = builder.add(x, negated);
        builder.output(negated);
        builder.output(sum);
        let graph = builder.build().unwrap();

        let witness = WitnessGenerator::new(&graph)
            .with_inputs(inputs(&[("x", vec![5u32.into()])]))
            .generate()
            .unwrap();

        assert_eq!(witness.get(1).unwrap().to_string(), "-5");
        assert_eq!(witness.get(2), Some(&Bls12_381Field::zero()));
    }

    #[test]
    fn missing_input_is_an_error() {
        let graph = sum_graph::<Bn254Field>();
        let err = WitnessGenerator::new(&graph).generate().unwrap_err();
        assert!(matches!(err, EvalError::MissingInput(name) if name == "x"));
    }

    #[test]
    fn unknown_input_is_an_error() {
        let graph = sum_graph::<Bn254Field>();
        let err = WitnessGenerator::new(&graph)
            .with_inputs(inputs(&[
                ("x", vec![1u32.into(), 2u32.into(), 3u32.into()]),
                ("y", vec![1u32.into()]),
            ]))
            .generate()
            .unwrap_err();
        assert!(matches!(err, EvalError::UnknownInput(name) if name == "y"));
    }

    #[test]
    fn wrong_input_length_is_an_error() {
        let graph = sum_graph::<Bn254Field>();
        let err = WitnessGenerator::new(&graph)
            .with_inputs(inputs(&[("x", vec![1u32.into()])]))
            .generate()
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::InputLength {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }
}
