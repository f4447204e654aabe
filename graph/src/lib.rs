//! The circuit graph data model: a flat DAG of field operations, the unit
//! of compilation that witness computation consumes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use witcalc_number::FieldElement;

mod builder;
pub mod format;

pub use builder::GraphBuilder;
pub use format::{read_graph_file, write_graph_file, FormatError, SerializedGraph};

/// Index of a node in [Graph::nodes].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperation {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperation {
    Neg,
}

/// A single operation of the circuit.
///
/// Operands always reference earlier nodes, see [Graph::validate].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node<T> {
    Constant(T),
    /// Reads component `index` of the flattened input vector.
    Input {
        index: u32,
    },
    Unary {
        op: UnaryOperation,
        operand: NodeId,
    },
    Binary {
        op: BinaryOperation,
        left: NodeId,
        right: NodeId,
    },
}

/// A named slice of the flattened input vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRange {
    pub offset: u32,
    pub len: u32,
}

/// A compiled circuit.
///
/// `witness` maps witness indices to nodes; the value sequence produced by
/// evaluating the graph and projecting the node values through it is the
/// witness of the circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph<T> {
    pub nodes: Vec<Node<T>>,
    /// Input signals by name. The ranges partition `0..input_count`.
    pub inputs: BTreeMap<String, SignalRange>,
    /// Total number of components of the flattened input vector.
    pub input_count: u32,
    pub witness: Vec<NodeId>,
}

impl<T: FieldElement> Graph<T> {
    /// Checks the structural invariants of the graph: operands reference
    /// strictly earlier nodes (so the graph is acyclic and evaluable in one
    /// forward pass), input indices and signal ranges stay within
    /// `input_count`, the signal ranges partition the flattened input vector
    /// and the witness only references existing nodes.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Graph has no nodes".to_string());
        }
        if self.witness.is_empty() {
            return Err("Graph has an empty witness".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Constant(_) => {}
                Node::Input { index } => {
                    if *index >= self.input_count {
                        return Err(format!(
                            "Node {i} reads input component {index}, but the graph only has {}",
                            self.input_count
                        ));
                    }
                }
                Node::Unary { operand, .. } => self.check_operand(i, *operand)?,
                Node::Binary { left, right, .. } => {
                    self.check_operand(i, *left)?;
                    self.check_operand(i, *right)?;
                }
            }
        }

        let mut ranges: Vec<(&String, &SignalRange)> = self.inputs.iter().collect();
        ranges.sort_by_key(|(_, range)| range.offset);
        let mut next_offset: u32 = 0;
        for (name, range) in ranges {
            if range.len == 0 {
                return Err(format!("Input signal {name} has no components"));
            }
            if range.offset != next_offset {
                return Err(format!(
                    "Input signal {name} starts at component {}, expected {next_offset}",
                    range.offset
                ));
            }
            next_offset = next_offset
                .checked_add(range.len)
                .ok_or_else(|| format!("Input signal {name} overflows the input vector"))?;
        }
        if next_offset != self.input_count {
            return Err(format!(
                "Input signals cover {next_offset} components, but the graph declares {}",
                self.input_count
            ));
        }

        for id in &self.witness {
            if id.0 as usize >= self.nodes.len() {
                return Err(format!("Witness references missing node {id}"));
            }
        }

        Ok(())
    }

    fn check_operand(&self, node_index: usize, operand: NodeId) -> Result<(), String> {
        if operand.0 as usize >= node_index {
            return Err(format!(
                "Node {node_index} references node {operand}, which is not an earlier node"
            ));
        }
        Ok(())
    }
}
