use std::collections::BTreeMap;

use witcalc_number::FieldElement;

use crate::{BinaryOperation, Graph, Node, NodeId, SignalRange, UnaryOperation};

/// Builds a [Graph] node by node.
///
/// Node 0 is always the constant one and occupies witness index 0, so
/// registered outputs start at witness index 1, followed by the input
/// components in flattened order.
pub struct GraphBuilder<T> {
    nodes: Vec<Node<T>>,
    inputs: BTreeMap<String, SignalRange>,
    /// The input nodes, in flattened order.
    input_nodes: Vec<NodeId>,
    outputs: Vec<NodeId>,
}

impl<T: FieldElement> GraphBuilder<T> {
    pub fn new() -> Self {
        GraphBuilder {
            nodes: vec![Node::Constant(T::one())],
            inputs: BTreeMap::new(),
            input_nodes: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// The constant one seeded at node 0.
    pub fn one(&self) -> NodeId {
        NodeId(0)
    }

    /// Declares an input signal of the given flattened length and returns
    /// one node per component.
    pub fn input(&mut self, name: &str, len: u32) -> Result<Vec<NodeId>, String> {
        if len == 0 {
            return Err(format!("Input signal {name} must have at least one component"));
        }
        if self.inputs.contains_key(name) {
            return Err(format!("Duplicate input signal {name}"));
        }
        let offset = self.input_nodes.len() as u32;
        self.inputs
            .insert(name.to_string(), SignalRange { offset, len });
        let nodes = (offset..offset + len)
            .map(|index| self.push(Node::Input { index }))
            .collect::<Vec<_>>();
        self.input_nodes.extend(&nodes);
        Ok(nodes)
    }

    pub fn constant(&mut self, value: T) -> NodeId {
        self.push(Node::Constant(value))
    }

    pub fn add(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOperation::Add, left, right)
    }

    pub fn sub(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOperation::Sub, left, right)
    }

    pub fn mul(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOperation::Mul, left, right)
    }

    pub fn div(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOperation::Div, left, right)
    }

    pub fn neg(&mut self, operand: NodeId) -> NodeId {
        self.push(Node::Unary {
            op: UnaryOperation::Neg,
            operand,
        })
    }

    /// Marks a node as an output. Outputs appear in the witness in
    /// registration order.
    pub fn output(&mut self, node: NodeId) {
        self.outputs.push(node);
    }

    /// Assembles the witness layout `[one, outputs.., inputs..]` and
    /// validates the result.
    pub fn build(self) -> Result<Graph<T>, String> {
        let GraphBuilder {
            nodes,
            inputs,
            input_nodes,
            outputs,
        } = self;
        let mut witness = vec![NodeId(0)];
        witness.extend(outputs);
        witness.extend(&input_nodes);

        let graph = Graph {
            nodes,
            inputs,
            input_count: input_nodes.len() as u32,
            witness,
        };
        graph.validate()?;
        Ok(graph)
    }

    fn binary(&mut self, op: BinaryOperation, left: NodeId, right: NodeId) -> NodeId {
        self.push(Node::Binary { op, left, right })
    }

    fn push(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}

impl<T: FieldElement> Default for GraphBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
