//! Gate networks as a DAG over wires.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::angle::Angle;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind};
use crate::wire::{Wire, WireInfo, WireKind};

/// Node index type for the network graph.
pub type NodeId = NodeIndex<u32>;

/// What a node in the network stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOp {
    /// Input sentinel of a wire.
    Input(Wire),
    /// Output sentinel of a wire.
    Output(Wire),
    /// A gate.
    Gate(Gate),
}

/// A node of the network together with its scratch tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    op: NodeOp,
    marked: bool,
    visited: bool,
}

impl Node {
    fn new(op: NodeOp) -> Self {
        Self {
            op,
            marked: false,
            visited: false,
        }
    }

    /// What the node stands for.
    #[inline]
    pub fn op(&self) -> &NodeOp {
        &self.op
    }

    /// Check if this is an input sentinel.
    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self.op, NodeOp::Input(_))
    }

    /// Check if this is an output sentinel.
    #[inline]
    pub fn is_output(&self) -> bool {
        matches!(self.op, NodeOp::Output(_))
    }

    /// Get the gate if this is a gate node.
    #[inline]
    pub fn gate(&self) -> Option<&Gate> {
        match &self.op {
            NodeOp::Gate(gate) => Some(gate),
            _ => None,
        }
    }

    /// Whether the node is marked.
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Whether the node is tagged as visited.
    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }
}

/// An edge of the network, one per wire segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireEdge {
    /// The wire this edge belongs to.
    pub wire: Wire,
}

#[derive(Debug, Clone)]
struct WireData {
    info: WireInfo,
    /// Input sentinel, gates in temporal order, output sentinel.
    nodes: Vec<NodeId>,
}

/// A network of gates over qubits and classical bits.
///
/// Every wire owns an ordered list of the nodes that touch it, starting
/// with its input sentinel and ending with its output sentinel. The same
/// order is mirrored by one graph edge per consecutive pair.
///
/// Nodes are never physically removed. Passes mark nodes they want gone
/// and call [`Network::remove_marked`] to obtain a compacted copy. The
/// `visited` tag is scratch space for a single pass: whoever sets it
/// clears it with [`Network::clear_visited`] before the next pass runs.
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: DiGraph<Node, WireEdge, u32>,
    wires: Vec<WireData>,
    gate_order: Vec<NodeId>,
    labels: FxHashMap<String, Wire>,
    rewire: Vec<u32>,
    num_qubits: usize,
}

impl Network {
    /// Create a new empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a network with `n` unlabelled qubits.
    pub fn with_qubits(n: u32) -> Self {
        let mut net = Self::new();
        for _ in 0..n {
            net.add_qubit();
        }
        net
    }

    /// Add an unlabelled qubit.
    pub fn add_qubit(&mut self) -> Wire {
        self.push_wire(WireKind::Qubit, None)
    }

    /// Add an unlabelled classical bit.
    pub fn add_cbit(&mut self) -> Wire {
        self.push_wire(WireKind::Cbit, None)
    }

    /// Add a labelled qubit.
    ///
    /// # Errors
    ///
    /// Returns `LabelCollision` if the label is taken.
    pub fn add_named_qubit(&mut self, label: impl Into<String>) -> IrResult<Wire> {
        self.add_named(WireKind::Qubit, label.into())
    }

    /// Add a labelled classical bit.
    ///
    /// # Errors
    ///
    /// Returns `LabelCollision` if the label is taken.
    pub fn add_named_cbit(&mut self, label: impl Into<String>) -> IrResult<Wire> {
        self.add_named(WireKind::Cbit, label.into())
    }

    fn add_named(&mut self, kind: WireKind, label: String) -> IrResult<Wire> {
        if self.labels.contains_key(&label) {
            return Err(IrError::LabelCollision(label));
        }
        Ok(self.push_wire(kind, Some(label)))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_wire(&mut self, kind: WireKind, label: Option<String>) -> Wire {
        let index = self.wires.len() as u32;
        let wire = match kind {
            WireKind::Qubit => Wire::qubit(index),
            WireKind::Cbit => Wire::cbit(index),
        };
        let in_node = self.graph.add_node(Node::new(NodeOp::Input(wire)));
        let out_node = self.graph.add_node(Node::new(NodeOp::Output(wire)));
        self.graph.add_edge(in_node, out_node, WireEdge { wire });

        let info = match label {
            Some(label) => {
                self.labels.insert(label.clone(), wire);
                WireInfo::with_label(wire, label)
            }
            None => WireInfo::new(wire),
        };
        self.wires.push(WireData {
            info,
            nodes: vec![in_node, out_node],
        });
        self.rewire.push(index);
        if kind == WireKind::Qubit {
            self.num_qubits += 1;
        }
        wire
    }

    /// Append a gate built from its parts.
    ///
    /// # Errors
    ///
    /// See [`Network::emplace_gate`].
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        controls: Vec<Wire>,
        targets: Vec<Wire>,
    ) -> IrResult<NodeId> {
        self.emplace_gate(Gate::new(kind, controls, targets)?)
    }

    /// Append a gate after everything already on its wires.
    ///
    /// # Errors
    ///
    /// Returns the gate's validation error, or `WireNotFound` when an
    /// operand does not belong to this network.
    pub fn emplace_gate(&mut self, gate: Gate) -> IrResult<NodeId> {
        gate.validate()?;
        for wire in gate.wires() {
            if self.wire_data(wire).is_err() {
                return Err(IrError::WireNotFound {
                    wire,
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }
        Ok(self.splice(gate))
    }

    /// Append an already validated gate.
    fn splice(&mut self, gate: Gate) -> NodeId {
        let operands: Vec<Wire> = gate.wires().map(Wire::positive).collect();
        let node = self.graph.add_node(Node::new(NodeOp::Gate(gate)));

        for wire in operands {
            let nodes = &mut self.wires[wire.index() as usize].nodes;
            let out_pos = nodes.len() - 1;
            let out_node = nodes[out_pos];
            let prev_node = nodes[out_pos - 1];
            nodes.insert(out_pos, node);

            if let Some(edge) = self.graph.find_edge(prev_node, out_node) {
                self.graph.remove_edge(edge);
            }
            self.graph.add_edge(prev_node, node, WireEdge { wire });
            self.graph.add_edge(node, out_node, WireEdge { wire });
        }

        self.gate_order.push(node);
        node
    }

    /// Append a CNOT.
    ///
    /// # Errors
    ///
    /// See [`Network::emplace_gate`].
    pub fn cx(&mut self, control: Wire, target: Wire) -> IrResult<NodeId> {
        self.emplace_gate(Gate::cx(control, target))
    }

    /// Append a multiple-controlled X.
    ///
    /// # Errors
    ///
    /// See [`Network::emplace_gate`].
    pub fn mcx(&mut self, controls: Vec<Wire>, targets: Vec<Wire>) -> IrResult<NodeId> {
        self.emplace_gate(Gate::mcx(controls, targets))
    }

    /// Append a phase rotation.
    ///
    /// # Errors
    ///
    /// See [`Network::emplace_gate`].
    pub fn rotation_z(&mut self, angle: Angle, target: Wire) -> IrResult<NodeId> {
        self.emplace_gate(Gate::rotation_z(angle, target))
    }

    fn wire_data(&self, wire: Wire) -> IrResult<&WireData> {
        self.wires
            .get(wire.index() as usize)
            .filter(|data| data.info.wire.kind() == wire.kind())
            .ok_or(IrError::WireNotFound {
                wire,
                gate_name: None,
            })
    }

    /// Iterate over wires in declaration order.
    pub fn wires(&self) -> impl Iterator<Item = Wire> + '_ {
        self.wires.iter().map(|data| data.info.wire)
    }

    /// Iterate over qubits in declaration order.
    pub fn qubits(&self) -> impl Iterator<Item = Wire> + '_ {
        self.wires().filter(|w| w.is_qubit())
    }

    /// Iterate over unmarked gates in insertion order.
    pub fn gates(&self) -> impl Iterator<Item = (NodeId, &Gate)> + '_ {
        self.gate_order.iter().filter_map(move |&id| {
            let node = &self.graph[id];
            match &node.op {
                NodeOp::Gate(gate) if !node.marked => Some((id, gate)),
                _ => None,
            }
        })
    }

    /// Iterate over every node, sentinels and marked gates included.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.graph
            .node_indices()
            .map(move |id| (id, &self.graph[id]))
    }

    /// Call `f` on every wire.
    pub fn foreach_wire<F: FnMut(Wire)>(&self, f: F) {
        self.wires().for_each(f);
    }

    /// Call `f` on every unmarked gate.
    pub fn foreach_gate<F: FnMut(NodeId, &Gate)>(&self, mut f: F) {
        self.gates().for_each(|(id, gate)| f(id, gate));
    }

    /// Call `f` on every node.
    pub fn foreach_node<F: FnMut(NodeId, &Node)>(&self, mut f: F) {
        self.nodes().for_each(|(id, node)| f(id, node));
    }

    /// Get a node.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNode` for an unknown id.
    pub fn node(&self, id: NodeId) -> IrResult<&Node> {
        self.graph.node_weight(id).ok_or(IrError::InvalidNode)
    }

    /// Get the gate of a gate node.
    #[inline]
    pub fn gate(&self, id: NodeId) -> Option<&Gate> {
        self.graph.node_weight(id).and_then(Node::gate)
    }

    /// The ordered node list of a wire, sentinels included.
    ///
    /// # Errors
    ///
    /// Returns `WireNotFound` for a wire of another network.
    pub fn wire_nodes(&self, wire: Wire) -> IrResult<&[NodeId]> {
        Ok(&self.wire_data(wire)?.nodes)
    }

    /// Label and identity of a wire.
    ///
    /// # Errors
    ///
    /// Returns `WireNotFound` for a wire of another network.
    pub fn wire_info(&self, wire: Wire) -> IrResult<&WireInfo> {
        Ok(&self.wire_data(wire)?.info)
    }

    /// Look up a wire by its label.
    pub fn wire_by_label(&self, label: &str) -> Option<Wire> {
        self.labels.get(label).copied()
    }

    /// The node before `id` on `wire`, if `id` touches `wire` and is not its input.
    pub fn predecessor(&self, id: NodeId, wire: Wire) -> Option<NodeId> {
        self.graph
            .edges_directed(id, Direction::Incoming)
            .find(|e| e.weight().wire == wire)
            .map(|e| e.source())
    }

    /// The node after `id` on `wire`, if `id` touches `wire` and is not its output.
    pub fn successor(&self, id: NodeId, wire: Wire) -> Option<NodeId> {
        self.graph
            .edges_directed(id, Direction::Outgoing)
            .find(|e| e.weight().wire == wire)
            .map(|e| e.target())
    }

    /// Set the mark of a node and return the previous value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNode` for an unknown id.
    pub fn mark(&mut self, id: NodeId, value: bool) -> IrResult<bool> {
        let node = self.graph.node_weight_mut(id).ok_or(IrError::InvalidNode)?;
        Ok(std::mem::replace(&mut node.marked, value))
    }

    /// Whether a node is marked. Unknown ids are never marked.
    pub fn is_marked(&self, id: NodeId) -> bool {
        self.graph.node_weight(id).is_some_and(Node::is_marked)
    }

    /// Whether a node carries the visited tag. Unknown ids are never visited.
    pub fn visited(&self, id: NodeId) -> bool {
        self.graph.node_weight(id).is_some_and(Node::is_visited)
    }

    /// Set the visited tag of a node and return the previous value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNode` for an unknown id.
    pub fn set_visited(&mut self, id: NodeId, value: bool) -> IrResult<bool> {
        let node = self.graph.node_weight_mut(id).ok_or(IrError::InvalidNode)?;
        Ok(std::mem::replace(&mut node.visited, value))
    }

    /// Clear the visited tag on every node.
    pub fn clear_visited(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.visited = false;
        }
    }

    /// Build a copy of the network without its marked gates.
    ///
    /// Wires, labels and the rewire map carry over unchanged, and the
    /// remaining gates keep their relative order.
    pub fn remove_marked(&self) -> Network {
        let mut net = Network::new();
        for data in &self.wires {
            net.push_wire(data.info.wire.kind(), data.info.label.clone());
        }
        for (_, gate) in self.gates() {
            net.splice(gate.clone());
        }
        net.rewire.clone_from(&self.rewire);
        net
    }

    /// Attach a wire permutation produced by a synthesis pass.
    ///
    /// Entry `i` names the wire whose content ends up on wire `i`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRewire` unless `map` is a permutation of
    /// `0..num_wires()`.
    pub fn rewire(&mut self, map: Vec<u32>) -> IrResult<()> {
        if map.len() != self.wires.len() {
            return Err(IrError::InvalidRewire(format!(
                "expected {} entries, got {}",
                self.wires.len(),
                map.len()
            )));
        }
        let mut seen = vec![false; map.len()];
        for &entry in &map {
            match seen.get_mut(entry as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(IrError::InvalidRewire(format!("{entry} appears twice")));
                }
                None => {
                    return Err(IrError::InvalidRewire(format!("{entry} is out of range")));
                }
            }
        }
        self.rewire = map;
        Ok(())
    }

    /// The current wire permutation; the identity unless a pass set one.
    #[inline]
    pub fn rewire_map(&self) -> &[u32] {
        &self.rewire
    }

    /// Number of nodes: two sentinels per wire plus every gate node.
    #[inline]
    pub fn size(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of wires.
    #[inline]
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of classical bits.
    #[inline]
    pub fn num_cbits(&self) -> usize {
        self.wires.len() - self.num_qubits
    }

    /// Number of gate nodes, marked or not.
    #[inline]
    pub fn num_gates(&self) -> usize {
        self.gate_order.len()
    }

    /// Length of the longest path of unmarked gates.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.wires.len()];
        let mut max_depth = 0;
        for (_, gate) in self.gates() {
            let level = gate
                .wires()
                .map(|w| levels[w.index() as usize])
                .max()
                .unwrap_or(0)
                + 1;
            for w in gate.wires() {
                levels[w.index() as usize] = level;
            }
            max_depth = max_depth.max(level);
        }
        max_depth
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<Node, WireEdge, u32> {
        &self.graph
    }

    /// Verify the structural integrity of the network.
    ///
    /// Checks that:
    /// - The graph is acyclic
    /// - Every wire starts at its input sentinel and ends at its output sentinel
    /// - Every interior node of a wire is a gate touching that wire
    /// - Consecutive nodes of a wire are joined by an edge of that wire
    /// - Every gate appears on exactly the wires it touches
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidNetwork("graph contains a cycle".into()));
        }

        let mut edges_expected = 0;
        let mut appearances: FxHashMap<NodeId, usize> = FxHashMap::default();
        for data in &self.wires {
            let wire = data.info.wire;
            let (Some(&first), Some(&last)) = (data.nodes.first(), data.nodes.last()) else {
                return Err(IrError::InvalidNetwork(format!("wire {wire} has no sentinels")));
            };
            if self.graph[first].op != NodeOp::Input(wire) {
                return Err(IrError::InvalidNetwork(format!(
                    "wire {wire} does not start at its input"
                )));
            }
            if self.graph[last].op != NodeOp::Output(wire) {
                return Err(IrError::InvalidNetwork(format!(
                    "wire {wire} does not end at its output"
                )));
            }

            for &id in &data.nodes[1..data.nodes.len() - 1] {
                let touches = self.gate(id).is_some_and(|g| g.touches(wire));
                if !touches {
                    return Err(IrError::InvalidNetwork(format!(
                        "node {} on wire {wire} does not act on it",
                        id.index()
                    )));
                }
                *appearances.entry(id).or_default() += 1;
            }

            for pair in data.nodes.windows(2) {
                let linked = self
                    .graph
                    .edges_connecting(pair[0], pair[1])
                    .any(|e| e.weight().wire == wire);
                if !linked {
                    return Err(IrError::InvalidNetwork(format!(
                        "wire {wire} is broken between nodes {} and {}",
                        pair[0].index(),
                        pair[1].index()
                    )));
                }
            }
            edges_expected += data.nodes.len() - 1;
        }

        if edges_expected != self.graph.edge_count() {
            return Err(IrError::InvalidNetwork(format!(
                "expected {edges_expected} edges, found {}",
                self.graph.edge_count()
            )));
        }

        for &id in &self.gate_order {
            let Some(gate) = self.gate(id) else {
                return Err(IrError::InvalidNetwork(format!(
                    "gate order refers to non-gate node {}",
                    id.index()
                )));
            };
            let distinct: FxHashSet<Wire> = gate.wires().collect();
            if appearances.get(&id).copied().unwrap_or(0) != distinct.len() {
                return Err(IrError::InvalidNetwork(format!(
                    "gate node {} is missing from one of its wires",
                    id.index()
                )));
            }
        }

        Ok(())
    }
}
