//! Property-based tests for network construction and compaction.

use proptest::prelude::*;
use tangle_ir::{Gate, GateKind, Network, SymbolicAngle, Wire};

/// Gate operations that can be applied to a network.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    T(u32),
    Rz(u32, u8),
    Cx(u32, u32),
    Mcx(u32, u32, u32),
}

impl GateOp {
    fn apply(self, net: &mut Network) {
        // Operations with repeated operands are rejected without touching the network.
        let _ = match self {
            GateOp::H(q) => net.emplace_gate(Gate::hadamard(Wire::qubit(q))),
            GateOp::T(q) => net.emplace_gate(Gate::t(Wire::qubit(q))),
            GateOp::Rz(q, k) => {
                net.rotation_z(SymbolicAngle::from_eighths(k).into(), Wire::qubit(q))
            }
            GateOp::Cx(c, t) => net.cx(Wire::qubit(c), Wire::qubit(t)),
            GateOp::Mcx(a, b, t) => {
                net.mcx(vec![Wire::qubit(a), !Wire::qubit(b)], vec![Wire::qubit(t)])
            }
        };
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::T),
        (0..num_qubits, 0u8..8).prop_map(|(q, k)| GateOp::Rz(q, k)),
        (0..num_qubits, 0..num_qubits).prop_map(|(c, t)| GateOp::Cx(c, t)),
        (0..num_qubits, 0..num_qubits, 0..num_qubits).prop_map(|(a, b, t)| GateOp::Mcx(a, b, t)),
    ]
}

fn arb_network() -> impl Strategy<Value = Network> {
    (1_u32..=6).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 0..=30).prop_map(move |ops| {
            let mut net = Network::with_qubits(num_qubits);
            for op in ops {
                op.apply(&mut net);
            }
            net
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn network_invariants_hold(net in arb_network()) {
        prop_assert!(net.verify_integrity().is_ok());
        prop_assert_eq!(net.size(), 2 * net.num_wires() + net.num_gates());

        let touched: usize = net.gates().map(|(_, g)| g.wires().count()).sum();
        let listed: usize = net
            .wires()
            .map(|w| net.wire_nodes(w).unwrap().len() - 2)
            .sum();
        prop_assert_eq!(touched, listed);
    }

    #[test]
    fn remove_marked_keeps_unmarked_order(
        net in arb_network(),
        mask in prop::collection::vec(any::<bool>(), 30),
    ) {
        let mut net = net;
        let ids: Vec<_> = net.gates().map(|(id, _)| id).collect();
        for (i, id) in ids.iter().enumerate() {
            net.mark(*id, mask[i % mask.len()]).unwrap();
        }
        let expected: Vec<Gate> = net.gates().map(|(_, g)| g.clone()).collect();

        let compact = net.remove_marked();
        let actual: Vec<Gate> = compact.gates().map(|(_, g)| g.clone()).collect();
        prop_assert_eq!(&expected, &actual);
        prop_assert_eq!(compact.num_gates(), expected.len());
        prop_assert_eq!(compact.num_wires(), net.num_wires());
        prop_assert!(compact.verify_integrity().is_ok());
    }

    #[test]
    fn depth_never_exceeds_gate_count(net in arb_network()) {
        prop_assert!(net.depth() <= net.num_gates());
        if net.num_gates() > 0 {
            prop_assert!(net.depth() >= 1);
        }
    }
}

#[test]
fn adjacent_adjoints_can_be_cancelled() {
    let mut net = Network::with_qubits(2);
    let q0 = Wire::qubit(0);
    let q1 = Wire::qubit(1);
    net.emplace_gate(Gate::t(q0)).unwrap();
    net.emplace_gate(Gate::t_dagger(q0)).unwrap();
    net.cx(q0, q1).unwrap();
    net.emplace_gate(Gate::hadamard(q1)).unwrap();

    // Cancel neighbouring adjoint pairs along each wire.
    let wires: Vec<Wire> = net.wires().collect();
    for wire in wires {
        let nodes = net.wire_nodes(wire).unwrap().to_vec();
        for pair in nodes.windows(2) {
            if net.visited(pair[0]) || net.visited(pair[1]) {
                continue;
            }
            let (Some(a), Some(b)) = (net.gate(pair[0]), net.gate(pair[1])) else {
                continue;
            };
            if a.is_adjoint(b) {
                net.set_visited(pair[0], true).unwrap();
                net.set_visited(pair[1], true).unwrap();
                net.mark(pair[0], true).unwrap();
                net.mark(pair[1], true).unwrap();
            }
        }
    }
    net.clear_visited();

    let compact = net.remove_marked();
    let kinds: Vec<GateKind> = compact.gates().map(|(_, g)| *g.kind()).collect();
    assert_eq!(kinds, vec![GateKind::Cx, GateKind::Hadamard]);
}

#[test]
fn gate_serializes_with_polarity() {
    let gate = Gate::mcx(vec![!Wire::qubit(0)], vec![Wire::qubit(1)]);
    let json = serde_json::to_string(&gate).unwrap();
    let back: Gate = serde_json::from_str(&json).unwrap();
    assert!(back.controls()[0].is_complemented());
    assert_eq!(back, gate);
}
