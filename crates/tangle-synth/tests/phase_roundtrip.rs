//! Round-trip tests for phase-polynomial synthesis.

use proptest::prelude::*;
use tangle_ir::{ANGLE_TOLERANCE, Angle, GateKind, Network, SymbolicAngle, Wire};
use tangle_synth::verify::{accumulated_phase, apply_rewire, expected_phase, simulate_linear};
use tangle_synth::{
    BitMatrix, CnotPatelParams, GraySynthParams, ParityTerms, PhaseStrategy, SynthError,
    gray_synth, gray_synth_into, gray_synth_with, linear_synth,
};

fn paper_terms() -> ParityTerms {
    [0b0110, 0b0001, 0b1001, 0b0111, 0b1011, 0b0011]
        .into_iter()
        .map(|mask| (mask, Angle::ONE_EIGHTH))
        .collect()
}

fn rotations(net: &Network) -> usize {
    net.gates()
        .filter(|(_, g)| matches!(g.kind(), GateKind::RotationZ(_)))
        .count()
}

fn assert_phases(net: &Network, terms: &ParityTerms, num_qubits: u32) {
    for x in 0..1u64 << num_qubits {
        assert_eq!(
            accumulated_phase(net, x).unwrap(),
            expected_phase(terms, x),
            "basis state {x:#b}"
        );
    }
}

#[test]
fn gray_synth_paper_example() {
    let terms = paper_terms();
    let net = gray_synth(4, &terms).unwrap();
    assert!(net.verify_integrity().is_ok());
    assert!(simulate_linear(&net).unwrap().is_identity());
    assert_eq!(rotations(&net), 6);
    assert_phases(&net, &terms, 4);
}

#[test]
fn gray_synth_with_linear_transform() {
    let terms = paper_terms();
    let target = BitMatrix::from_rows(vec![0b0011, 0b0010, 0b1100, 0b1000]).unwrap();
    let params = GraySynthParams::with_linear_transform(target.clone());
    let net = gray_synth_with(4, &terms, &params).unwrap();
    assert_eq!(simulate_linear(&net).unwrap(), target);
    assert_phases(&net, &terms, 4);
}

#[test]
fn gray_synth_with_rewired_transform() {
    let terms = paper_terms();
    let target = BitMatrix::from_rows(vec![0b0100, 0b0011, 0b0001, 0b1000]).unwrap();
    let params = GraySynthParams {
        linear_transform: Some(target.clone()),
        cnot_patel: CnotPatelParams {
            allow_rewiring: true,
            ..CnotPatelParams::default()
        },
    };
    let net = gray_synth_with(4, &terms, &params).unwrap();
    let simulated = simulate_linear(&net).unwrap();
    assert_eq!(apply_rewire(&simulated, net.rewire_map()).unwrap(), target);
    assert_phases(&net, &terms, 4);
}

#[test]
fn linear_synth_strategies_differ_only_in_order() {
    let terms: ParityTerms = [(0b011, Angle::ONE_EIGHTH)].into_iter().collect();
    let binary = linear_synth(3, &terms, PhaseStrategy::Binary).unwrap();
    let gray = linear_synth(3, &terms, PhaseStrategy::Gray).unwrap();

    let kinds =
        |net: &Network| -> Vec<GateKind> { net.gates().map(|(_, g)| *g.kind()).collect() };
    assert_ne!(kinds(&binary), kinds(&gray));
    assert!(gray.num_gates() < binary.num_gates());

    for net in [&binary, &gray] {
        assert!(simulate_linear(net).unwrap().is_identity());
        assert_phases(net, &terms, 3);
    }
    for x in 0..8 {
        assert_eq!(
            accumulated_phase(&binary, x).unwrap(),
            accumulated_phase(&gray, x).unwrap()
        );
    }
}

#[test]
fn zero_angles_emit_no_rotation() {
    let terms: ParityTerms = [
        (0b01, Angle::ONE_EIGHTH),
        (0b01, Angle::SEVEN_EIGHTH),
        (0b11, Angle::ZERO),
        (0b10, Angle::radians(0.0)),
    ]
    .into_iter()
    .collect();
    let gray = gray_synth(2, &terms).unwrap();
    assert_eq!(gray.num_gates(), 0);

    let staircase = linear_synth(2, &terms, PhaseStrategy::Gray).unwrap();
    assert_eq!(rotations(&staircase), 0);
    for x in 0..4 {
        let phase = accumulated_phase(&staircase, x).unwrap();
        assert!(phase.approx_eq(&expected_phase(&terms, x), ANGLE_TOLERANCE));
    }
}

#[test]
fn empty_terms_yield_empty_networks() {
    for n in 0..=5 {
        let terms = ParityTerms::new();
        assert_eq!(gray_synth(n, &terms).unwrap().num_gates(), 0);
        assert_eq!(gray_synth(n, &terms).unwrap().num_qubits(), n as usize);
        for strategy in [PhaseStrategy::Binary, PhaseStrategy::Gray] {
            let net = linear_synth(n, &terms, strategy).unwrap();
            assert_eq!(net.num_gates(), 0);
            assert_eq!(net.num_qubits(), n as usize);
        }
    }
}

#[test]
fn numeric_angles_accumulate_within_tolerance() {
    let terms: ParityTerms = [(0b101, Angle::radians(0.3)), (0b110, Angle::radians(-1.1))]
        .into_iter()
        .collect();
    let net = gray_synth(3, &terms).unwrap();
    for x in 0..8 {
        let got = accumulated_phase(&net, x).unwrap();
        let want = expected_phase(&terms, x);
        assert!(got.approx_eq(&want, ANGLE_TOLERANCE), "{got} vs {want}");
    }
}

#[test]
fn appends_on_mapped_qubits() {
    let mut net = Network::with_qubits(5);
    let qubits = [Wire::qubit(4), Wire::qubit(0), Wire::qubit(2)];
    let terms: ParityTerms = [(0b011, Angle::ONE_EIGHTH), (0b111, Angle::ONE_QUARTER)]
        .into_iter()
        .collect();
    gray_synth_into(&mut net, &qubits, &terms, &GraySynthParams::default()).unwrap();

    assert!(net.verify_integrity().is_ok());
    assert!(simulate_linear(&net).unwrap().is_identity());
    for (_, gate) in net.gates() {
        assert!(gate.wires().all(|w| qubits.contains(&w)));
    }
    // Term bit i lives on qubits[i]: bit 0 on q4, bit 1 on q0, bit 2 on q2.
    let spread = |x: u64| -> u64 {
        (0..3)
            .filter(|&i| (x >> i) & 1 == 1)
            .map(|i| 1u64 << qubits[i].index())
            .sum()
    };
    for x in 0..8 {
        assert_eq!(
            accumulated_phase(&net, spread(x)).unwrap(),
            expected_phase(&terms, x)
        );
    }
}

#[test]
fn invalid_masks_are_rejected() {
    let terms: ParityTerms = [(0b1000, Angle::ONE_EIGHTH)].into_iter().collect();
    assert!(matches!(
        gray_synth(3, &terms),
        Err(SynthError::InvalidParity { mask: 0b1000, num_qubits: 3 })
    ));
    assert!(matches!(
        linear_synth(3, &terms, PhaseStrategy::Binary),
        Err(SynthError::InvalidParity { .. })
    ));
}

fn arb_terms() -> impl Strategy<Value = (u32, ParityTerms)> {
    (1u32..=6).prop_flat_map(|n| {
        let term = (1u64..1u64 << n, 0u8..8)
            .prop_map(|(mask, k)| (mask, Angle::from(SymbolicAngle::from_eighths(k))));
        prop::collection::vec(term, 0..=12)
            .prop_map(move |terms| (n, terms.into_iter().collect::<ParityTerms>()))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn gray_synth_matches_phase_polynomial((n, terms) in arb_terms()) {
        let net = gray_synth(n, &terms).unwrap();
        prop_assert!(net.verify_integrity().is_ok());
        prop_assert!(simulate_linear(&net).unwrap().is_identity());
        for x in 0..1u64 << n {
            prop_assert_eq!(accumulated_phase(&net, x).unwrap(), expected_phase(&terms, x));
        }
    }

    #[test]
    fn linear_synth_matches_phase_polynomial((n, terms) in arb_terms(), binary in any::<bool>()) {
        let strategy = if binary { PhaseStrategy::Binary } else { PhaseStrategy::Gray };
        let net = linear_synth(n, &terms, strategy).unwrap();
        prop_assert!(simulate_linear(&net).unwrap().is_identity());
        for x in 0..1u64 << n {
            prop_assert_eq!(accumulated_phase(&net, x).unwrap(), expected_phase(&terms, x));
        }
    }

    #[test]
    fn rotations_match_nonzero_terms((n, terms) in arb_terms()) {
        let nonzero = terms.iter().filter(|(_, a)| !a.is_zero()).count();
        prop_assert_eq!(rotations(&gray_synth(n, &terms).unwrap()), nonzero);
        prop_assert_eq!(
            rotations(&linear_synth(n, &terms, PhaseStrategy::Gray).unwrap()),
            nonzero
        );
    }
}
