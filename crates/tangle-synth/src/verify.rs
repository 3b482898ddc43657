//! Simulation of synthesized networks for round-trip checks.
//!
//! Bit `i` of a pattern is the value of wire `i`, so at most 64 wires can
//! be simulated. Control polarity is honoured: a complemented control is
//! active when its bit is 0.

use tangle_ir::{Angle, Gate, GateKind, Network, Wire};

use crate::bit_matrix::{BitMatrix, MAX_MATRIX_SIZE, check_order};
use crate::error::{SynthError, SynthResult};
use crate::parity::ParityTerms;

fn check_wires(net: &Network) -> SynthResult<()> {
    if net.num_wires() > MAX_MATRIX_SIZE {
        return Err(SynthError::TooManyQubits {
            got: net.num_wires(),
            max: MAX_MATRIX_SIZE,
        });
    }
    Ok(())
}

#[inline]
fn bit(pattern: u64, wire: Wire) -> bool {
    (pattern >> wire.index()) & 1 == 1
}

fn controls_active(gate: &Gate, pattern: u64) -> bool {
    gate.controls()
        .iter()
        .all(|&c| bit(pattern, c) != c.is_complemented())
}

fn flip_targets(gate: &Gate, pattern: u64) -> u64 {
    gate.targets()
        .iter()
        .fold(pattern, |acc, t| acc ^ (1u64 << t.index()))
}

fn swap_bits(gate: &Gate, pattern: u64) -> u64 {
    let (a, b) = (gate.targets()[0], gate.targets()[1]);
    if bit(pattern, a) == bit(pattern, b) {
        pattern
    } else {
        pattern ^ (1u64 << a.index()) ^ (1u64 << b.index())
    }
}

/// Run a classical bit pattern through `net`.
///
/// # Errors
///
/// Returns `NonClassicalGate` for gates that create superpositions or
/// measure, and `TooManyQubits` for networks wider than 64 wires.
pub fn simulate_pattern(net: &Network, input: u64) -> SynthResult<u64> {
    check_wires(net)?;
    net.gates().try_fold(input, |pattern, (_, gate)| {
        Ok(match gate.kind() {
            GateKind::PauliX | GateKind::PauliY | GateKind::Cx | GateKind::Mcx => {
                if controls_active(gate, pattern) {
                    flip_targets(gate, pattern)
                } else {
                    pattern
                }
            }
            GateKind::Swap => swap_bits(gate, pattern),
            kind if kind.is_diagonal() => pattern,
            _ => return Err(SynthError::NonClassicalGate(gate.to_string())),
        })
    })
}

/// The GF(2) matrix computed by the CNOT part of `net`.
///
/// Row `i` is the parity of the inputs held by wire `i` at the end.
///
/// # Errors
///
/// Returns `NonLinearGate` for anything but CNOTs, swaps and diagonal
/// gates, and `TooManyQubits` for networks wider than 64 wires.
pub fn simulate_linear(net: &Network) -> SynthResult<BitMatrix> {
    check_wires(net)?;
    let mut rows: Vec<u64> = (0..net.num_wires()).map(|i| 1u64 << i).collect();
    for (_, gate) in net.gates() {
        match gate.kind() {
            GateKind::Cx | GateKind::Mcx
                if gate.num_controls() == 1 && !gate.controls()[0].is_complemented() =>
            {
                let control = rows[gate.controls()[0].index() as usize];
                for t in gate.targets() {
                    rows[t.index() as usize] ^= control;
                }
            }
            GateKind::Swap => {
                let (a, b) = (gate.targets()[0], gate.targets()[1]);
                rows.swap(a.index() as usize, b.index() as usize);
            }
            kind if kind.is_diagonal() => {}
            _ => return Err(SynthError::NonLinearGate(gate.to_string())),
        }
    }
    BitMatrix::from_rows(rows)
}

/// Phase picked up by `basis_state` on its way through `net`.
///
/// X-type gates move the state along; diagonal gates contribute their
/// phase wherever their controls are active and a target is 1.
///
/// # Errors
///
/// As for [`simulate_pattern`].
pub fn accumulated_phase(net: &Network, basis_state: u64) -> SynthResult<Angle> {
    check_wires(net)?;
    let mut pattern = basis_state;
    let mut phase = Angle::ZERO;

    for (_, gate) in net.gates() {
        let active = controls_active(gate, pattern);
        match gate.kind() {
            GateKind::PauliY => {
                // Y|0> = i|1>, Y|1> = -i|0>
                let target = gate.targets()[0];
                phase += if bit(pattern, target) {
                    Angle::THREE_QUARTER
                } else {
                    Angle::ONE_QUARTER
                };
                pattern = flip_targets(gate, pattern);
            }
            GateKind::PauliX | GateKind::Cx | GateKind::Mcx => {
                if active {
                    pattern = flip_targets(gate, pattern);
                }
            }
            GateKind::Swap => pattern = swap_bits(gate, pattern),
            kind => match kind.diagonal_phase() {
                Some(angle) => {
                    if active {
                        for &t in gate.targets() {
                            if bit(pattern, t) {
                                phase += angle;
                            }
                        }
                    }
                }
                None if kind.is_diagonal() => {}
                None => return Err(SynthError::NonClassicalGate(gate.to_string())),
            },
        }
    }

    Ok(phase)
}

/// `Σ angle` over the terms whose parity on `basis_state` is 1.
pub fn expected_phase(terms: &ParityTerms, basis_state: u64) -> Angle {
    terms
        .iter()
        .filter(|&(mask, _)| (mask & basis_state).count_ones() % 2 == 1)
        .map(|(_, angle)| angle)
        .sum()
}

/// Reorder simulated rows into requested row order: row `p` of `matrix`
/// becomes row `rewire_map[p]` of the result.
///
/// # Errors
///
/// Returns `DimensionMismatch` or `InvalidConfiguration` unless
/// `rewire_map` is a permutation of the rows.
pub fn apply_rewire(matrix: &BitMatrix, rewire_map: &[u32]) -> SynthResult<BitMatrix> {
    check_order(rewire_map, matrix.size())?;
    let mut rows = vec![0u64; matrix.size()];
    for (p, &r) in rewire_map.iter().enumerate() {
        rows[r as usize] = matrix.row(p);
    }
    BitMatrix::from_rows(rows)
}
