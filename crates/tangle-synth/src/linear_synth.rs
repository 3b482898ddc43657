//! Phase-polynomial synthesis by a fixed CNOT staircase.
//!
//! Every qubit `i > 0` is walked through all parities whose highest set bit
//! is `i` and then restored, so the network has no net linear effect. The
//! rotation of a term is placed the first time a qubit carries its parity.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use tangle_ir::{Network, Wire};

use crate::error::{SynthError, SynthResult};
use crate::mapping::{check_qubit_map, default_qubits};
use crate::parity::ParityTerms;

/// Largest width accepted by the staircase, which visits `2^n` parities.
pub const MAX_STAIRCASE_QUBITS: usize = 24;

/// Order in which a qubit walks through its parities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStrategy {
    /// Counting order; one CNOT per flipped bit.
    Binary,
    /// Reflected Gray code; one CNOT per step.
    #[default]
    Gray,
}

/// Parameters for the staircase synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSynthParams {
    /// Parity order of the staircase.
    pub strategy: PhaseStrategy,
}

impl LinearSynthParams {
    /// Parameters for the given strategy.
    pub fn new(strategy: PhaseStrategy) -> Self {
        Self { strategy }
    }
}

impl From<PhaseStrategy> for LinearSynthParams {
    fn from(strategy: PhaseStrategy) -> Self {
        Self::new(strategy)
    }
}

#[inline]
fn gray_code(k: u64) -> u64 {
    k ^ (k >> 1)
}

/// Controls that walk qubit `i` through its parities, as qubit indices.
fn staircase(i: u32, strategy: PhaseStrategy) -> Vec<u32> {
    let low = 1u64 << i;
    let high = (1u64 << (i + 1)) - 1;
    let mut controls = Vec::new();
    match strategy {
        PhaseStrategy::Gray => {
            for j in (low + 1..=high).rev() {
                controls.push((gray_code(j) ^ gray_code(j - 1)).trailing_zeros());
            }
            controls.push((gray_code(low) ^ gray_code(high)).trailing_zeros());
        }
        PhaseStrategy::Binary => {
            for k in 0..low - 1 {
                let flipped = k ^ (k + 1);
                controls.extend((0..i).filter(|&b| (flipped >> b) & 1 == 1));
            }
            controls.extend(0..i);
        }
    }
    controls
}

/// Synthesize `terms` on `num_qubits` qubits as a staircase.
///
/// An empty set of terms yields a network without gates.
///
/// # Errors
///
/// Returns `InvalidParity` for masks that are zero or wider than
/// `num_qubits`, and `TooManyQubits` beyond [`MAX_STAIRCASE_QUBITS`].
pub fn linear_synth(
    num_qubits: u32,
    terms: &ParityTerms,
    params: impl Into<LinearSynthParams>,
) -> SynthResult<Network> {
    check_width(num_qubits as usize)?;
    let mut net = Network::with_qubits(num_qubits);
    let qubits = default_qubits(&net);
    linear_synth_into(&mut net, &qubits, terms, params)?;
    Ok(net)
}

fn check_width(num_qubits: usize) -> SynthResult<()> {
    if num_qubits > MAX_STAIRCASE_QUBITS {
        return Err(SynthError::TooManyQubits {
            got: num_qubits,
            max: MAX_STAIRCASE_QUBITS,
        });
    }
    Ok(())
}

/// Append the staircase for `terms` to `net`, parity bit `i` on `qubits[i]`.
///
/// # Errors
///
/// See [`linear_synth`]; additionally `DimensionMismatch` or an IR error
/// for a bad qubit map. Nothing is added to `net` on failure.
#[instrument(
    skip(net, qubits, terms, params),
    fields(num_qubits = qubits.len(), terms = terms.len())
)]
pub fn linear_synth_into(
    net: &mut Network,
    qubits: &[Wire],
    terms: &ParityTerms,
    params: impl Into<LinearSynthParams>,
) -> SynthResult<()> {
    let params = params.into();
    let n = qubits.len();
    check_width(n)?;
    check_qubit_map(net, qubits, n)?;
    terms.validate(n as u32)?;
    if terms.is_empty() {
        return Ok(());
    }

    let mut pending = terms.clone();
    let mut emit = |net: &mut Network, parity: u64, qubit: Wire| -> SynthResult<usize> {
        match pending.extract_term(parity) {
            Some(angle) if !angle.is_zero() => {
                net.rotation_z(angle, qubit)?;
                Ok(1)
            }
            _ => Ok(0),
        }
    };

    let mut state: Vec<u64> = (0..n).map(|i| 1u64 << i).collect();
    let mut count = 0usize;
    for (i, &qubit) in qubits.iter().enumerate() {
        count += emit(net, state[i], qubit)?;
    }

    for i in (1..n).rev() {
        for c in staircase(i as u32, params.strategy) {
            let c = c as usize;
            net.cx(qubits[c], qubits[i])?;
            count += 1;
            state[i] ^= state[c];
            count += emit(net, state[i], qubits[i])?;
        }
    }

    info!(
        strategy = ?params.strategy,
        "Staircase synthesis emitted {count} gates"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_ir::{Angle, GateKind};

    fn walk(i: u32, strategy: PhaseStrategy) -> Vec<u64> {
        let mut parity = 1u64 << i;
        let mut seen = vec![parity];
        for c in staircase(i, strategy) {
            parity ^= 1 << c;
            seen.push(parity);
        }
        seen
    }

    #[test]
    fn test_staircase_visits_every_parity_and_returns() {
        for strategy in [PhaseStrategy::Gray, PhaseStrategy::Binary] {
            for i in 1..6 {
                let seen = walk(i, strategy);
                assert_eq!(seen.last(), Some(&(1u64 << i)), "{strategy:?} {i}");
                let mut distinct = seen.clone();
                distinct.sort_unstable();
                distinct.dedup();
                let expected: Vec<u64> = ((1u64 << i)..(1u64 << (i + 1))).collect();
                assert_eq!(distinct, expected, "{strategy:?} {i}");
            }
        }
    }

    #[test]
    fn test_gray_uses_one_cnot_per_parity() {
        assert_eq!(staircase(2, PhaseStrategy::Gray), vec![0, 1, 0, 1]);
        assert_eq!(staircase(3, PhaseStrategy::Gray).len(), 8);
        assert_eq!(staircase(2, PhaseStrategy::Binary), vec![0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_single_term_on_three_qubits() {
        let terms: ParityTerms = [(0b011, Angle::ONE_EIGHTH)].into_iter().collect();
        let gray = linear_synth(3, &terms, PhaseStrategy::Gray).unwrap();
        let binary = linear_synth(3, &terms, PhaseStrategy::Binary).unwrap();

        let kinds =
            |net: &Network| -> Vec<GateKind> { net.gates().map(|(_, g)| *g.kind()).collect() };
        assert_ne!(kinds(&gray), kinds(&binary));
        for net in [&gray, &binary] {
            let rotations = net
                .gates()
                .filter(|(_, g)| matches!(g.kind(), GateKind::RotationZ(_)))
                .count();
            assert_eq!(rotations, 1);
        }
    }

    #[test]
    fn test_empty_terms() {
        let net = linear_synth(4, &ParityTerms::new(), PhaseStrategy::Gray).unwrap();
        assert_eq!(net.num_gates(), 0);
        assert_eq!(net.num_qubits(), 4);
    }

    #[test]
    fn test_width_limit() {
        assert!(matches!(
            linear_synth(25, &ParityTerms::new(), LinearSynthParams::default()),
            Err(SynthError::TooManyQubits { got: 25, .. })
        ));
    }

    #[test]
    fn test_zero_angles_are_elided() {
        let terms: ParityTerms = [(0b01, Angle::ZERO), (0b11, Angle::ZERO)]
            .into_iter()
            .collect();
        let net = linear_synth(2, &terms, PhaseStrategy::Gray).unwrap();
        assert!(net
            .gates()
            .all(|(_, g)| !matches!(g.kind(), GateKind::RotationZ(_))));
    }
}
