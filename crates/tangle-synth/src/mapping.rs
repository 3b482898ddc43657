//! Qubit maps used by the appending synthesis variants.

use rustc_hash::FxHashSet;
use tangle_ir::{IrError, Network, Wire};

use crate::error::{SynthError, SynthResult};

/// Check that `qubits` holds `expected` distinct qubits of `net`.
pub(crate) fn check_qubit_map(net: &Network, qubits: &[Wire], expected: usize) -> SynthResult<()> {
    if qubits.len() != expected {
        return Err(SynthError::DimensionMismatch {
            expected,
            got: qubits.len(),
        });
    }

    let mut seen = FxHashSet::default();
    for &qubit in qubits {
        let info = net.wire_info(qubit)?;
        if !info.wire.is_qubit() {
            return Err(IrError::WireNotFound {
                wire: qubit,
                gate_name: None,
            }
            .into());
        }
        if !seen.insert(qubit) {
            return Err(IrError::DuplicateWire {
                wire: qubit,
                gate_name: None,
            }
            .into());
        }
    }
    Ok(())
}

/// Wires selected by the set bits of `bits`, lowest bit first.
pub(crate) fn to_wires(bits: u64, qubits: &[Wire]) -> Vec<Wire> {
    qubits
        .iter()
        .enumerate()
        .filter(|&(i, _)| (bits >> i) & 1 == 1)
        .map(|(_, &w)| w.positive())
        .collect()
}

/// Positive-polarity view of a qubit map.
pub(crate) fn default_qubits(net: &Network) -> Vec<Wire> {
    net.qubits().collect()
}
