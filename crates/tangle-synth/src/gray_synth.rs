//! Phase-polynomial synthesis with Gray-code ordered CNOT networks.
//!
//! The parity terms are split recursively on the qubit that best separates
//! them. Whenever a branch has a fixed target qubit, CNOTs fold every other
//! qubit that all remaining parities of the branch share into that target,
//! so the parities reachable on the target grow one subset at a time. A
//! rotation is placed the first time a qubit carries the parity of a term.
//! Whatever linear map the CNOTs leave behind is then corrected with
//! CNOT-Patel so the network realizes the requested linear transform.
//!
//! Reference: Amy, Azimzadeh and Mosca, "On the CNOT-complexity of
//! CNOT-phase circuits", 2018.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use tangle_ir::{Angle, Network, Wire};

use crate::bit_matrix::{BitMatrix, MAX_MATRIX_SIZE};
use crate::cnot_patel::{Cnot, CnotPatelParams, cnot_patel_into};
use crate::error::{SynthError, SynthResult};
use crate::mapping::{check_qubit_map, default_qubits};
use crate::parity::ParityTerms;

/// Parameters for Gray-synth.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraySynthParams {
    /// Linear transform the qubits must carry at the end; identity if unset.
    pub linear_transform: Option<BitMatrix>,
    /// Parameters for the synthesis of the residual linear map.
    pub cnot_patel: CnotPatelParams,
}

impl GraySynthParams {
    /// Parameters requesting `matrix` as the final linear transform.
    pub fn with_linear_transform(matrix: BitMatrix) -> Self {
        Self {
            linear_transform: Some(matrix),
            ..Self::default()
        }
    }
}

/// A pending branch of the parity search.
#[derive(Debug)]
struct Branch {
    parities: Vec<u64>,
    rows: Vec<u32>,
    target: Option<u32>,
}

/// Fold the CNOT `(control, target)` into every parity: a parity that uses
/// qubit `target` now also flips its use of qubit `control`.
fn fold(parities: &mut [u64], control: u32, target: u32) {
    for p in parities.iter_mut() {
        *p ^= ((*p >> target) & 1) << control;
    }
}

/// Row in `rows` that splits `parities` most unevenly. Ties keep the first.
fn branch_row(parities: &[u64], rows: &[u32]) -> Option<usize> {
    let mut best = None;
    let mut best_count = 0;
    for (idx, &row) in rows.iter().enumerate() {
        let ones = parities.iter().filter(|&&p| (p >> row) & 1 == 1).count();
        let count = ones.max(parities.len() - ones);
        if count > best_count {
            best = Some(idx);
            best_count = count;
        }
    }
    best
}

/// CNOTs, as `(control, target)` qubit indices, after which every parity
/// in `parities` has appeared on some qubit.
fn parity_network(num_qubits: u32, parities: Vec<u64>) -> Vec<Cnot> {
    let mut gates = Vec::new();
    let mut stack = vec![Branch {
        parities,
        rows: (0..num_qubits).collect(),
        target: None,
    }];

    while let Some(Branch {
        mut parities,
        mut rows,
        target,
    }) = stack.pop()
    {
        if parities.is_empty() {
            continue;
        }

        if let Some(t) = target {
            for j in (0..num_qubits).filter(|&j| j != t) {
                if !parities.iter().all(|&p| (p >> j) & 1 == 1) {
                    continue;
                }
                gates.push((j as usize, t as usize));
                for branch in &mut stack {
                    fold(&mut branch.parities, j, t);
                }
                fold(&mut parities, j, t);
            }
        }

        let Some(idx) = branch_row(&parities, &rows) else {
            continue;
        };
        let row = rows.remove(idx);
        let (with_row, without_row): (Vec<u64>, Vec<u64>) =
            parities.into_iter().partition(|&p| (p >> row) & 1 == 1);

        stack.push(Branch {
            parities: with_row,
            rows: rows.clone(),
            target: target.or(Some(row)),
        });
        stack.push(Branch {
            parities: without_row,
            rows,
            target,
        });
    }

    gates
}

/// Synthesize the phase polynomial `terms` on `num_qubits` qubits with an
/// identity linear part.
///
/// # Errors
///
/// Returns `InvalidParity` for masks that are zero or wider than
/// `num_qubits`, and `TooManyQubits` beyond 64 qubits.
pub fn gray_synth(num_qubits: u32, terms: &ParityTerms) -> SynthResult<Network> {
    gray_synth_with(num_qubits, terms, &GraySynthParams::default())
}

/// Synthesize `terms` on `num_qubits` qubits with explicit parameters.
///
/// # Errors
///
/// See [`gray_synth_into`].
pub fn gray_synth_with(
    num_qubits: u32,
    terms: &ParityTerms,
    params: &GraySynthParams,
) -> SynthResult<Network> {
    check_width(num_qubits as usize)?;
    let mut net = Network::with_qubits(num_qubits);
    let qubits = default_qubits(&net);
    gray_synth_into(&mut net, &qubits, terms, params)?;
    Ok(net)
}

fn check_width(num_qubits: usize) -> SynthResult<()> {
    if num_qubits > MAX_MATRIX_SIZE {
        return Err(SynthError::TooManyQubits {
            got: num_qubits,
            max: MAX_MATRIX_SIZE,
        });
    }
    Ok(())
}

/// Append a network realizing `terms` to `net`, parity bit `i` on
/// `qubits[i]`.
///
/// # Errors
///
/// Returns `InvalidParity` for bad masks, `DimensionMismatch` when the
/// linear transform does not match the qubit count, `NotInvertible` for a
/// singular transform and `InvalidPartitionSize` for a zero partition size.
/// Nothing is added to `net` on failure.
#[instrument(
    skip(net, qubits, terms, params),
    fields(num_qubits = qubits.len(), terms = terms.len())
)]
pub fn gray_synth_into(
    net: &mut Network,
    qubits: &[Wire],
    terms: &ParityTerms,
    params: &GraySynthParams,
) -> SynthResult<()> {
    let n = qubits.len();
    check_width(n)?;
    check_qubit_map(net, qubits, n)?;
    terms.validate(n as u32)?;

    let target = match &params.linear_transform {
        Some(matrix) if matrix.size() != n => {
            return Err(SynthError::DimensionMismatch {
                expected: n,
                got: matrix.size(),
            });
        }
        Some(matrix) => matrix.clone(),
        None => BitMatrix::identity(n)?,
    };
    if !target.is_invertible() {
        return Err(SynthError::NotInvertible);
    }
    let patel = params.cnot_patel;
    if !patel.best_partition_size && patel.partition_size == 0 {
        return Err(SynthError::InvalidPartitionSize(patel.partition_size));
    }

    let mut pending: FxHashMap<u64, Angle> =
        terms.iter().filter(|(_, angle)| !angle.is_zero()).collect();
    let parities = terms
        .iter()
        .filter(|(_, angle)| !angle.is_zero())
        .map(|(mask, _)| mask)
        .collect();
    let cnots = parity_network(n as u32, parities);
    debug!(cnots = cnots.len(), "parity network planned");

    let mut state: Vec<u64> = (0..n).map(|i| 1u64 << i).collect();
    let mut count = 0usize;

    for (i, &qubit) in qubits.iter().enumerate() {
        if let Some(angle) = pending.remove(&(1u64 << i)) {
            net.rotation_z(angle, qubit)?;
            count += 1;
        }
    }
    for &(c, t) in &cnots {
        net.cx(qubits[c], qubits[t])?;
        count += 1;
        state[t] ^= state[c];
        if let Some(angle) = pending.remove(&state[t]) {
            net.rotation_z(angle, qubits[t])?;
            count += 1;
        }
    }
    debug_assert!(pending.is_empty(), "every parity is reached");

    let reached = BitMatrix::from_rows(state)?;
    let residual = target.mul(&reached.inverse()?)?;
    if !residual.is_identity() {
        debug!(%residual, "synthesizing residual linear map");
        let before = net.num_gates();
        cnot_patel_into(net, qubits, &residual, patel)?;
        count += net.num_gates() - before;
    }

    info!("Gray synthesis emitted {count} gates");
    Ok(())
}
