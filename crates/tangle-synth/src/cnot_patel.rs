//! CNOT synthesis of linear reversible maps by partitioned Gaussian elimination.
//!
//! The matrix is reduced to upper triangular form by row operations over
//! column blocks of `partition_size` columns. Inside a block, rows that
//! share the same sub-row pattern are first cancelled against the first
//! row with that pattern, then ordinary elimination clears what remains.
//! The transpose of the upper triangle goes through the same routine, and
//! the two gate lists are stitched together.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use tangle_ir::{Network, Wire};

use crate::bit_matrix::{BitMatrix, low_mask};
use crate::error::{SynthError, SynthResult};
use crate::mapping::{check_qubit_map, default_qubits};

/// Parameters for CNOT-Patel synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CnotPatelParams {
    /// Number of columns per block.
    pub partition_size: u32,
    /// Try every partition size from 1 to `n` and keep the cheapest.
    pub best_partition_size: bool,
    /// Deliver the matrix up to a row permutation stored in the rewire map.
    pub allow_rewiring: bool,
}

impl Default for CnotPatelParams {
    fn default() -> Self {
        Self {
            partition_size: 2,
            best_partition_size: false,
            allow_rewiring: false,
        }
    }
}

/// A CNOT as `(control row, target row)`.
pub type Cnot = (usize, usize);

/// Reduce `rows` to upper triangular form, returning the row operations.
fn lower_cnot_synthesis(rows: &mut [u64], partition: usize) -> SynthResult<Vec<Cnot>> {
    let n = rows.len();
    let mut gates = Vec::new();
    let pattern_mask = low_mask(partition);

    for start in (0..n).step_by(partition) {
        let end = (start + partition).min(n);

        // Cancel repeated sub-row patterns against their first occurrence.
        let mut first_with_pattern: FxHashMap<u64, usize> = FxHashMap::default();
        for row in start..n {
            let pattern = (rows[row] >> start) & pattern_mask;
            if pattern == 0 {
                continue;
            }
            match first_with_pattern.get(&pattern) {
                None => {
                    first_with_pattern.insert(pattern, row);
                }
                Some(&first) => {
                    rows[row] ^= rows[first];
                    gates.push((first, row));
                }
            }
        }

        for col in start..end {
            let mut diag_one = (rows[col] >> col) & 1 == 1;
            for row in col + 1..n {
                if (rows[row] >> col) & 1 == 0 {
                    continue;
                }
                if !diag_one {
                    rows[col] ^= rows[row];
                    gates.push((row, col));
                    diag_one = true;
                }
                rows[row] ^= rows[col];
                gates.push((col, row));
            }
            if !diag_one {
                return Err(SynthError::NotInvertible);
            }
        }
    }

    Ok(gates)
}

/// CNOT sequence whose GF(2) simulation equals `matrix`.
///
/// `partition_size` is clamped to the matrix size.
///
/// # Errors
///
/// Returns `InvalidPartitionSize` for a zero partition size and
/// `NotInvertible` for a singular matrix.
pub fn patel_gates(matrix: &BitMatrix, partition_size: u32) -> SynthResult<Vec<Cnot>> {
    if partition_size == 0 {
        return Err(SynthError::InvalidPartitionSize(partition_size));
    }
    let n = matrix.size();
    if n == 0 {
        return Ok(Vec::new());
    }
    let partition = (partition_size as usize).min(n);

    let mut work = matrix.rows().to_vec();
    let lower = lower_cnot_synthesis(&mut work, partition)?;
    let mut upper_t = BitMatrix::from_rows(work)?.transpose().rows().to_vec();
    let upper = lower_cnot_synthesis(&mut upper_t, partition)?;

    let mut gates: Vec<Cnot> = upper.into_iter().map(|(c, t)| (t, c)).collect();
    gates.extend(lower.into_iter().rev());
    Ok(gates)
}

/// Row order that lets `matrix` be eliminated without fixing any diagonal.
///
/// Entry `p` is the row of `matrix` that should sit at position `p`.
///
/// # Errors
///
/// Returns `NotInvertible` for a singular matrix.
pub fn pivot_order(matrix: &BitMatrix) -> SynthResult<Vec<u32>> {
    let n = matrix.size();
    let mut work = matrix.rows().to_vec();
    let mut order: Vec<u32> = (0..n as u32).collect();
    for col in 0..n {
        let pivot = (col..n)
            .find(|&r| (work[r] >> col) & 1 == 1)
            .ok_or(SynthError::NotInvertible)?;
        work.swap(col, pivot);
        order.swap(col, pivot);
        let pivot_row = work[col];
        for row in work.iter_mut().skip(col + 1) {
            if (*row >> col) & 1 == 1 {
                *row ^= pivot_row;
            }
        }
    }
    Ok(order)
}

/// Gates and row order chosen for a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Plan {
    gates: Vec<Cnot>,
    /// Row order when rewiring is used.
    rows: Option<Vec<u32>>,
}

fn plan(matrix: &BitMatrix, params: CnotPatelParams) -> SynthResult<Plan> {
    if !params.best_partition_size && params.partition_size == 0 {
        return Err(SynthError::InvalidPartitionSize(params.partition_size));
    }
    if !matrix.is_invertible() {
        return Err(SynthError::NotInvertible);
    }

    let (target, rows) = if params.allow_rewiring {
        let order = pivot_order(matrix)?;
        debug!(?order, "rows reordered by pivot");
        (matrix.permute_rows(&order)?, Some(order))
    } else {
        (matrix.clone(), None)
    };

    let gates = if params.best_partition_size {
        let n = target.size() as u32;
        let mut best: Option<(u32, Vec<Cnot>)> = None;
        for p in 1..=n {
            let gates = patel_gates(&target, p)?;
            if best.as_ref().is_none_or(|(_, b)| gates.len() < b.len()) {
                best = Some((p, gates));
            }
        }
        match best {
            Some((p, gates)) => {
                debug!(partition_size = p, cnots = gates.len(), "best partition size");
                gates
            }
            None => Vec::new(),
        }
    } else {
        patel_gates(&target, params.partition_size)?
    };

    Ok(Plan { gates, rows })
}

/// Synthesize a CNOT network realizing `matrix`.
///
/// With rewiring allowed, wire `p` of the result carries row
/// `rewire_map()[p]` of `matrix`.
///
/// # Errors
///
/// Returns `NotInvertible` for a singular matrix and
/// `InvalidPartitionSize` for a zero partition size.
pub fn cnot_patel(matrix: &BitMatrix, params: CnotPatelParams) -> SynthResult<Network> {
    let mut net = Network::with_qubits(matrix.size() as u32);
    let qubits = default_qubits(&net);
    cnot_patel_into(&mut net, &qubits, matrix, params)?;
    Ok(net)
}

/// Append a CNOT network realizing `matrix` to `net`, row `i` on `qubits[i]`.
///
/// With rewiring allowed the row order is folded into the rewire map of
/// `net`.
///
/// # Errors
///
/// See [`cnot_patel`]; additionally `DimensionMismatch` or an IR error for
/// a bad qubit map. Nothing is added to `net` on failure.
#[instrument(
    skip(net, qubits, matrix),
    fields(n = matrix.size(), partition_size = params.partition_size)
)]
pub fn cnot_patel_into(
    net: &mut Network,
    qubits: &[Wire],
    matrix: &BitMatrix,
    params: CnotPatelParams,
) -> SynthResult<()> {
    check_qubit_map(net, qubits, matrix.size())?;
    let Plan { gates, rows } = plan(matrix, params)?;

    let rewire = match &rows {
        Some(rows) => {
            let mut map = net.rewire_map().to_vec();
            let old = map.clone();
            for (p, &r) in rows.iter().enumerate() {
                map[qubits[p].index() as usize] = old[qubits[r as usize].index() as usize];
            }
            Some(map)
        }
        None => None,
    };

    for &(c, t) in &gates {
        net.cx(qubits[c], qubits[t])?;
    }
    if let Some(map) = rewire {
        net.rewire(map)?;
    }

    info!("CNOT-Patel synthesis emitted {} gates", gates.len());
    Ok(())
}
