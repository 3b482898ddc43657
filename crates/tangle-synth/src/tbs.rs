//! Transformation-based synthesis of permutations.
//!
//! The working permutation is driven to the identity by adding
//! multiple-controlled X gates on its output side, its input side, or
//! both. Output-side gates are collected and emitted in reverse, input
//! side gates in the order they were found.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use tangle_ir::{Network, Wire};

use crate::error::SynthResult;
use crate::mapping::{check_qubit_map, default_qubits, to_wires};
use crate::permutation::Permutation;

/// Which side of the permutation gates may be added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TbsBehavior {
    /// Only the output side.
    #[default]
    Unidirectional,
    /// The output or the input side, whichever is cheaper for the current row.
    Bidirectional,
    /// Both sides, after choosing the cheapest row to move into place.
    Multidirectional,
}

/// Parameters for transformation-based synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TbsParams {
    /// Variant of the algorithm.
    pub behavior: TbsBehavior,
}

impl TbsParams {
    /// Parameters for the given behaviour.
    pub fn new(behavior: TbsBehavior) -> Self {
        Self { behavior }
    }
}

impl From<TbsBehavior> for TbsParams {
    fn from(behavior: TbsBehavior) -> Self {
        Self::new(behavior)
    }
}

/// A single-target Toffoli: `(control mask, target bit)`.
type Mct = (u32, u32);

/// Gates found so far, split by the side of the permutation they act on.
#[derive(Debug, Default)]
struct GateLists {
    input: Vec<Mct>,
    output: Vec<Mct>,
}

impl GateLists {
    fn into_circuit_order(self) -> impl Iterator<Item = Mct> {
        self.input.into_iter().chain(self.output.into_iter().rev())
    }
}

/// Apply `x ↦ x ^ target` wherever `x ⊇ controls` to every image.
fn update_output(perm: &mut [u32], controls: u32, target: u32) {
    for z in perm.iter_mut() {
        if *z & controls == controls {
            *z ^= target;
        }
    }
}

/// Precompose the permutation with the same gate.
fn update_input(perm: &mut [u32], controls: u32, target: u32) {
    for i in 0..perm.len() as u32 {
        if i & controls != controls {
            continue;
        }
        let partner = i ^ target;
        if partner > i {
            perm.swap(i as usize, partner as usize);
        }
    }
}

fn bits(mask: u32) -> impl Iterator<Item = u32> {
    (0..32).map(|b| 1u32 << b).filter(move |b| mask & b != 0)
}

/// Add output-side gates that map `y = perm[x]` back to `x`.
fn fix_output(perm: &mut [u32], gates: &mut GateLists, x: u32) {
    let y = perm[x as usize];
    for t in bits(x & !y) {
        update_output(perm, y, t);
        gates.output.push((y, t));
    }
    for t in bits(!x & y) {
        update_output(perm, x, t);
        gates.output.push((x, t));
    }
}

/// Add input-side gates that move the row holding `x` from `z` to `x`.
fn fix_input(perm: &mut [u32], gates: &mut GateLists, x: u32, z: u32) {
    for t in bits(!z & x) {
        update_input(perm, z, t);
        gates.input.push((z, t));
    }
    for t in bits(z & !x) {
        update_input(perm, x, t);
        gates.input.push((x, t));
    }
}

fn unidirectional(perm: &mut [u32]) -> GateLists {
    let mut gates = GateLists::default();
    for x in 0..perm.len() as u32 {
        if perm[x as usize] != x {
            fix_output(perm, &mut gates, x);
        }
    }
    gates
}

fn bidirectional(perm: &mut [u32]) -> GateLists {
    let mut gates = GateLists::default();
    for x in 0..perm.len() as u32 {
        let y = perm[x as usize];
        if y == x {
            continue;
        }
        // Rows below x are fixed, so x is found at or after position x.
        let xs = (x..perm.len() as u32)
            .find(|&i| perm[i as usize] == x)
            .unwrap_or(x);
        if (x ^ y).count_ones() <= (x ^ xs).count_ones() {
            fix_output(perm, &mut gates, x);
        } else {
            debug!(x, from = xs, "fixing row from the input side");
            fix_input(perm, &mut gates, x, xs);
        }
    }
    gates
}

fn multidirectional(perm: &mut [u32]) -> GateLists {
    let mut gates = GateLists::default();
    for x in 0..perm.len() as u32 {
        let mut best = x;
        let mut best_cost = (x ^ perm[x as usize]).count_ones();
        for z in x + 1..perm.len() as u32 {
            let cost = (z ^ x).count_ones() + (x ^ perm[z as usize]).count_ones();
            if cost < best_cost {
                best = z;
                best_cost = cost;
            }
        }
        if best != x {
            debug!(x, from = best, cost = best_cost, "moving row before fixing it");
        }
        fix_input(perm, &mut gates, x, best);
        fix_output(perm, &mut gates, x);
    }
    gates
}

/// Synthesize a network of `num_bits` qubits realizing `perm`.
///
/// Bit `i` of a pattern lives on qubit `i`. An identity permutation
/// yields a network without gates.
///
/// # Errors
///
/// The permutation is validated on construction, so this only fails on
/// internal IR errors.
pub fn transformation_based_synthesis(
    perm: &Permutation,
    params: impl Into<TbsParams>,
) -> SynthResult<Network> {
    let params = params.into();
    let mut net = Network::with_qubits(perm.num_bits());
    let qubits = default_qubits(&net);
    let mut work = perm.clone();
    transformation_based_synthesis_into(&mut net, &qubits, &mut work, params)?;
    Ok(net)
}

/// Append gates realizing `perm` to `net`, bit `i` acting on `qubits[i]`.
///
/// On success `perm` has been reduced to the identity.
///
/// # Errors
///
/// Returns `DimensionMismatch` unless there is one qubit per permutation
/// bit, and an IR error for qubits that are missing from `net` or repeated.
/// Nothing is added to `net` on failure.
#[instrument(
    skip(net, qubits, perm),
    fields(num_bits = perm.num_bits(), behavior = ?params.behavior)
)]
pub fn transformation_based_synthesis_into(
    net: &mut Network,
    qubits: &[Wire],
    perm: &mut Permutation,
    params: TbsParams,
) -> SynthResult<()> {
    check_qubit_map(net, qubits, perm.num_bits() as usize)?;

    let values = perm.values_mut();
    let gates = match params.behavior {
        TbsBehavior::Unidirectional => unidirectional(values),
        TbsBehavior::Bidirectional => bidirectional(values),
        TbsBehavior::Multidirectional => multidirectional(values),
    };
    debug!(
        input_side = gates.input.len(),
        output_side = gates.output.len(),
        "permutation reduced to identity"
    );

    let mut count = 0usize;
    for (controls, target) in gates.into_circuit_order() {
        net.mcx(
            to_wires(u64::from(controls), qubits),
            to_wires(u64::from(target), qubits),
        )?;
        count += 1;
    }

    info!("Transformation-based synthesis emitted {count} gates");
    Ok(())
}
