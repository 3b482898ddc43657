//! Tangle Synthesis Engines
//!
//! This crate turns reversible and linear maps into [`tangle_ir::Network`]s:
//! permutations into multiple-controlled X cascades, invertible GF(2)
//! matrices into CNOT circuits, and phase polynomials into CNOT plus
//! phase-rotation circuits.
//!
//! # Overview
//!
//! | Input | Engine | Gates |
//! |-------|--------|-------|
//! | [`Permutation`] | [`transformation_based_synthesis`] | `mcx` |
//! | [`BitMatrix`] | [`cnot_patel`] | `cx` |
//! | [`ParityTerms`] | [`gray_synth`], [`linear_synth`] | `cx`, `rz` |
//!
//! Every engine also comes as an `_into` variant that appends to an
//! existing network on a caller-chosen list of qubits. Inputs are checked
//! before anything is appended, so a failed call leaves the network as it
//! was.
//!
//! # Example: Synthesizing a permutation
//!
//! ```rust
//! use tangle_synth::{Permutation, TbsParams, transformation_based_synthesis};
//! use tangle_synth::verify::simulate_pattern;
//!
//! let perm = Permutation::new(vec![0, 2, 3, 5, 7, 1, 4, 6]).unwrap();
//! let net = transformation_based_synthesis(&perm, TbsParams::default()).unwrap();
//!
//! for x in 0..8u32 {
//!     assert_eq!(simulate_pattern(&net, u64::from(x)).unwrap(), u64::from(perm[x as usize]));
//! }
//! ```
//!
//! # Example: Phase polynomials
//!
//! ```rust
//! use tangle_ir::Angle;
//! use tangle_synth::{ParityTerms, gray_synth};
//! use tangle_synth::verify::{accumulated_phase, expected_phase, simulate_linear};
//!
//! let terms: ParityTerms = [(0b011, Angle::ONE_EIGHTH), (0b110, Angle::ONE_QUARTER)]
//!     .into_iter()
//!     .collect();
//! let net = gray_synth(3, &terms).unwrap();
//!
//! assert!(simulate_linear(&net).unwrap().is_identity());
//! for x in 0..8 {
//!     assert_eq!(accumulated_phase(&net, x).unwrap(), expected_phase(&terms, x));
//! }
//! ```
//!
//! # Configuration
//!
//! Each engine takes a small parameter struct. [`SynthConfig`] bundles them
//! and reads them from JSON.
//!
//! # Logging
//!
//! Entry points record `tracing` spans and events; no subscriber is
//! installed here.

pub mod bit_matrix;
pub mod cnot_patel;
pub mod config;
pub mod error;
pub mod gray_synth;
pub mod linear_synth;
mod mapping;
pub mod parity;
pub mod permutation;
pub mod tbs;
pub mod verify;

pub use bit_matrix::{BitMatrix, MAX_MATRIX_SIZE};
pub use cnot_patel::{CnotPatelParams, cnot_patel, cnot_patel_into, patel_gates, pivot_order};
pub use config::SynthConfig;
pub use error::{SynthError, SynthResult};
pub use gray_synth::{GraySynthParams, gray_synth, gray_synth_into, gray_synth_with};
pub use linear_synth::{
    LinearSynthParams, MAX_STAIRCASE_QUBITS, PhaseStrategy, linear_synth, linear_synth_into,
};
pub use parity::ParityTerms;
pub use permutation::{MAX_PERMUTATION_BITS, Permutation};
pub use tbs::{
    TbsBehavior, TbsParams, transformation_based_synthesis, transformation_based_synthesis_into,
};
