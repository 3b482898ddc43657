//! Error types for the synthesis crate.

use thiserror::Error;

/// Errors that can occur during synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] tangle_ir::IrError),

    /// A permutation value is repeated, so some other value is missing.
    #[error("Permutation is not a bijection: value {value} appears more than once")]
    NonBijectivePermutation { value: u32 },

    /// A permutation value lies outside the domain.
    #[error("Permutation value {value} is out of range for length {len}")]
    PermutationValueOutOfRange { value: u32, len: usize },

    /// Permutation length is not a power of two, or too large.
    #[error("Permutation length {0} is not a supported power of two")]
    InvalidPermutationLength(usize),

    /// Matrix is singular over GF(2).
    #[error("Matrix is not invertible over GF(2)")]
    NotInvertible,

    /// Partition size is zero.
    #[error("Partition size must be at least 1, got {0}")]
    InvalidPartitionSize(u32),

    /// Two inputs disagree on the problem size.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Matrix row does not fit the matrix width.
    #[error("Row {row} has bits outside the {size}x{size} matrix")]
    RowOutOfRange { row: usize, size: usize },

    /// Parity mask is zero or uses qubits beyond the synthesis width.
    #[error("Parity mask {mask:#b} is invalid for {num_qubits} qubits")]
    InvalidParity { mask: u64, num_qubits: u32 },

    /// Requested width is beyond what the bit-parallel models support.
    #[error("{got} qubits requested, at most {max} supported")]
    TooManyQubits { got: usize, max: usize },

    /// Gate cannot be simulated on classical bit patterns.
    #[error("Gate '{0}' is not classical")]
    NonClassicalGate(String),

    /// Gate cannot be simulated as a GF(2) linear map.
    #[error("Gate '{0}' is not linear over GF(2)")]
    NonLinearGate(String),

    /// Invalid synthesis configuration.
    #[error("Invalid synthesis configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
