//! Error types for the IR crate.

use crate::wire::Wire;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate was given a number of controls or targets its kind does not accept.
    #[error("Gate '{gate_name}' does not accept {controls} control(s) and {targets} target(s)")]
    InvalidGateArity {
        /// Name of the gate.
        gate_name: String,
        /// Number of controls provided.
        controls: usize,
        /// Number of targets provided.
        targets: usize,
    },

    /// An operand has the wrong wire kind for its position.
    #[error("Wire {wire} has the wrong kind for gate '{gate_name}'")]
    WireKindMismatch {
        /// The offending wire.
        wire: Wire,
        /// Name of the gate.
        gate_name: String,
    },

    /// Wire not found in network.
    #[error("Wire {wire} not found in network{}", format_gate_context(.gate_name))]
    WireNotFound {
        /// The wire that was not found.
        wire: Wire,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Duplicate wire in operation.
    #[error("Duplicate wire {wire} in operation{}", format_gate_context(.gate_name))]
    DuplicateWire {
        /// The duplicate wire.
        wire: Wire,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A wire with this label already exists.
    #[error("Wire label '{0}' is already in use")]
    LabelCollision(String),

    /// Invalid node index.
    #[error("Invalid node index")]
    InvalidNode,

    /// Rewire map is not a permutation of the network's wires.
    #[error("Invalid rewire map: {0}")]
    InvalidRewire(String),

    /// Invalid network structure.
    #[error("Invalid network structure: {0}")]
    InvalidNetwork(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
