//! Tangle Gate Network Intermediate Representation
//!
//! This crate provides the data model every Tangle synthesis routine is
//! written against: wires, rotation angles, gates, and the network that
//! strings gates along wires.
//!
//! # Overview
//!
//! A [`Network`] is a directed acyclic graph. Every wire owns an ordered list
//! of the nodes that touch it, bounded by an input and an output sentinel.
//! Gates are appended at the end of their wires; removal works by marking
//! nodes and compacting into a fresh network.
//!
//! # Core Components
//!
//! - **Wires**: [`Wire`] addresses a qubit or classical bit, with a
//!   [`Polarity`] annotation used for negative controls
//! - **Angles**: [`Angle`] keeps eighth turns symbolic and everything else numeric
//! - **Gates**: [`Gate`] pairs a [`GateKind`] with ordered controls and targets
//! - **Network**: [`Network`] for construction, traversal, marking and compaction
//!
//! # Example: Building a small network
//!
//! ```rust
//! use tangle_ir::{Angle, Gate, Network, Wire};
//!
//! let mut net = Network::with_qubits(2);
//! let q0 = Wire::qubit(0);
//! let q1 = Wire::qubit(1);
//!
//! net.emplace_gate(Gate::hadamard(q0)).unwrap();
//! net.cx(q0, q1).unwrap();
//! net.rotation_z(Angle::ONE_EIGHTH, q1).unwrap();
//!
//! assert_eq!(net.num_gates(), 3);
//! assert_eq!(net.size(), 2 * 2 + 3);
//! assert_eq!(net.depth(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Kind | Controls | Targets | Description |
//! |------|----------|---------|-------------|
//! | `Identity` | 0 | 1 | Identity |
//! | `Hadamard` | 0 | 1 | Hadamard gate |
//! | `PauliX`, `PauliY`, `PauliZ` | 0 | 1 | Pauli gates |
//! | `Phase`, `PhaseDagger` | 0 | 1 | S and S-dagger gates |
//! | `T`, `TDagger` | 0 | 1 | T and T-dagger gates |
//! | `RotationX`, `RotationY`, `RotationZ` | 0 | 1 | Rotation gates |
//! | `Cx`, `Cz` | 1 | 1 | Controlled-X and controlled-Z |
//! | `Mcx`, `Mcz` | any | ≥ 1 | Multiple-controlled X and Z |
//! | `Swap` | 0 | 2 | SWAP gate |
//! | `Measure` | 0 | 2 | Qubit into classical bit |

pub mod angle;
pub mod error;
pub mod gate;
pub mod network;
pub mod wire;

pub use angle::{Angle, SymbolicAngle};
pub use error::{IrError, IrResult};
pub use gate::{ANGLE_TOLERANCE, Gate, GateKind};
pub use network::{Network, Node, NodeId, NodeOp, WireEdge};
pub use wire::{Polarity, Wire, WireInfo, WireKind};
