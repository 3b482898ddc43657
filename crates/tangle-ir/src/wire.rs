//! Wire identifiers for qubits and classical bits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Not;

/// Whether a wire carries quantum or classical information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireKind {
    /// A quantum bit.
    Qubit,
    /// A classical bit.
    Cbit,
}

/// Control polarity of a wire operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Polarity {
    /// Activates on logical 1.
    #[default]
    Positive,
    /// Activates on logical 0.
    Negative,
}

impl Not for Polarity {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }
}

/// A reference to a qubit or classical bit of a network.
///
/// Identity is the pair `(index, kind)`. The polarity is an annotation that
/// travels with the wire when it is used as a gate operand, so it takes no
/// part in equality or hashing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wire {
    index: u32,
    kind: WireKind,
    polarity: Polarity,
}

impl Wire {
    /// Reference the qubit with the given index.
    pub const fn qubit(index: u32) -> Self {
        Self {
            index,
            kind: WireKind::Qubit,
            polarity: Polarity::Positive,
        }
    }

    /// Reference the classical bit with the given index.
    pub const fn cbit(index: u32) -> Self {
        Self {
            index,
            kind: WireKind::Cbit,
            polarity: Polarity::Positive,
        }
    }

    /// Dense index of the wire within its network.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Kind of the wire.
    #[inline]
    pub const fn kind(self) -> WireKind {
        self.kind
    }

    /// Polarity annotation.
    #[inline]
    pub const fn polarity(self) -> Polarity {
        self.polarity
    }

    /// Whether this is a quantum wire.
    #[inline]
    pub fn is_qubit(self) -> bool {
        self.kind == WireKind::Qubit
    }

    /// Whether the wire carries negative polarity.
    #[inline]
    pub fn is_complemented(self) -> bool {
        self.polarity == Polarity::Negative
    }

    /// The same wire with the given polarity.
    #[must_use]
    pub const fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// The same wire with positive polarity.
    #[must_use]
    pub const fn positive(self) -> Self {
        self.with_polarity(Polarity::Positive)
    }

    /// Whether the wire and its polarity both match.
    pub fn same_operand(self, other: Wire) -> bool {
        self == other && self.polarity == other.polarity
    }
}

impl PartialEq for Wire {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.kind == other.kind
    }
}

impl Eq for Wire {}

impl Hash for Wire {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.kind.hash(state);
    }
}

impl Not for Wire {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.with_polarity(!self.polarity)
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complemented() {
            write!(f, "!")?;
        }
        match self.kind {
            WireKind::Qubit => write!(f, "q{}", self.index),
            WireKind::Cbit => write!(f, "c{}", self.index),
        }
    }
}

/// A wire together with its optional user label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireInfo {
    /// The wire.
    pub wire: Wire,
    /// The label given at creation, if any.
    pub label: Option<String>,
}

impl WireInfo {
    /// Create an unlabelled wire.
    pub fn new(wire: Wire) -> Self {
        Self { wire, label: None }
    }

    /// Create a labelled wire.
    pub fn with_label(wire: Wire, label: impl Into<String>) -> Self {
        Self {
            wire,
            label: Some(label.into()),
        }
    }
}

impl fmt::Display for WireInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label}"),
            None => write!(f, "{}", self.wire.positive()),
        }
    }
}
