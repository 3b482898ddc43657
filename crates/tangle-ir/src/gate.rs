//! Gate descriptors.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::angle::Angle;
use crate::error::{IrError, IrResult};
use crate::wire::{Wire, WireKind};

/// Tolerance used when comparing numeric rotation angles.
pub const ANGLE_TOLERANCE: f64 = 1e-10;

/// Operation performed by a gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    /// Identity gate.
    Identity,
    /// Hadamard gate.
    Hadamard,
    /// Pauli-X gate.
    PauliX,
    /// Pauli-Y gate.
    PauliY,
    /// Pauli-Z gate.
    PauliZ,
    /// S gate (sqrt(Z)).
    Phase,
    /// S-dagger gate.
    PhaseDagger,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    TDagger,
    /// Rotation around X axis.
    RotationX(Angle),
    /// Rotation around Y axis.
    RotationY(Angle),
    /// Phase rotation `diag(1, e^{iθ})`.
    RotationZ(Angle),
    /// Controlled-X (CNOT) gate.
    Cx,
    /// Controlled-Z gate.
    Cz,
    /// Multiple-controlled X on every target.
    Mcx,
    /// Multiple-controlled Z.
    Mcz,
    /// SWAP gate.
    Swap,
    /// Measurement of a qubit into a classical bit.
    Measure,
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Identity => "id",
            GateKind::Hadamard => "h",
            GateKind::PauliX => "x",
            GateKind::PauliY => "y",
            GateKind::PauliZ => "z",
            GateKind::Phase => "s",
            GateKind::PhaseDagger => "sdg",
            GateKind::T => "t",
            GateKind::TDagger => "tdg",
            GateKind::RotationX(_) => "rx",
            GateKind::RotationY(_) => "ry",
            GateKind::RotationZ(_) => "rz",
            GateKind::Cx => "cx",
            GateKind::Cz => "cz",
            GateKind::Mcx => "mcx",
            GateKind::Mcz => "mcz",
            GateKind::Swap => "swap",
            GateKind::Measure => "measure",
        }
    }

    /// Rotation angle carried by the kind, if any.
    pub fn angle(&self) -> Option<Angle> {
        match self {
            GateKind::RotationX(a) | GateKind::RotationY(a) | GateKind::RotationZ(a) => Some(*a),
            _ => None,
        }
    }

    /// Check whether the given operand counts are valid for this kind.
    pub fn accepts(&self, num_controls: usize, num_targets: usize) -> bool {
        match self {
            GateKind::Identity
            | GateKind::Hadamard
            | GateKind::PauliX
            | GateKind::PauliY
            | GateKind::PauliZ
            | GateKind::Phase
            | GateKind::PhaseDagger
            | GateKind::T
            | GateKind::TDagger
            | GateKind::RotationX(_)
            | GateKind::RotationY(_)
            | GateKind::RotationZ(_) => num_controls == 0 && num_targets == 1,
            GateKind::Cx | GateKind::Cz => num_controls == 1 && num_targets == 1,
            GateKind::Mcx | GateKind::Mcz => num_targets >= 1,
            GateKind::Swap | GateKind::Measure => num_controls == 0 && num_targets == 2,
        }
    }

    /// Whether the kind is its own inverse.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            GateKind::Identity
                | GateKind::Hadamard
                | GateKind::PauliX
                | GateKind::PauliY
                | GateKind::PauliZ
                | GateKind::Cx
                | GateKind::Cz
                | GateKind::Mcx
                | GateKind::Mcz
                | GateKind::Swap
        )
    }

    /// Whether the gate is diagonal in the computational basis.
    pub fn is_diagonal(&self) -> bool {
        self.diagonal_phase().is_some() || matches!(self, GateKind::Identity)
    }

    /// Phase applied when every control is active and the target is 1.
    ///
    /// `None` for gates that are not phase rotations.
    pub fn diagonal_phase(&self) -> Option<Angle> {
        match self {
            GateKind::PauliZ | GateKind::Cz | GateKind::Mcz => Some(Angle::ONE_HALF),
            GateKind::Phase => Some(Angle::ONE_QUARTER),
            GateKind::PhaseDagger => Some(Angle::THREE_QUARTER),
            GateKind::T => Some(Angle::ONE_EIGHTH),
            GateKind::TDagger => Some(Angle::SEVEN_EIGHTH),
            GateKind::RotationZ(a) => Some(*a),
            _ => None,
        }
    }

    /// The kind that undoes this one, if it has an inverse.
    pub fn adjoint(&self) -> Option<GateKind> {
        match self {
            GateKind::Phase => Some(GateKind::PhaseDagger),
            GateKind::PhaseDagger => Some(GateKind::Phase),
            GateKind::T => Some(GateKind::TDagger),
            GateKind::TDagger => Some(GateKind::T),
            GateKind::RotationX(a) => Some(GateKind::RotationX(-*a)),
            GateKind::RotationY(a) => Some(GateKind::RotationY(-*a)),
            GateKind::RotationZ(a) => Some(GateKind::RotationZ(-*a)),
            GateKind::Measure => None,
            kind => Some(*kind),
        }
    }

    fn is_adjoint_kind(&self, other: &GateKind) -> bool {
        match (self, other) {
            (GateKind::RotationX(a), GateKind::RotationX(b))
            | (GateKind::RotationY(a), GateKind::RotationY(b))
            | (GateKind::RotationZ(a), GateKind::RotationZ(b)) => {
                (*a + *b).approx_eq(&Angle::ZERO, ANGLE_TOLERANCE)
            }
            _ => self.adjoint().is_some_and(|adj| adj == *other),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle() {
            Some(angle) => write!(f, "{}({angle})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// A gate applied to concrete wires.
///
/// Controls carry their own polarity. Operands are stored in the order
/// they were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    controls: Vec<Wire>,
    targets: Vec<Wire>,
}

impl Gate {
    /// Create a validated gate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGateArity` when the operand counts do not fit the
    /// kind, `WireKindMismatch` when a classical bit is used where a qubit
    /// is expected (or the other way round), and `DuplicateWire` when a
    /// wire appears twice.
    pub fn new(kind: GateKind, controls: Vec<Wire>, targets: Vec<Wire>) -> IrResult<Self> {
        let gate = Self::unchecked(kind, controls, targets);
        gate.validate()?;
        Ok(gate)
    }

    fn unchecked(kind: GateKind, controls: Vec<Wire>, targets: Vec<Wire>) -> Self {
        Self {
            kind,
            controls,
            targets,
        }
    }

    /// Check operand counts, wire kinds and uniqueness.
    ///
    /// # Errors
    ///
    /// See [`Gate::new`].
    pub fn validate(&self) -> IrResult<()> {
        let name = self.kind.name();
        if !self.kind.accepts(self.controls.len(), self.targets.len()) {
            return Err(IrError::InvalidGateArity {
                gate_name: name.to_string(),
                controls: self.controls.len(),
                targets: self.targets.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for (position, wire) in self.wires().enumerate() {
            let expected = match self.kind {
                GateKind::Measure if position == 1 => WireKind::Cbit,
                _ => WireKind::Qubit,
            };
            if wire.kind() != expected {
                return Err(IrError::WireKindMismatch {
                    wire,
                    gate_name: name.to_string(),
                });
            }
            if !seen.insert(wire) {
                return Err(IrError::DuplicateWire {
                    wire,
                    gate_name: Some(name.to_string()),
                });
            }
        }
        Ok(())
    }

    /// Identity on `target`.
    pub fn identity(target: Wire) -> Self {
        Self::unchecked(GateKind::Identity, vec![], vec![target])
    }

    /// Hadamard on `target`.
    pub fn hadamard(target: Wire) -> Self {
        Self::unchecked(GateKind::Hadamard, vec![], vec![target])
    }

    /// Pauli-X on `target`.
    pub fn pauli_x(target: Wire) -> Self {
        Self::unchecked(GateKind::PauliX, vec![], vec![target])
    }

    /// Pauli-Y on `target`.
    pub fn pauli_y(target: Wire) -> Self {
        Self::unchecked(GateKind::PauliY, vec![], vec![target])
    }

    /// Pauli-Z on `target`.
    pub fn pauli_z(target: Wire) -> Self {
        Self::unchecked(GateKind::PauliZ, vec![], vec![target])
    }

    /// S on `target`.
    pub fn phase(target: Wire) -> Self {
        Self::unchecked(GateKind::Phase, vec![], vec![target])
    }

    /// S† on `target`.
    pub fn phase_dagger(target: Wire) -> Self {
        Self::unchecked(GateKind::PhaseDagger, vec![], vec![target])
    }

    /// T on `target`.
    pub fn t(target: Wire) -> Self {
        Self::unchecked(GateKind::T, vec![], vec![target])
    }

    /// T† on `target`.
    pub fn t_dagger(target: Wire) -> Self {
        Self::unchecked(GateKind::TDagger, vec![], vec![target])
    }

    /// X rotation on `target`.
    pub fn rotation_x(angle: Angle, target: Wire) -> Self {
        Self::unchecked(GateKind::RotationX(angle), vec![], vec![target])
    }

    /// Y rotation on `target`.
    pub fn rotation_y(angle: Angle, target: Wire) -> Self {
        Self::unchecked(GateKind::RotationY(angle), vec![], vec![target])
    }

    /// Phase rotation on `target`.
    pub fn rotation_z(angle: Angle, target: Wire) -> Self {
        Self::unchecked(GateKind::RotationZ(angle), vec![], vec![target])
    }

    /// CNOT from `control` to `target`.
    pub fn cx(control: Wire, target: Wire) -> Self {
        Self::unchecked(GateKind::Cx, vec![control], vec![target])
    }

    /// Controlled-Z.
    pub fn cz(control: Wire, target: Wire) -> Self {
        Self::unchecked(GateKind::Cz, vec![control], vec![target])
    }

    /// Multiple-controlled X.
    pub fn mcx(controls: Vec<Wire>, targets: Vec<Wire>) -> Self {
        Self::unchecked(GateKind::Mcx, controls, targets)
    }

    /// Multiple-controlled Z.
    pub fn mcz(controls: Vec<Wire>, targets: Vec<Wire>) -> Self {
        Self::unchecked(GateKind::Mcz, controls, targets)
    }

    /// SWAP of `a` and `b`.
    pub fn swap(a: Wire, b: Wire) -> Self {
        Self::unchecked(GateKind::Swap, vec![], vec![a, b])
    }

    /// Measure `qubit` into `cbit`.
    pub fn measure(qubit: Wire, cbit: Wire) -> Self {
        Self::unchecked(GateKind::Measure, vec![], vec![qubit, cbit])
    }

    /// The gate kind.
    #[inline]
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Rotation angle, if any.
    pub fn angle(&self) -> Option<Angle> {
        self.kind.angle()
    }

    /// Control wires, with polarity.
    #[inline]
    pub fn controls(&self) -> &[Wire] {
        &self.controls
    }

    /// Target wires.
    #[inline]
    pub fn targets(&self) -> &[Wire] {
        &self.targets
    }

    /// Number of controls.
    pub fn num_controls(&self) -> usize {
        self.controls.len()
    }

    /// Number of targets.
    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }

    /// All operands, controls first.
    pub fn wires(&self) -> impl Iterator<Item = Wire> + '_ {
        self.controls.iter().chain(self.targets.iter()).copied()
    }

    /// Whether the gate touches `wire`.
    pub fn touches(&self, wire: Wire) -> bool {
        self.wires().any(|w| w == wire)
    }

    /// Call `f` on every control.
    pub fn foreach_control<F: FnMut(Wire)>(&self, f: F) {
        self.controls.iter().copied().for_each(f);
    }

    /// Call `f` on every target.
    pub fn foreach_target<F: FnMut(Wire)>(&self, f: F) {
        self.targets.iter().copied().for_each(f);
    }

    /// The inverse gate on the same operands.
    pub fn adjoint(&self) -> Option<Gate> {
        let kind = self.kind.adjoint()?;
        Some(Self::unchecked(kind, self.controls.clone(), self.targets.clone()))
    }

    /// Whether `self` followed by `other` is the identity.
    ///
    /// Both gates must act on the same wires with the same control
    /// polarities. Operand order does not matter.
    pub fn is_adjoint(&self, other: &Gate) -> bool {
        self.kind.is_adjoint_kind(&other.kind)
            && same_operands(&self.controls, &other.controls)
            && same_operands(&self.targets, &other.targets)
    }
}

fn same_operands(a: &[Wire], b: &[Wire]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x.same_operand(*y)))
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (i, wire) in self.wires().enumerate() {
            if i == 0 {
                write!(f, " {wire}")?;
            } else {
                write!(f, ", {wire}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        let q0 = Wire::qubit(0);
        let q1 = Wire::qubit(1);
        assert!(Gate::new(GateKind::Hadamard, vec![], vec![q0]).is_ok());
        assert!(matches!(
            Gate::new(GateKind::Hadamard, vec![q1], vec![q0]),
            Err(IrError::InvalidGateArity { controls: 1, targets: 1, .. })
        ));
        assert!(Gate::new(GateKind::Cx, vec![q0], vec![q1]).is_ok());
        assert!(Gate::new(GateKind::Cx, vec![], vec![q1]).is_err());
        assert!(Gate::new(GateKind::Mcx, vec![], vec![q1]).is_ok());
        assert!(Gate::new(GateKind::Mcx, vec![q0], vec![]).is_err());
        assert!(Gate::new(GateKind::Swap, vec![], vec![q0, q1]).is_ok());
    }

    #[test]
    fn test_wire_kinds() {
        let q0 = Wire::qubit(0);
        let c0 = Wire::cbit(0);
        assert!(Gate::measure(q0, c0).validate().is_ok());
        assert!(matches!(
            Gate::measure(c0, q0).validate(),
            Err(IrError::WireKindMismatch { .. })
        ));
        assert!(Gate::hadamard(c0).validate().is_err());
    }

    #[test]
    fn test_duplicate_operand() {
        let q0 = Wire::qubit(0);
        assert!(matches!(
            Gate::cx(q0, q0).validate(),
            Err(IrError::DuplicateWire { .. })
        ));
        assert!(Gate::mcx(vec![q0, !q0], vec![Wire::qubit(1)])
            .validate()
            .is_err());
    }

    #[test]
    fn test_adjoint_relation() {
        let q0 = Wire::qubit(0);
        let q1 = Wire::qubit(1);
        assert!(Gate::hadamard(q0).is_adjoint(&Gate::hadamard(q0)));
        assert!(Gate::t(q0).is_adjoint(&Gate::t_dagger(q0)));
        assert!(!Gate::t(q0).is_adjoint(&Gate::t(q0)));
        assert!(Gate::phase(q0).is_adjoint(&Gate::phase_dagger(q0)));
        assert!(!Gate::hadamard(q0).is_adjoint(&Gate::hadamard(q1)));
        assert!(
            Gate::rotation_z(Angle::THREE_EIGHTH, q0)
                .is_adjoint(&Gate::rotation_z(Angle::FIVE_EIGHTH, q0))
        );
        assert!(
            Gate::rotation_z(Angle::radians(0.3), q0)
                .is_adjoint(&Gate::rotation_z(Angle::radians(-0.3), q0))
        );
        assert!(Gate::measure(q0, Wire::cbit(0)).adjoint().is_none());
    }

    #[test]
    fn test_adjoint_respects_polarity() {
        let q0 = Wire::qubit(0);
        let q1 = Wire::qubit(1);
        let q2 = Wire::qubit(2);
        let a = Gate::mcx(vec![q0, !q1], vec![q2]);
        let b = Gate::mcx(vec![!q1, q0], vec![q2]);
        let c = Gate::mcx(vec![q0, q1], vec![q2]);
        assert!(a.is_adjoint(&b));
        assert!(!a.is_adjoint(&c));
    }

    #[test]
    fn test_diagonal_phase() {
        assert_eq!(GateKind::T.diagonal_phase(), Some(Angle::ONE_EIGHTH));
        assert_eq!(GateKind::PauliZ.diagonal_phase(), Some(Angle::ONE_HALF));
        assert!(GateKind::Identity.is_diagonal());
        assert!(!GateKind::Hadamard.is_diagonal());
    }

    #[test]
    fn test_display() {
        let g = Gate::mcx(vec![Wire::qubit(0), !Wire::qubit(1)], vec![Wire::qubit(2)]);
        assert_eq!(g.to_string(), "mcx q0, !q1, q2");
        let r = Gate::rotation_z(Angle::ONE_EIGHTH, Wire::qubit(0));
        assert_eq!(r.to_string(), "rz(π/4) q0");
    }
}
