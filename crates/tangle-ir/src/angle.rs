//! Rotation angles with an exact symbolic form for eighth turns.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// The eight canonical eighth turns, `k · 2π/8` for `k = 0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicAngle {
    /// 0, identity.
    Zero,
    /// π/4, the T gate.
    OneEighth,
    /// π/2, the S gate.
    OneQuarter,
    /// 3π/4.
    ThreeEighth,
    /// π, the Z gate.
    OneHalf,
    /// 5π/4.
    FiveEighth,
    /// 3π/2, the S† gate.
    ThreeQuarter,
    /// 7π/4, the T† gate.
    SevenEighth,
}

impl SymbolicAngle {
    const ALL: [SymbolicAngle; 8] = [
        SymbolicAngle::Zero,
        SymbolicAngle::OneEighth,
        SymbolicAngle::OneQuarter,
        SymbolicAngle::ThreeEighth,
        SymbolicAngle::OneHalf,
        SymbolicAngle::FiveEighth,
        SymbolicAngle::ThreeQuarter,
        SymbolicAngle::SevenEighth,
    ];

    /// Number of eighth turns, in `0..8`.
    #[inline]
    pub fn eighths(self) -> u8 {
        self as u8
    }

    /// The eighth turn `k mod 8`.
    #[inline]
    pub fn from_eighths(k: u8) -> Self {
        Self::ALL[usize::from(k % 8)]
    }
}

/// A rotation angle, either an exact eighth turn or an arbitrary value in radians.
///
/// Symbolic angles add modulo 8 and compare exactly. As soon as a numeric
/// angle takes part in an addition the result is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Angle {
    /// An exact eighth turn.
    Symbolic(SymbolicAngle),
    /// An arbitrary angle in radians.
    Numeric(f64),
}

impl Angle {
    /// 0.
    pub const ZERO: Angle = Angle::Symbolic(SymbolicAngle::Zero);
    /// π/4.
    pub const ONE_EIGHTH: Angle = Angle::Symbolic(SymbolicAngle::OneEighth);
    /// π/2.
    pub const ONE_QUARTER: Angle = Angle::Symbolic(SymbolicAngle::OneQuarter);
    /// 3π/4.
    pub const THREE_EIGHTH: Angle = Angle::Symbolic(SymbolicAngle::ThreeEighth);
    /// π.
    pub const ONE_HALF: Angle = Angle::Symbolic(SymbolicAngle::OneHalf);
    /// 5π/4.
    pub const FIVE_EIGHTH: Angle = Angle::Symbolic(SymbolicAngle::FiveEighth);
    /// 3π/2.
    pub const THREE_QUARTER: Angle = Angle::Symbolic(SymbolicAngle::ThreeQuarter);
    /// 7π/4.
    pub const SEVEN_EIGHTH: Angle = Angle::Symbolic(SymbolicAngle::SevenEighth);

    /// Create a numeric angle in radians.
    pub fn radians(value: f64) -> Self {
        Angle::Numeric(value)
    }

    /// Check if this angle is symbolically defined.
    #[inline]
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Angle::Symbolic(_))
    }

    /// The symbolic value, if any.
    #[inline]
    pub fn symbolic_value(&self) -> Option<SymbolicAngle> {
        match self {
            Angle::Symbolic(s) => Some(*s),
            Angle::Numeric(_) => None,
        }
    }

    /// The angle in radians.
    pub fn numeric_value(&self) -> f64 {
        match self {
            Angle::Symbolic(s) => f64::from(s.eighths()) * FRAC_PI_4,
            Angle::Numeric(v) => *v,
        }
    }

    /// Check whether the angle is exactly zero.
    ///
    /// Numeric angles only count as zero when they are exactly `0.0`.
    pub fn is_zero(&self) -> bool {
        match self {
            Angle::Symbolic(s) => *s == SymbolicAngle::Zero,
            Angle::Numeric(v) => *v == 0.0,
        }
    }

    /// The unit phase `e^{iθ}`.
    pub fn phase_factor(&self) -> Complex64 {
        Complex64::from_polar(1.0, self.numeric_value())
    }

    /// Compare two angles modulo 2π.
    ///
    /// Symbolic pairs compare exactly, anything else within `tolerance`
    /// on the unit circle.
    pub fn approx_eq(&self, other: &Angle, tolerance: f64) -> bool {
        match (self, other) {
            (Angle::Symbolic(a), Angle::Symbolic(b)) => a == b,
            _ => (self.phase_factor() - other.phase_factor()).norm() <= tolerance,
        }
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle::ZERO
    }
}

impl From<SymbolicAngle> for Angle {
    fn from(value: SymbolicAngle) -> Self {
        Angle::Symbolic(value)
    }
}

impl From<f64> for Angle {
    fn from(value: f64) -> Self {
        Angle::Numeric(value)
    }
}

impl Add for Angle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Angle::Symbolic(a), Angle::Symbolic(b)) => {
                Angle::Symbolic(SymbolicAngle::from_eighths(a.eighths() + b.eighths()))
            }
            _ => Angle::Numeric(self.numeric_value() + rhs.numeric_value()),
        }
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Angle::Symbolic(s) => Angle::Symbolic(SymbolicAngle::from_eighths(8 - s.eighths())),
            Angle::Numeric(v) => Angle::Numeric(-v),
        }
    }
}

impl Sub for Angle {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Sum for Angle {
    fn sum<I: Iterator<Item = Angle>>(iter: I) -> Self {
        iter.fold(Angle::ZERO, Add::add)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Symbolic(SymbolicAngle::Zero) => write!(f, "0"),
            Angle::Symbolic(SymbolicAngle::OneEighth) => write!(f, "π/4"),
            Angle::Symbolic(SymbolicAngle::OneQuarter) => write!(f, "π/2"),
            Angle::Symbolic(SymbolicAngle::ThreeEighth) => write!(f, "3π/4"),
            Angle::Symbolic(SymbolicAngle::OneHalf) => write!(f, "π"),
            Angle::Symbolic(SymbolicAngle::FiveEighth) => write!(f, "5π/4"),
            Angle::Symbolic(SymbolicAngle::ThreeQuarter) => write!(f, "3π/2"),
            Angle::Symbolic(SymbolicAngle::SevenEighth) => write!(f, "7π/4"),
            Angle::Numeric(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_symbolic_addition_wraps() {
        assert_eq!(Angle::ONE_EIGHTH + Angle::ONE_EIGHTH, Angle::ONE_QUARTER);
        assert_eq!(Angle::SEVEN_EIGHTH + Angle::ONE_EIGHTH, Angle::ZERO);
        assert_eq!(Angle::ONE_HALF + Angle::THREE_QUARTER, Angle::ONE_QUARTER);
        assert!((Angle::ONE_EIGHTH + Angle::SEVEN_EIGHTH).is_zero());
    }

    #[test]
    fn test_numeric_downgrade() {
        let sum = Angle::ONE_QUARTER + Angle::radians(0.5);
        assert!(!sum.is_symbolic());
        assert!((sum.numeric_value() - (PI / 2.0 + 0.5)).abs() < 1e-12);

        let sum = Angle::radians(0.5) + Angle::ONE_QUARTER;
        assert!((sum.numeric_value() - (PI / 2.0 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_negation() {
        assert_eq!(-Angle::ONE_EIGHTH, Angle::SEVEN_EIGHTH);
        assert_eq!(-Angle::ZERO, Angle::ZERO);
        assert_eq!(-Angle::ONE_HALF, Angle::ONE_HALF);
        assert_eq!(Angle::ONE_QUARTER - Angle::ONE_EIGHTH, Angle::ONE_EIGHTH);
        assert_eq!(-Angle::radians(0.25), Angle::radians(-0.25));
    }

    #[test]
    fn test_numeric_value() {
        assert!((Angle::ONE_EIGHTH.numeric_value() - PI / 4.0).abs() < 1e-12);
        assert!((Angle::SEVEN_EIGHTH.numeric_value() - 7.0 * PI / 4.0).abs() < 1e-12);
        assert_eq!(Angle::ZERO.numeric_value(), 0.0);
    }

    #[test]
    fn test_approx_eq_modulo_two_pi() {
        let a = Angle::radians(PI / 4.0 + 2.0 * PI);
        assert!(a.approx_eq(&Angle::ONE_EIGHTH, 1e-9));
        assert!(!Angle::ONE_EIGHTH.approx_eq(&Angle::ONE_QUARTER, 1e-9));
    }

    #[test]
    fn test_sum() {
        let total: Angle = [Angle::ONE_EIGHTH; 9].into_iter().sum();
        assert_eq!(total, Angle::ONE_EIGHTH);
    }

    #[test]
    fn test_display() {
        assert_eq!(Angle::ONE_EIGHTH.to_string(), "π/4");
        assert_eq!(Angle::ZERO.to_string(), "0");
        assert_eq!(Angle::radians(0.5).to_string(), "0.5");
    }
}
