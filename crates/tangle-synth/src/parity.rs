//! Phase polynomials as sets of parity terms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tangle_ir::Angle;

use crate::bit_matrix::low_mask;
use crate::error::{SynthError, SynthResult};

/// A diagonal phase polynomial: parity masks tagged with angles.
///
/// Basis state `x` picks up `Σ angle` over the terms whose mask has odd
/// overlap with `x`. Adding a term for a mask already present accumulates
/// its angle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParityTerms {
    terms: BTreeMap<u64, Angle>,
}

impl ParityTerms {
    /// Create an empty set of terms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `angle` to the term of `mask`.
    pub fn add_term(&mut self, mask: u64, angle: Angle) {
        match self.terms.entry(mask) {
            Entry::Occupied(mut entry) => *entry.get_mut() += angle,
            Entry::Vacant(entry) => {
                entry.insert(angle);
            }
        }
    }

    /// The angle of `mask`, if present.
    pub fn get(&self, mask: u64) -> Option<Angle> {
        self.terms.get(&mask).copied()
    }

    /// Remove the term of `mask` and return its angle.
    pub fn extract_term(&mut self, mask: u64) -> Option<Angle> {
        self.terms.remove(&mask)
    }

    /// Number of distinct masks.
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate over `(mask, angle)` in ascending mask order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, Angle)> + '_ {
        self.terms.iter().map(|(&mask, &angle)| (mask, angle))
    }

    /// Iterate over the masks in ascending order.
    pub fn masks(&self) -> impl Iterator<Item = u64> + '_ {
        self.terms.keys().copied()
    }

    /// Check every mask is nonzero and uses only the low `num_qubits` bits.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParity` for the first offending mask.
    pub fn validate(&self, num_qubits: u32) -> SynthResult<()> {
        let allowed = low_mask(num_qubits as usize);
        match self.masks().find(|&m| m == 0 || m & !allowed != 0) {
            Some(mask) => Err(SynthError::InvalidParity { mask, num_qubits }),
            None => Ok(()),
        }
    }
}

impl FromIterator<(u64, Angle)> for ParityTerms {
    fn from_iter<I: IntoIterator<Item = (u64, Angle)>>(iter: I) -> Self {
        let mut terms = Self::new();
        terms.extend(iter);
        terms
    }
}

impl Extend<(u64, Angle)> for ParityTerms {
    fn extend<I: IntoIterator<Item = (u64, Angle)>>(&mut self, iter: I) {
        for (mask, angle) in iter {
            self.add_term(mask, angle);
        }
    }
}
