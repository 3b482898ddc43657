//! Permutations over bit patterns.

use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::error::{SynthError, SynthResult};

/// Largest supported permutation width in bits.
pub const MAX_PERMUTATION_BITS: u32 = 24;

/// A bijection on `0..2^n`.
///
/// Index `i` holds the image of pattern `i`. The values are validated on
/// construction, so every `Permutation` is a bijection of power-of-two
/// length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Permutation {
    values: Vec<u32>,
    num_bits: u32,
}

impl Permutation {
    /// Create a permutation from its truth table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPermutationLength` unless the length is a power of
    /// two of at most `2^24`, `PermutationValueOutOfRange` for a value
    /// outside `0..len` and `NonBijectivePermutation` for a repeated value.
    pub fn new(values: Vec<u32>) -> SynthResult<Self> {
        let len = values.len();
        if !len.is_power_of_two() || len > 1 << MAX_PERMUTATION_BITS {
            return Err(SynthError::InvalidPermutationLength(len));
        }

        let mut seen = vec![false; len];
        for &value in &values {
            match seen.get_mut(value as usize) {
                Some(slot) if *slot => {
                    return Err(SynthError::NonBijectivePermutation { value });
                }
                Some(slot) => *slot = true,
                None => return Err(SynthError::PermutationValueOutOfRange { value, len }),
            }
        }

        Ok(Self {
            values,
            num_bits: len.trailing_zeros(),
        })
    }

    /// The identity on `num_bits` bits.
    ///
    /// # Errors
    ///
    /// Returns `TooManyQubits` above [`MAX_PERMUTATION_BITS`].
    pub fn identity(num_bits: u32) -> SynthResult<Self> {
        if num_bits > MAX_PERMUTATION_BITS {
            return Err(SynthError::TooManyQubits {
                got: num_bits as usize,
                max: MAX_PERMUTATION_BITS as usize,
            });
        }
        Ok(Self {
            values: (0..1u32 << num_bits).collect(),
            num_bits,
        })
    }

    /// Number of bits of the patterns.
    #[inline]
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Number of entries, `2^num_bits`.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; a permutation has at least one entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Image of `index`.
    #[inline]
    pub fn get(&self, index: u32) -> Option<u32> {
        self.values.get(index as usize).copied()
    }

    /// Whether every pattern maps to itself.
    pub fn is_identity(&self) -> bool {
        self.values
            .iter()
            .enumerate()
            .all(|(i, &v)| i == v as usize)
    }

    /// The inverse permutation.
    #[must_use]
    pub fn inverse(&self) -> Permutation {
        let mut values = vec![0u32; self.values.len()];
        for (i, &v) in (0u32..).zip(&self.values) {
            values[v as usize] = i;
        }
        Self {
            values,
            num_bits: self.num_bits,
        }
    }

    /// The truth table.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    /// Consume into the truth table.
    pub fn into_vec(self) -> Vec<u32> {
        self.values
    }

    /// Mutable access for synthesis, which only applies bijective updates.
    pub(crate) fn values_mut(&mut self) -> &mut [u32] {
        &mut self.values
    }
}

impl Index<usize> for Permutation {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.values[index]
    }
}

impl TryFrom<Vec<u32>> for Permutation {
    type Error = SynthError;

    fn try_from(values: Vec<u32>) -> SynthResult<Self> {
        Self::new(values)
    }
}

impl From<Permutation> for Vec<u32> {
    fn from(perm: Permutation) -> Self {
        perm.values
    }
}
