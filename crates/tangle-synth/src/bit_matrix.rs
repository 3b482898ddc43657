//! Square matrices over GF(2).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SynthError, SynthResult};

/// Largest supported matrix size.
pub const MAX_MATRIX_SIZE: usize = 64;

/// An `n×n` matrix over GF(2), `n ≤ 64`.
///
/// Row `i` is stored as a `u64` whose bit `j` is entry `(i, j)`. As a
/// linear map on bit patterns, output bit `i` is the parity of
/// `row(i) & input`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct BitMatrix {
    rows: Vec<u64>,
}

/// Mask of the low `n` bits.
#[inline]
pub(crate) fn low_mask(n: usize) -> u64 {
    if n >= 64 { u64::MAX } else { (1u64 << n) - 1 }
}

impl BitMatrix {
    /// The `n×n` identity.
    ///
    /// # Errors
    ///
    /// Returns `TooManyQubits` for `n > 64`.
    pub fn identity(n: usize) -> SynthResult<Self> {
        check_size(n)?;
        Ok(Self {
            rows: (0..n).map(|i| 1u64 << i).collect(),
        })
    }

    /// Build a matrix from its row masks.
    ///
    /// # Errors
    ///
    /// Returns `TooManyQubits` for more than 64 rows and `RowOutOfRange`
    /// when a row has bits at or above the matrix size.
    pub fn from_rows(rows: Vec<u64>) -> SynthResult<Self> {
        let n = rows.len();
        check_size(n)?;
        let mask = low_mask(n);
        if let Some(row) = rows.iter().position(|r| r & !mask != 0) {
            return Err(SynthError::RowOutOfRange { row, size: n });
        }
        Ok(Self { rows })
    }

    /// Number of rows and columns.
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Row `i` as a bit mask.
    #[inline]
    pub fn row(&self, i: usize) -> u64 {
        self.rows[i]
    }

    /// All rows.
    #[inline]
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// Entry `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        (self.rows[i] >> j) & 1 == 1
    }

    /// Set entry `(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns `RowOutOfRange` unless both `i` and `j` are below the
    /// matrix size.
    pub fn set(&mut self, i: usize, j: usize, value: bool) -> SynthResult<()> {
        let size = self.size();
        if i >= size || j >= size {
            return Err(SynthError::RowOutOfRange { row: i, size });
        }
        if value {
            self.rows[i] |= 1 << j;
        } else {
            self.rows[i] &= !(1 << j);
        }
        Ok(())
    }

    /// Row `dst` ^= row `src`.
    #[inline]
    pub fn xor_row(&mut self, dst: usize, src: usize) {
        self.rows[dst] ^= self.rows[src];
    }

    /// Exchange two rows.
    #[inline]
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.rows.swap(a, b);
    }

    /// Matrix whose row `p` is row `order[p]` of `self`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `order` has the wrong length and
    /// `InvalidConfiguration` if it is not a permutation.
    pub fn permute_rows(&self, order: &[u32]) -> SynthResult<BitMatrix> {
        check_order(order, self.size())?;
        Ok(Self {
            rows: order.iter().map(|&r| self.rows[r as usize]).collect(),
        })
    }

    /// The transpose.
    #[must_use]
    pub fn transpose(&self) -> BitMatrix {
        let n = self.size();
        let mut rows = vec![0u64; n];
        for (i, &row) in self.rows.iter().enumerate() {
            for (j, out) in rows.iter_mut().enumerate() {
                *out |= ((row >> j) & 1) << i;
            }
        }
        Self { rows }
    }

    /// The product `self · other`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` for matrices of different size.
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, other: &BitMatrix) -> SynthResult<BitMatrix> {
        if self.size() != other.size() {
            return Err(SynthError::DimensionMismatch {
                expected: self.size(),
                got: other.size(),
            });
        }
        let rows = self
            .rows
            .iter()
            .map(|&row| {
                other
                    .rows
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| (row >> j) & 1 == 1)
                    .fold(0u64, |acc, (_, &r)| acc ^ r)
            })
            .collect();
        Ok(Self { rows })
    }

    /// Apply the matrix to a bit pattern.
    pub fn apply(&self, pattern: u64) -> u64 {
        self.rows
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &row)| {
                acc | (u64::from((row & pattern).count_ones() & 1) << i)
            })
    }

    /// The inverse over GF(2).
    ///
    /// # Errors
    ///
    /// Returns `NotInvertible` for a singular matrix.
    pub fn inverse(&self) -> SynthResult<BitMatrix> {
        let n = self.size();
        let mut work = self.rows.clone();
        let mut inv: Vec<u64> = (0..n).map(|i| 1u64 << i).collect();

        for col in 0..n {
            let pivot = (col..n)
                .find(|&r| (work[r] >> col) & 1 == 1)
                .ok_or(SynthError::NotInvertible)?;
            work.swap(col, pivot);
            inv.swap(col, pivot);
            for r in 0..n {
                if r != col && (work[r] >> col) & 1 == 1 {
                    work[r] ^= work[col];
                    inv[r] ^= inv[col];
                }
            }
        }

        Ok(Self { rows: inv })
    }

    /// Whether the matrix has full rank.
    pub fn is_invertible(&self) -> bool {
        self.rank() == self.size()
    }

    /// Rank over GF(2).
    pub fn rank(&self) -> usize {
        let mut work = self.rows.clone();
        let mut rank = 0;
        for col in 0..self.size() {
            let Some(pivot) = (rank..work.len()).find(|&r| (work[r] >> col) & 1 == 1) else {
                continue;
            };
            work.swap(rank, pivot);
            let pivot_row = work[rank];
            for row in work.iter_mut().skip(rank + 1) {
                if (*row >> col) & 1 == 1 {
                    *row ^= pivot_row;
                }
            }
            rank += 1;
        }
        rank
    }

    /// Whether this is the identity.
    pub fn is_identity(&self) -> bool {
        self.rows
            .iter()
            .enumerate()
            .all(|(i, &row)| row == 1u64 << i)
    }
}

fn check_size(n: usize) -> SynthResult<()> {
    if n > MAX_MATRIX_SIZE {
        return Err(SynthError::TooManyQubits {
            got: n,
            max: MAX_MATRIX_SIZE,
        });
    }
    Ok(())
}

/// Check that `order` is a permutation of `0..n`.
pub(crate) fn check_order(order: &[u32], n: usize) -> SynthResult<()> {
    if order.len() != n {
        return Err(SynthError::DimensionMismatch {
            expected: n,
            got: order.len(),
        });
    }
    let mut seen = vec![false; n];
    for &r in order {
        match seen.get_mut(r as usize) {
            Some(slot) if !*slot => *slot = true,
            _ => {
                return Err(SynthError::InvalidConfiguration(format!(
                    "row order {order:?} is not a permutation"
                )));
            }
        }
    }
    Ok(())
}

impl TryFrom<Vec<u64>> for BitMatrix {
    type Error = SynthError;

    fn try_from(rows: Vec<u64>) -> SynthResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<BitMatrix> for Vec<u64> {
    fn from(matrix: BitMatrix) -> Self {
        matrix.rows
    }
}

impl fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size();
        for (i, &row) in self.rows.iter().enumerate() {
            for j in 0..n {
                write!(f, "{}", (row >> j) & 1)?;
            }
            if i + 1 < n {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> BitMatrix {
        BitMatrix::from_rows(vec![
            0b110000, 0b100110, 0b010010, 0b111111, 0b110111, 0b001110,
        ])
        .unwrap()
    }

    #[test]
    fn test_identity() {
        let id = BitMatrix::identity(4).unwrap();
        assert!(id.is_identity());
        assert_eq!(id.rows(), &[1, 2, 4, 8]);
        assert!(BitMatrix::identity(65).is_err());
        assert!(BitMatrix::identity(0).unwrap().is_identity());
    }

    #[test]
    fn test_from_rows_rejects_wide_row() {
        assert!(matches!(
            BitMatrix::from_rows(vec![0b01, 0b110]),
            Err(SynthError::RowOutOfRange { row: 1, size: 2 })
        ));
    }

    #[test]
    fn test_entries() {
        let mut m = BitMatrix::identity(3).unwrap();
        m.set(0, 2, true).unwrap();
        assert!(m.get(0, 2));
        assert_eq!(m.row(0), 0b101);
        m.xor_row(1, 0);
        assert_eq!(m.row(1), 0b111);
        m.swap_rows(0, 2);
        assert_eq!(m.rows(), &[0b100, 0b111, 0b101]);
        m.set(0, 2, false).unwrap();
        assert_eq!(m.row(0), 0);
    }

    #[test]
    fn test_set_rejects_out_of_range_entry() {
        let mut m = BitMatrix::identity(2).unwrap();
        assert!(matches!(
            m.set(0, 5, true),
            Err(SynthError::RowOutOfRange { row: 0, size: 2 })
        ));
        assert!(m.set(2, 0, true).is_err());
        assert!(m.set(0, 64, true).is_err());
        assert!(m.is_identity());
        assert!(BitMatrix::from_rows(m.rows().to_vec()).is_ok());
    }

    #[test]
    fn test_inverse() {
        let m = scenario();
        assert!(m.is_invertible());
        let inv = m.inverse().unwrap();
        assert!(m.mul(&inv).unwrap().is_identity());
        assert!(inv.mul(&m).unwrap().is_identity());
    }

    #[test]
    fn test_singular() {
        let m = BitMatrix::from_rows(vec![0b011, 0b110, 0b101]).unwrap();
        assert!(!m.is_invertible());
        assert_eq!(m.rank(), 2);
        assert!(matches!(m.inverse(), Err(SynthError::NotInvertible)));
    }

    #[test]
    fn test_transpose() {
        let m = BitMatrix::from_rows(vec![0b011, 0b100, 0b000]).unwrap();
        let t = m.transpose();
        assert_eq!(t.rows(), &[0b001, 0b001, 0b010]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_apply_matches_mul() {
        let m = scenario();
        let inv = m.inverse().unwrap();
        for x in 0..64u64 {
            assert_eq!(inv.apply(m.apply(x)), x);
        }
    }

    #[test]
    fn test_permute_rows() {
        let m = BitMatrix::from_rows(vec![0b01, 0b10]).unwrap();
        let p = m.permute_rows(&[1, 0]).unwrap();
        assert_eq!(p.rows(), &[0b10, 0b01]);
        assert!(m.permute_rows(&[0, 0]).is_err());
        assert!(m.permute_rows(&[0]).is_err());
    }

    #[test]
    fn test_display() {
        let m = BitMatrix::from_rows(vec![0b01, 0b11]).unwrap();
        assert_eq!(m.to_string(), "10\n11");
    }
}
