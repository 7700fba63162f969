//! Dense transit matrix.

use serde::{Deserialize, Serialize};

/// A dense n×n matrix of travel times stored in row-major order.
///
/// Entries may be asymmetric. Non-negativity is checked when the matrix is
/// bound into a [`ProblemData`](crate::models::ProblemData).
///
/// # Examples
///
/// ```
/// use u_pdptw::distance::TransitMatrix;
///
/// let m = TransitMatrix::from_rows(vec![vec![0, 4], vec![6, 0]]).unwrap();
/// assert_eq!(m.get(0, 1), 4);
/// assert_eq!(m.get(1, 0), 6);
/// assert!(!m.is_symmetric());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitMatrix {
    data: Vec<i64>,
    size: usize,
}

impl TransitMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit row-major buffer.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from nested rows.
    ///
    /// Returns `None` if any row length differs from the number of rows.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Travel time from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the travel time from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, value: i64) {
        self.data[from * self.size + to] = value;
    }

    /// Number of stored entries; `size()²` for a well-formed matrix.
    pub fn num_entries(&self) -> usize {
        self.data.len()
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the first negative entry as `(from, to, value)`, if any.
    pub fn first_negative(&self) -> Option<(usize, usize, i64)> {
        self.data
            .iter()
            .position(|&v| v < 0)
            .map(|p| (p / self.size, p % self.size, self.data[p]))
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }
}
