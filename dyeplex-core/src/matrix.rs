//! Crosstalk matrix storage.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Detected signal per (dye, filter) pair.
///
/// Rows follow dye selection order, columns follow filter selection order.
/// An empty matrix (no rows) is the "nothing to compute" sentinel; check
/// [`CrosstalkMatrix::is_empty`] before indexing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CrosstalkMatrix {
    rows: Vec<Vec<f64>>,
}

impl CrosstalkMatrix {
    /// Creates the empty sentinel matrix.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a matrix from rows.
    ///
    /// Callers are expected to pass rows of equal length.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Returns true if the matrix has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows (dyes).
    #[must_use]
    pub fn num_dyes(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (filters).
    #[must_use]
    pub fn num_filters(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Returns the cell at `(dye, filter)`.
    #[must_use]
    pub fn get(&self, dye: usize, filter: usize) -> Option<f64> {
        self.rows.get(dye)?.get(filter).copied()
    }

    /// Returns all rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Returns one row.
    #[must_use]
    pub fn row(&self, dye: usize) -> Option<&[f64]> {
        self.rows.get(dye).map(Vec::as_slice)
    }

    /// Iterates over the values of one column; missing cells read as 0.
    pub fn column(&self, filter: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(filter).copied().unwrap_or(0.0))
    }

    /// Largest cell value, or 0 for an empty matrix.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.rows
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }

    /// Largest value in one column, or 0 if the column is empty.
    #[must_use]
    pub fn column_max(&self, filter: usize) -> f64 {
        self.column(filter).fold(0.0, f64::max)
    }

    /// Consumes the matrix and returns its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }
}
