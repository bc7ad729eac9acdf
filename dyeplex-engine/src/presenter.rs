//! Display normalization, column ordering and sums.
//!
//! Normalization always runs on the matrix in its original column
//! indexing; the display order is applied afterwards. Swapping the two
//! would compute per-column maxima on the wrong columns.

use dyeplex_core::{CrosstalkMatrix, FilterOrder};
use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How cells are scaled for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NormalizationMode {
    /// Divide every cell by the largest cell of the matrix.
    Global,
    /// Divide each column by its own largest cell.
    #[default]
    PerColumn,
}

/// A matrix ready for display.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PresentedMatrix {
    /// Original filter index of each displayed column.
    pub columns: Vec<usize>,
    /// Normalized cells in display order, one row per dye.
    pub ordered: Vec<Vec<f64>>,
    /// Sum of each row over the displayed columns.
    pub row_sums: Vec<f64>,
    /// Sum of each displayed column over all dyes.
    pub col_sums: Vec<f64>,
    /// Sum of all row sums.
    pub total: f64,
}

/// Scales the matrix for display, keeping the original column indexing.
///
/// A zero maximum (global or per column) yields zeros instead of NaN.
/// Every row keeps its own length, even in a ragged matrix.
#[must_use]
pub fn normalize_matrix(matrix: &CrosstalkMatrix, mode: NormalizationMode) -> Vec<Vec<f64>> {
    let width = matrix.rows().iter().map(Vec::len).max().unwrap_or(0);
    let divisors: Vec<f64> = match mode {
        NormalizationMode::Global => vec![matrix.max(); width],
        NormalizationMode::PerColumn => (0..width).map(|j| matrix.column_max(j)).collect(),
    };

    matrix
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&divisors)
                .map(|(&value, &max)| if max > 0.0 { value / max } else { 0.0 })
                .collect()
        })
        .collect()
}

/// Original column indices of `order` that exist in a `num_filters`-wide matrix.
///
/// Stale indices (left over after filters were removed) are dropped.
#[must_use]
pub fn valid_columns(order: &FilterOrder, num_filters: usize) -> Vec<usize> {
    let columns: Vec<usize> = order
        .as_slice()
        .iter()
        .copied()
        .filter(|&index| index < num_filters)
        .collect();
    if columns.len() != order.len() {
        warn!(
            "Dropped {} stale filter order entries (matrix has {num_filters} columns)",
            order.len() - columns.len()
        );
    }
    columns
}

/// Normalizes, reorders, and sums a crosstalk matrix for display.
#[must_use]
pub fn reorder_and_normalize(
    matrix: &CrosstalkMatrix,
    order: &FilterOrder,
    mode: NormalizationMode,
) -> PresentedMatrix {
    if matrix.is_empty() {
        return PresentedMatrix::default();
    }

    let normalized = normalize_matrix(matrix, mode);
    let columns = valid_columns(order, matrix.num_filters());

    let ordered: Vec<Vec<f64>> = normalized
        .iter()
        // Short rows read as 0 past their end.
        .map(|row| {
            columns
                .iter()
                .map(|&j| row.get(j).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    let row_sums: Vec<f64> = ordered.iter().map(|row| row.iter().sum()).collect();
    let col_sums: Vec<f64> = (0..columns.len())
        .map(|j| ordered.iter().map(|row| row[j]).sum())
        .collect();
    let total: f64 = row_sums.iter().sum();

    PresentedMatrix {
        columns,
        ordered,
        row_sums,
        col_sums,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> CrosstalkMatrix {
        CrosstalkMatrix::from_rows(vec![vec![10.0, 1.0], vec![2.0, 5.0]])
    }

    fn assert_rows_eq(actual: &[Vec<f64>], expected: &[&[f64]]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_eq!(a.len(), e.len());
            for (x, y) in a.iter().zip(e.iter()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_global_normalization() {
        let normalized = normalize_matrix(&sample(), NormalizationMode::Global);
        assert_rows_eq(&normalized, &[&[1.0, 0.1], &[0.2, 0.5]]);
    }

    #[test]
    fn test_per_column_normalization() {
        let normalized = normalize_matrix(&sample(), NormalizationMode::PerColumn);
        assert_rows_eq(&normalized, &[&[1.0, 0.2], &[0.2, 1.0]]);
    }

    #[test]
    fn test_zero_max_gives_zeros() {
        let matrix = CrosstalkMatrix::from_rows(vec![vec![0.0, 3.0], vec![0.0, 1.0]]);
        let per_column = normalize_matrix(&matrix, NormalizationMode::PerColumn);
        assert_rows_eq(&per_column, &[&[0.0, 1.0], &[0.0, 1.0 / 3.0]]);

        let zeros = CrosstalkMatrix::from_rows(vec![vec![0.0, 0.0]]);
        let global = normalize_matrix(&zeros, NormalizationMode::Global);
        assert_rows_eq(&global, &[&[0.0, 0.0]]);
    }

    #[test]
    fn test_identity_order_keeps_matrix() {
        let presented = reorder_and_normalize(
            &sample(),
            &FilterOrder::identity(2),
            NormalizationMode::PerColumn,
        );
        assert_eq!(presented.columns, vec![0, 1]);
        assert_rows_eq(&presented.ordered, &[&[1.0, 0.2], &[0.2, 1.0]]);
    }

    #[test]
    fn test_reorder_after_per_column_normalization() {
        let order = FilterOrder::from_indices(vec![1, 0]).unwrap();
        let presented = reorder_and_normalize(&sample(), &order, NormalizationMode::PerColumn);
        // Column 1 keeps its own max (5) after moving to position 0.
        assert_rows_eq(&presented.ordered, &[&[0.2, 1.0], &[1.0, 0.2]]);
        assert_relative_eq!(presented.col_sums[0], 1.2, epsilon = 1e-12);
        assert_relative_eq!(presented.col_sums[1], 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_stale_indices_are_dropped() {
        let order = FilterOrder::from_indices(vec![2, 1, 0]).unwrap();
        let presented = reorder_and_normalize(&sample(), &order, NormalizationMode::Global);
        assert_eq!(presented.columns, vec![1, 0]);
        assert_rows_eq(&presented.ordered, &[&[0.1, 1.0], &[0.5, 0.2]]);
    }

    #[test]
    fn test_sums() {
        let presented = reorder_and_normalize(
            &sample(),
            &FilterOrder::identity(2),
            NormalizationMode::Global,
        );
        assert_relative_eq!(presented.row_sums[0], 1.1, epsilon = 1e-12);
        assert_relative_eq!(presented.row_sums[1], 0.7, epsilon = 1e-12);
        assert_relative_eq!(presented.col_sums[0], 1.2, epsilon = 1e-12);
        assert_relative_eq!(presented.col_sums[1], 0.6, epsilon = 1e-12);
        assert_relative_eq!(presented.total, 1.8, epsilon = 1e-12);
    }

    #[test]
    fn test_ragged_rows_read_zero() {
        let ragged = CrosstalkMatrix::from_rows(vec![vec![1.0, 2.0], vec![4.0]]);
        let presented =
            reorder_and_normalize(&ragged, &FilterOrder::identity(2), NormalizationMode::Global);
        assert_eq!(presented.columns, vec![0, 1]);
        assert_rows_eq(&presented.ordered, &[&[0.25, 0.5], &[1.0, 0.0]]);
        assert_relative_eq!(presented.total, 1.75, epsilon = 1e-12);

        // A longer later row is normalized in full, not truncated.
        let long_tail = CrosstalkMatrix::from_rows(vec![vec![2.0], vec![1.0, 4.0]]);
        let normalized = normalize_matrix(&long_tail, NormalizationMode::PerColumn);
        assert_rows_eq(&normalized, &[&[1.0], &[0.5, 1.0]]);
    }

    #[test]
    fn test_empty_matrix() {
        let presented = reorder_and_normalize(
            &CrosstalkMatrix::empty(),
            &FilterOrder::identity(3),
            NormalizationMode::Global,
        );
        assert!(presented.ordered.is_empty());
        assert_relative_eq!(presented.total, 0.0);
    }
}
