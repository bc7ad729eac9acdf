//! Display ordering of filter columns.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Permutation of filter column indices, used only for presentation.
///
/// Always a valid permutation of `0..len()`. It survives matrix
/// recomputation but must be reset with [`FilterOrder::sync_len`] whenever
/// the number of filters changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FilterOrder(Vec<usize>);

impl FilterOrder {
    /// Identity order `[0, 1, .., n-1]`.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Builds an order from explicit indices.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPermutation`] unless `indices` contains each of
    /// `0..indices.len()` exactly once.
    pub fn from_indices(indices: Vec<usize>) -> Result<Self> {
        let len = indices.len();
        let mut seen = vec![false; len];
        let is_permutation = indices.iter().all(|&index| match seen.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        });
        if !is_permutation {
            return Err(Error::InvalidPermutation { indices, len });
        }
        Ok(Self(indices))
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column index shown at each display position.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns true if every column is shown in its original position.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(pos, &index)| pos == index)
    }

    /// Resets to identity if the filter count changed.
    ///
    /// Returns true if a reset happened.
    pub fn sync_len(&mut self, num_filters: usize) -> bool {
        if self.0.len() == num_filters {
            return false;
        }
        *self = Self::identity(num_filters);
        true
    }

    /// Swaps display position `pos` with the one to its left.
    ///
    /// No-op at the left edge or out of range.
    pub fn move_left(&mut self, pos: usize) {
        if pos > 0 && pos < self.0.len() {
            self.0.swap(pos - 1, pos);
        }
    }

    /// Swaps display position `pos` with the one to its right.
    ///
    /// No-op at the right edge or out of range.
    pub fn move_right(&mut self, pos: usize) {
        if pos + 1 < self.0.len() {
            self.0.swap(pos, pos + 1);
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for FilterOrder {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let indices = Vec::<usize>::deserialize(deserializer)?;
        Self::from_indices(indices).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let order = FilterOrder::identity(3);
        assert_eq!(order.as_slice(), &[0, 1, 2]);
        assert!(order.is_identity());
    }

    #[test]
    fn test_from_indices_validates() {
        assert!(FilterOrder::from_indices(vec![2, 0, 1]).is_ok());
        assert!(FilterOrder::from_indices(vec![]).is_ok());
        assert!(matches!(
            FilterOrder::from_indices(vec![0, 0, 1]),
            Err(Error::InvalidPermutation { len: 3, .. })
        ));
        assert!(FilterOrder::from_indices(vec![0, 3, 1]).is_err());
    }

    #[test]
    fn test_moves() {
        let mut order = FilterOrder::identity(3);
        order.move_left(0);
        assert_eq!(order.as_slice(), &[0, 1, 2]);
        order.move_left(2);
        assert_eq!(order.as_slice(), &[0, 2, 1]);
        order.move_right(0);
        assert_eq!(order.as_slice(), &[2, 0, 1]);
        order.move_right(2);
        assert_eq!(order.as_slice(), &[2, 0, 1]);
        assert!(!order.is_identity());
    }

    #[test]
    fn test_sync_len_resets_only_on_count_change() {
        let mut order = FilterOrder::from_indices(vec![1, 0]).unwrap();
        assert!(!order.sync_len(2));
        assert_eq!(order.as_slice(), &[1, 0]);
        assert!(order.sync_len(3));
        assert_eq!(order.as_slice(), &[0, 1, 2]);
    }
}
