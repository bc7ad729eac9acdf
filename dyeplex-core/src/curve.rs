//! Spectral curves and linear interpolation.
//!
//! A [`SpectralCurve`] is a sparse set of `(wavelength, value)` samples.
//! Samples are stably sorted by wavelength on construction, so lookups can
//! binary search and duplicate wavelengths keep their original order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value returned when interpolating a missing or empty curve.
///
/// This is a pass-through default: an absent filter or QE curve leaves the
/// signal untouched instead of zeroing it.
pub const MISSING_CURVE_VALUE: f64 = 1.0;

/// Wavelength-indexed samples (nm, value).
///
/// Serialized as a list of `[wavelength, value]` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")
)]
pub struct SpectralCurve {
    points: Vec<(f64, f64)>,
}

impl SpectralCurve {
    /// Creates a curve from samples in any order.
    #[must_use]
    pub fn new(mut points: Vec<(f64, f64)>) -> Self {
        // sort_by is stable: ties keep producer order
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { points }
    }

    /// Creates an empty curve ("no data").
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the curve has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the samples sorted by wavelength.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Returns an iterator over the samples.
    pub fn iter(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.points.iter()
    }

    /// Returns the covered wavelength range, if any.
    #[must_use]
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }

    /// Returns the sample with the highest value.
    #[must_use]
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Linearly interpolates the value at `wavelength`.
    ///
    /// - Empty curve: [`MISSING_CURVE_VALUE`].
    /// - Outside the sampled range: clamps to the nearest end sample.
    /// - Duplicate wavelengths: the first bracketing segment wins.
    #[must_use]
    pub fn value_at(&self, wavelength: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) else {
            return MISSING_CURVE_VALUE;
        };
        if wavelength <= first.0 {
            return first.1;
        }
        if wavelength > last.0 {
            return last.1;
        }

        // First sample with wl >= wavelength closes the first matching segment.
        let upper = self.points.partition_point(|p| p.0 < wavelength);
        let Some(lower) = upper.checked_sub(1) else {
            return first.1;
        };
        let (w0, v0) = self.points[lower];
        let (w1, v1) = self.points[upper];
        if w1 <= w0 {
            return v0;
        }
        v0 + (v1 - v0) * (wavelength - w0) / (w1 - w0)
    }

    /// Returns a new curve with every value multiplied by `factor`.
    ///
    /// Wavelengths are unchanged and `self` is left untouched.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|&(wl, value)| (wl, value * factor))
                .collect(),
        }
    }
}

/// Interpolates an optional curve.
///
/// `None` behaves like an empty curve and yields [`MISSING_CURVE_VALUE`].
#[must_use]
pub fn interpolate(curve: Option<&SpectralCurve>, wavelength: f64) -> f64 {
    curve.map_or(MISSING_CURVE_VALUE, |c| c.value_at(wavelength))
}

impl From<Vec<(f64, f64)>> for SpectralCurve {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points)
    }
}

impl From<SpectralCurve> for Vec<(f64, f64)> {
    fn from(curve: SpectralCurve) -> Self {
        curve.points
    }
}

impl FromIterator<(f64, f64)> for SpectralCurve {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> SpectralCurve {
        SpectralCurve::new(vec![(400.0, 0.0), (500.0, 100.0)])
    }

    #[test]
    fn test_empty_curve_passes_through() {
        let curve = SpectralCurve::empty();
        assert_relative_eq!(curve.value_at(520.0), MISSING_CURVE_VALUE);
        assert_relative_eq!(interpolate(None, 520.0), 1.0);
    }

    #[test]
    fn test_linear_midpoint() {
        assert_relative_eq!(ramp().value_at(450.0), 50.0);
        assert_relative_eq!(ramp().value_at(425.0), 25.0);
    }

    #[test]
    fn test_clamps_outside_range() {
        let curve = ramp();
        assert_relative_eq!(curve.value_at(300.0), 0.0);
        assert_relative_eq!(curve.value_at(400.0), 0.0);
        assert_relative_eq!(curve.value_at(500.0), 100.0);
        assert_relative_eq!(curve.value_at(900.0), 100.0);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let curve = SpectralCurve::new(vec![(600.0, 3.0), (400.0, 1.0), (500.0, 2.0)]);
        let wavelengths: Vec<f64> = curve.iter().map(|p| p.0).collect();
        assert_eq!(wavelengths, vec![400.0, 500.0, 600.0]);
        assert_relative_eq!(curve.value_at(550.0), 2.5);
    }

    #[test]
    fn test_duplicate_wavelengths_use_first_segment() {
        // Stable sort keeps (500, 10) ahead of (500, 90).
        let curve = SpectralCurve::new(vec![
            (600.0, 50.0),
            (500.0, 10.0),
            (400.0, 0.0),
            (500.0, 90.0),
        ]);
        assert_relative_eq!(curve.value_at(500.0), 10.0);
        assert_relative_eq!(curve.value_at(450.0), 5.0);
        assert_relative_eq!(curve.value_at(550.0), 70.0);
    }

    #[test]
    fn test_zero_width_bracket_is_finite() {
        let curve = SpectralCurve::new(vec![(500.0, 7.0), (500.0, 9.0)]);
        let value = curve.value_at(500.0);
        assert!(value.is_finite());
        assert_relative_eq!(value, 7.0);
    }

    #[test]
    fn test_single_sample_is_constant() {
        let curve = SpectralCurve::new(vec![(520.0, 42.0)]);
        assert_relative_eq!(curve.value_at(400.0), 42.0);
        assert_relative_eq!(curve.value_at(700.0), 42.0);
    }

    #[test]
    fn test_scaled_leaves_source_untouched() {
        let curve = ramp();
        let doubled = curve.scaled(2.0);
        assert_relative_eq!(doubled.value_at(500.0), 200.0);
        assert_relative_eq!(curve.value_at(500.0), 100.0);
        assert_eq!(curve.range(), doubled.range());
    }

    #[test]
    fn test_scale_round_trip() {
        let curve = SpectralCurve::new(vec![(480.0, 3.3), (520.0, 97.1), (560.0, 12.7)]);
        let k = 3.7;
        let restored = curve.scaled(k).scaled(1.0 / k);
        for (a, b) in curve.iter().zip(restored.iter()) {
            assert_relative_eq!(a.0, b.0);
            assert_relative_eq!(a.1, b.1, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_peak_and_range() {
        let curve = SpectralCurve::new(vec![(500.0, 0.0), (520.0, 100.0), (540.0, 0.0)]);
        assert_eq!(curve.peak(), Some((520.0, 100.0)));
        assert_eq!(curve.range(), Some((500.0, 540.0)));
        assert_eq!(SpectralCurve::empty().range(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_pairs() {
        let curve: SpectralCurve = serde_json::from_str("[[500, 2.0], [400, 1.0]]").unwrap();
        assert_eq!(curve.points(), &[(400.0, 1.0), (500.0, 2.0)]);
        let text = serde_json::to_string(&curve).unwrap();
        assert_eq!(text, "[[400.0,1.0],[500.0,2.0]]");
    }
}
