//! Spectral overlap of one dye with one filter.

use dyeplex_core::SpectralCurve;

/// Detected signal of an emission curve through a filter.
///
/// Sums `intensity × T(λ)/100 × QE(λ)/100` over the emission curve's own
/// samples. Filter and QE curves are interpolated onto the emission
/// wavelengths, never the other way round, and the sum is not divided by
/// sample count or spacing: denser emission sampling gives larger totals.
///
/// - Empty emission or empty transmission: 0.
/// - `qe == None`: no QE weighting (factor 1).
/// - `qe == Some(empty)`: interpolation default, i.e. a factor of 1/100.
///   Callers wanting "no QE" pass `None`.
#[must_use]
pub fn integrate_signal(
    emission: &SpectralCurve,
    transmission: &SpectralCurve,
    qe: Option<&SpectralCurve>,
) -> f64 {
    if emission.is_empty() || transmission.is_empty() {
        return 0.0;
    }

    emission
        .iter()
        .map(|&(wl, intensity)| {
            let f = transmission.value_at(wl) / 100.0;
            let q = qe.map_or(1.0, |curve| curve.value_at(wl) / 100.0);
            intensity * f * q
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fam_emission() -> SpectralCurve {
        SpectralCurve::new(vec![(500.0, 0.0), (520.0, 100.0), (540.0, 0.0)])
    }

    fn fam_filter() -> SpectralCurve {
        SpectralCurve::new(vec![(510.0, 0.0), (520.0, 100.0), (530.0, 0.0)])
    }

    #[test]
    fn test_empty_primary_curves_yield_zero() {
        let empty = SpectralCurve::empty();
        let qe = SpectralCurve::new(vec![(400.0, 50.0)]);
        assert_relative_eq!(integrate_signal(&empty, &fam_filter(), Some(&qe)), 0.0);
        assert_relative_eq!(integrate_signal(&fam_emission(), &empty, Some(&qe)), 0.0);
        assert_relative_eq!(integrate_signal(&empty, &empty, None), 0.0);
    }

    #[test]
    fn test_fam_through_fam_filter() {
        let signal = integrate_signal(&fam_emission(), &fam_filter(), None);
        assert_relative_eq!(signal, 100.0);
    }

    #[test]
    fn test_qe_weighting() {
        let qe = SpectralCurve::new(vec![(400.0, 50.0), (600.0, 50.0)]);
        let signal = integrate_signal(&fam_emission(), &fam_filter(), Some(&qe));
        assert_relative_eq!(signal, 50.0);
    }

    #[test]
    fn test_empty_qe_uses_interpolation_default() {
        let empty = SpectralCurve::empty();
        let signal = integrate_signal(&fam_emission(), &fam_filter(), Some(&empty));
        assert_relative_eq!(signal, 1.0);
    }

    #[test]
    fn test_sum_follows_emission_sampling() {
        let flat_filter = SpectralCurve::new(vec![(400.0, 100.0), (700.0, 100.0)]);
        let coarse = SpectralCurve::new(vec![(500.0, 1.0), (600.0, 1.0)]);
        let fine: SpectralCurve = (0..=10)
            .map(|i| (500.0 + 10.0 * f64::from(i), 1.0))
            .collect();
        assert_relative_eq!(integrate_signal(&coarse, &flat_filter, None), 2.0);
        assert_relative_eq!(integrate_signal(&fine, &flat_filter, None), 11.0);
    }

    #[test]
    fn test_transmission_is_not_clamped() {
        let hot_filter = SpectralCurve::new(vec![(500.0, 150.0), (540.0, 150.0)]);
        let signal = integrate_signal(&fam_emission(), &hot_filter, None);
        assert_relative_eq!(signal, 150.0);
    }
}
