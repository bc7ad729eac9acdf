//! Brightness normalization relative to a reference dye.
//!
//! Factors rescale emission curves *before* the matrix is built; the
//! finished matrix is never rescaled.

use std::collections::HashMap;

use dyeplex_core::{Dye, SpectraMap};
use log::{debug, warn};

/// Per-dye scale factors.
///
/// A dye maps to `Some(factor)` when its brightness is known and to `None`
/// when it is not. `None` scales by 1 but stays distinguishable from an
/// explicit factor of 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrightnessFactors {
    factors: HashMap<String, Option<f64>>,
}

impl BrightnessFactors {
    /// Returns true if no factors were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Number of dyes with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Entry for a dye: `None` if absent, `Some(None)` if brightness unknown.
    #[must_use]
    pub fn get(&self, dye_id: &str) -> Option<Option<f64>> {
        self.factors.get(dye_id).copied()
    }

    /// Factor to multiply the dye's emission by (1 when unknown or absent).
    #[must_use]
    pub fn scale_for(&self, dye_id: &str) -> f64 {
        self.get(dye_id).flatten().unwrap_or(1.0)
    }

    /// Iterates over `(dye id, factor)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.factors.iter().map(|(id, f)| (id.as_str(), *f))
    }
}

/// Computes `reference brightness / dye brightness` for every dye.
///
/// The reference brightness is read from the reference dye's record, and
/// the reference must be one of `dyes`. If it is missing or not strictly
/// positive, no factors are produced. Dyes whose own brightness is
/// missing or not positive map to `None`.
#[must_use]
pub fn compute_brightness_factors(
    dyes: &[Dye],
    spectra: &SpectraMap,
    reference_id: &str,
) -> BrightnessFactors {
    let reference = dyes
        .iter()
        .any(|dye| dye.id == reference_id)
        .then(|| spectra.get(reference_id))
        .flatten()
        .and_then(|record| record.positive_brightness());

    let Some(reference) = reference else {
        warn!("Reference dye {reference_id} has no positive brightness coefficient");
        return BrightnessFactors::default();
    };

    let factors = dyes
        .iter()
        .map(|dye| {
            let factor = spectra
                .get(&dye.id)
                .and_then(|record| record.positive_brightness())
                .map(|brightness| reference / brightness);
            (dye.id.clone(), factor)
        })
        .collect();

    debug!("Brightness factors relative to {reference_id} ({reference})");
    BrightnessFactors { factors }
}

/// Returns a copy of `spectra` with scaled emission curves.
///
/// Entries without a factor are copied unchanged; the input map is never
/// modified.
#[must_use]
pub fn normalize_spectra(spectra: &SpectraMap, factors: &BrightnessFactors) -> SpectraMap {
    spectra
        .iter()
        .map(|(id, record)| {
            let mut scaled = record.clone();
            scaled.emission = record.emission.scaled(factors.scale_for(id));
            (id.clone(), scaled)
        })
        .collect()
}
