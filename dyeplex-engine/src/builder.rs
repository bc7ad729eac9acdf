//! Crosstalk matrix over dyes × filters.

use dyeplex_core::{CrosstalkMatrix, Dye, Filter, SpectraMap, SpectralCurve};
use log::{debug, trace, warn};

use crate::crosstalk::integrate_signal;

/// Builds the `dyes.len() × filters.len()` crosstalk matrix.
///
/// Each cell is [`integrate_signal`] of the dye's emission through the
/// filter's transmission. `qe` is applied only when `include_qe` is set.
///
/// Returns the empty sentinel if `dyes` or `filters` is empty or `spectra`
/// is `None`. A dye missing from `spectra` gets a row of zeros rather
/// than being skipped, so the shape always matches the selection.
#[must_use]
pub fn build_crosstalk_matrix(
    dyes: &[Dye],
    filters: &[Filter],
    spectra: Option<&SpectraMap>,
    include_qe: bool,
    qe: Option<&SpectralCurve>,
) -> CrosstalkMatrix {
    let Some(spectra) = spectra else {
        debug!("No spectra supplied, crosstalk matrix is empty");
        return CrosstalkMatrix::empty();
    };
    if dyes.is_empty() || filters.is_empty() {
        return CrosstalkMatrix::empty();
    }

    let qe = if include_qe { qe } else { None };
    let missing = SpectralCurve::empty();

    let rows = dyes
        .iter()
        .map(|dye| {
            let emission = match spectra.get(&dye.id) {
                Some(record) => &record.emission,
                None => {
                    warn!("No spectra loaded for dye {}, row is zero", dye.id);
                    &missing
                }
            };
            filters
                .iter()
                .map(|filter| {
                    let signal = integrate_signal(emission, &filter.transmission, qe);
                    trace!("Crosstalk {} ({}) -> {}: {signal}", dye.id, dye.name, filter.name);
                    signal
                })
                .collect()
        })
        .collect();

    debug!(
        "Built {}x{} crosstalk matrix (QE {})",
        dyes.len(),
        filters.len(),
        if qe.is_some() { "applied" } else { "off" }
    );
    CrosstalkMatrix::from_rows(rows)
}
