//! High-level helper chaining brightness normalization and matrix building.

use dyeplex_core::{CameraProfile, CrosstalkMatrix, Dye, Filter, SpectraMap};
use log::debug;

use crate::brightness::{compute_brightness_factors, normalize_spectra, BrightnessFactors};
use crate::builder::build_crosstalk_matrix;
use crate::presenter::NormalizationMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a crosstalk computation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// Weight signals by the camera QE curve when a camera is selected.
    pub include_qe: bool,
    /// Reference dye for brightness factors.
    pub normalization_dye: Option<String>,
    /// Scale emission curves by the brightness factors before building.
    pub brightness_normalization: bool,
    /// Use only emission filters as matrix columns.
    pub emission_filters_only: bool,
    /// Display normalization mode.
    pub mode: NormalizationMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            include_qe: true,
            normalization_dye: None,
            brightness_normalization: false,
            emission_filters_only: true,
            mode: NormalizationMode::PerColumn,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets QE inclusion.
    #[must_use]
    pub fn with_include_qe(mut self, include: bool) -> Self {
        self.include_qe = include;
        self
    }

    /// Sets the brightness reference dye and enables normalization.
    #[must_use]
    pub fn with_normalization_dye(mut self, dye_id: impl Into<String>) -> Self {
        self.normalization_dye = Some(dye_id.into());
        self.brightness_normalization = true;
        self
    }

    /// Toggles brightness normalization without changing the reference.
    #[must_use]
    pub fn with_brightness_normalization(mut self, enabled: bool) -> Self {
        self.brightness_normalization = enabled;
        self
    }

    /// Sets whether non-emission filters are dropped.
    #[must_use]
    pub fn with_emission_filters_only(mut self, only: bool) -> Self {
        self.emission_filters_only = only;
        self
    }

    /// Sets the display normalization mode.
    #[must_use]
    pub fn with_mode(mut self, mode: NormalizationMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Borrowed inputs of a computation.
#[derive(Debug, Clone, Copy)]
pub struct CrosstalkInputs<'a> {
    /// Selected dyes, in row order.
    pub dyes: &'a [Dye],
    /// Selected filters, in column order before kind selection.
    pub filters: &'a [Filter],
    /// Spectra loaded so far; `None` while nothing is loaded.
    pub spectra: Option<&'a SpectraMap>,
    /// Selected camera.
    pub camera: Option<&'a CameraProfile>,
}

/// Output of [`compute_crosstalk`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrosstalkResult {
    /// Matrix over `dyes × columns`.
    pub matrix: CrosstalkMatrix,
    /// Filters used as matrix columns.
    pub columns: Vec<Filter>,
    /// Brightness factors for the configured reference (empty if none).
    pub factors: BrightnessFactors,
    /// True if emission curves were rescaled before building.
    pub normalized: bool,
}

/// Selects the filters that become matrix columns.
#[must_use]
pub fn matrix_columns(filters: &[Filter], config: &PipelineConfig) -> Vec<Filter> {
    filters
        .iter()
        .filter(|f| !config.emission_filters_only || f.kind.is_emission())
        .cloned()
        .collect()
}

/// Runs brightness normalization (if enabled) and builds the matrix.
///
/// Factors are computed whenever a reference dye is set so callers can
/// display them; they only rescale emission when
/// `brightness_normalization` is on and the reference has spectra loaded.
#[must_use]
pub fn compute_crosstalk(inputs: CrosstalkInputs<'_>, config: &PipelineConfig) -> CrosstalkResult {
    let columns = matrix_columns(inputs.filters, config);

    let factors = match (inputs.spectra, config.normalization_dye.as_deref()) {
        (Some(spectra), Some(reference)) => {
            compute_brightness_factors(inputs.dyes, spectra, reference)
        }
        _ => BrightnessFactors::default(),
    };

    let reference_loaded = config
        .normalization_dye
        .as_deref()
        .zip(inputs.spectra)
        .is_some_and(|(id, spectra)| spectra.contains_key(id));
    let normalized = config.brightness_normalization && reference_loaded;

    let scaled = if normalized {
        inputs.spectra.map(|spectra| normalize_spectra(spectra, &factors))
    } else {
        None
    };
    let spectra = scaled.as_ref().or(inputs.spectra);

    let qe = inputs.camera.and_then(CameraProfile::curve);
    let matrix = build_crosstalk_matrix(inputs.dyes, &columns, spectra, config.include_qe, qe);

    debug!(
        "Crosstalk computed: {} dyes, {} of {} filters, brightness normalization {}",
        inputs.dyes.len(),
        columns.len(),
        inputs.filters.len(),
        if normalized { "on" } else { "off" }
    );

    CrosstalkResult {
        matrix,
        columns,
        factors,
        normalized,
    }
}
