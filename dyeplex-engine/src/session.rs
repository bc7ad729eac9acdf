//! Selection state with full recomputation on change.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use dyeplex_core::{
    CameraProfile, Dye, DyeSpectra, Error, Filter, FilterOrder, Result, SpectraMap, SpectralCurve,
};
use log::debug;

use crate::pipeline::{
    compute_crosstalk, matrix_columns, CrosstalkInputs, CrosstalkResult, PipelineConfig,
};
use crate::presenter::{reorder_and_normalize, NormalizationMode, PresentedMatrix};

/// Everything the matrix depends on, reduced to comparable values.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    dye_ids: Vec<String>,
    filter_ids: Vec<String>,
    content: u64,
    config: PipelineConfig,
    camera: Option<String>,
}

/// Dye and filter selection plus the display order of filter columns.
///
/// The matrix is recomputed in full whenever an input changes; an internal
/// memo skips recomputation when nothing relevant changed.
/// The filter order is kept across recomputations and reset to identity
/// only when the number of matrix columns changes.
#[derive(Debug, Default)]
pub struct CrosstalkSession {
    dyes: Vec<Dye>,
    filters: Vec<Filter>,
    spectra: Option<SpectraMap>,
    camera: Option<CameraProfile>,
    config: PipelineConfig,
    order: FilterOrder,
    memo: Option<(MemoKey, CrosstalkResult)>,
    recomputations: usize,
}

impl CrosstalkSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Selected dyes.
    #[must_use]
    pub fn dyes(&self) -> &[Dye] {
        &self.dyes
    }

    /// Selected filters (before kind selection).
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current display order of the matrix columns.
    #[must_use]
    pub fn filter_order(&self) -> &FilterOrder {
        &self.order
    }

    /// Number of full recomputations performed so far.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// Replaces the dye selection.
    pub fn set_dyes(&mut self, dyes: Vec<Dye>) {
        self.dyes = dyes;
    }

    /// Replaces the filter selection and syncs the filter order.
    pub fn set_filters(&mut self, filters: Vec<Filter>) {
        self.filters = filters;
        self.sync_order();
    }

    /// Adds or replaces the spectra of one dye.
    pub fn insert_spectra(&mut self, dye_id: impl Into<String>, spectra: DyeSpectra) {
        self.spectra
            .get_or_insert_with(SpectraMap::new)
            .insert(dye_id.into(), spectra);
    }

    /// Replaces all loaded spectra.
    pub fn set_spectra(&mut self, spectra: Option<SpectraMap>) {
        self.spectra = spectra;
    }

    /// Selects or clears the camera.
    pub fn set_camera(&mut self, camera: Option<CameraProfile>) {
        self.camera = camera;
    }

    /// Replaces the configuration and syncs the filter order.
    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
        self.sync_order();
    }

    /// Replaces the filter order.
    ///
    /// # Errors
    /// Returns [`Error::OrderLength`] unless the order covers exactly the
    /// current matrix columns; the previous order is kept.
    pub fn set_filter_order(&mut self, order: FilterOrder) -> Result<()> {
        let expected = matrix_columns(&self.filters, &self.config).len();
        if order.len() != expected {
            return Err(Error::OrderLength {
                len: order.len(),
                expected,
            });
        }
        self.order = order;
        Ok(())
    }

    /// Moves a displayed column one position to the left.
    pub fn move_filter_left(&mut self, pos: usize) {
        self.order.move_left(pos);
    }

    /// Moves a displayed column one position to the right.
    pub fn move_filter_right(&mut self, pos: usize) {
        self.order.move_right(pos);
    }

    /// Returns the crosstalk result, recomputing it if any input changed.
    pub fn result(&mut self) -> &CrosstalkResult {
        let key = self.memo_key();
        let memo = match self.memo.take() {
            Some((cached, result)) if cached == key => (cached, result),
            _ => {
                let inputs = CrosstalkInputs {
                    dyes: &self.dyes,
                    filters: &self.filters,
                    spectra: self.spectra.as_ref(),
                    camera: self.camera.as_ref(),
                };
                let result = compute_crosstalk(inputs, &self.config);
                self.recomputations += 1;
                debug!("Session recomputation #{}", self.recomputations);
                (key, result)
            }
        };
        &self.memo.insert(memo).1
    }

    /// Returns the normalized, reordered matrix with sums.
    pub fn present(&mut self) -> PresentedMatrix {
        let mode = self.config.mode;
        let order = self.order.clone();
        reorder_and_normalize(&self.result().matrix, &order, mode)
    }

    fn sync_order(&mut self) {
        let columns = matrix_columns(&self.filters, &self.config).len();
        if self.order.sync_len(columns) {
            debug!("Filter order reset to identity ({columns} columns)");
        }
    }

    fn memo_key(&self) -> MemoKey {
        let mut hasher = DefaultHasher::new();
        for filter in &self.filters {
            filter.name.hash(&mut hasher);
            filter.kind.hash(&mut hasher);
            hash_curve(&filter.transmission, &mut hasher);
        }
        for dye in &self.dyes {
            match self.spectra.as_ref().and_then(|s| s.get(&dye.id)) {
                Some(record) => {
                    hash_curve(&record.emission, &mut hasher);
                    record.brightness_coefficient.map(f64::to_bits).hash(&mut hasher);
                }
                None => 0u8.hash(&mut hasher),
            }
        }
        // Brightness of the reference matters even if it is not a row.
        if let Some(reference) = self.config.normalization_dye.as_deref() {
            self.spectra
                .as_ref()
                .and_then(|s| s.get(reference))
                .and_then(|r| r.brightness_coefficient)
                .map(f64::to_bits)
                .hash(&mut hasher);
        }
        self.spectra.is_some().hash(&mut hasher);
        if let Some(camera) = &self.camera {
            hash_curve(&camera.qe, &mut hasher);
        }

        MemoKey {
            dye_ids: self.dyes.iter().map(|d| d.id.clone()).collect(),
            filter_ids: self.filters.iter().map(|f| f.id.clone()).collect(),
            content: hasher.finish(),
            // Display mode does not affect the matrix.
            config: PipelineConfig {
                mode: NormalizationMode::default(),
                ..self.config.clone()
            },
            camera: self.camera.as_ref().map(|c| c.id.clone()),
        }
    }
}

fn hash_curve(curve: &SpectralCurve, hasher: &mut DefaultHasher) {
    curve.len().hash(hasher);
    for &(wl, value) in curve.iter() {
        wl.to_bits().hash(hasher);
        value.to_bits().hash(hasher);
    }
}
