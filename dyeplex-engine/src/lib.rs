//! dyeplex-engine: Crosstalk computation for dye and filter panels.
//!
//! This crate provides the computation stages:
//! - **Crosstalk** - emission × transmission (× QE) summed over emission samples
//! - **Builder** - the full dyes × filters matrix
//! - **Brightness** - per-dye scaling relative to a reference dye
//! - **Presenter** - display normalization, column reordering and sums
//!
//! [`compute_crosstalk`] chains the stages and [`CrosstalkSession`] keeps
//! selection state and filter order across recomputations.
//!
#![warn(missing_docs)]

mod brightness;
mod builder;
mod crosstalk;
mod pipeline;
mod presenter;
mod session;

pub use brightness::{compute_brightness_factors, normalize_spectra, BrightnessFactors};
pub use builder::build_crosstalk_matrix;
pub use crosstalk::integrate_signal;
pub use pipeline::{
    compute_crosstalk, matrix_columns, CrosstalkInputs, CrosstalkResult, PipelineConfig,
};
pub use presenter::{
    normalize_matrix, reorder_and_normalize, valid_columns, NormalizationMode, PresentedMatrix,
};
pub use session::CrosstalkSession;

// Re-export the data model used in the public signatures
pub use dyeplex_core::{
    CameraProfile, CrosstalkMatrix, Dye, DyeSpectra, Filter, FilterKind, FilterOrder,
    SpectraMap, SpectralCurve,
};
