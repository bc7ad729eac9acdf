//! dyeplex-core: Core types for fluorescence crosstalk analysis.
//!
//! This crate provides the spectral data model (curves, dyes, filters,
//! camera profiles) and the derived crosstalk matrix and display ordering.
//!

pub mod camera;
pub mod curve;
pub mod dye;
pub mod error;
pub mod filter;
pub mod instrument;
pub mod matrix;
pub mod order;

pub use camera::CameraProfile;
pub use curve::{interpolate, SpectralCurve, MISSING_CURVE_VALUE};
pub use dye::{Dye, DyeSpectra, SpectraMap};
pub use error::{Error, Result};
pub use filter::{Filter, FilterKind};
pub use instrument::{builtin_instruments, find_builtin, InstrumentConfig};
pub use matrix::CrosstalkMatrix;
pub use order::FilterOrder;
