//! Dye selection entries and their spectral records.

use std::collections::HashMap;

use crate::SpectralCurve;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A selected dye: identifier and display name.
///
/// Spectra are looked up separately through a [`SpectraMap`], because they
/// may still be loading when the selection changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dye {
    /// Store identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Dye {
    /// Creates a dye entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Spectral record of a dye.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DyeSpectra {
    /// Relative fluorescence intensity by wavelength.
    #[cfg_attr(feature = "serde", serde(default))]
    pub emission: SpectralCurve,
    /// Excitation spectrum (display only, never used for crosstalk).
    #[cfg_attr(feature = "serde", serde(default))]
    pub excitation: SpectralCurve,
    /// Relative photons detected per unit excitation.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub brightness_coefficient: Option<f64>,
}

impl DyeSpectra {
    /// Creates a record with an emission curve only.
    #[must_use]
    pub fn with_emission(emission: SpectralCurve) -> Self {
        Self {
            emission,
            ..Self::default()
        }
    }

    /// Sets the brightness coefficient.
    #[must_use]
    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness_coefficient = Some(brightness);
        self
    }

    /// Sets the excitation curve.
    #[must_use]
    pub fn with_excitation(mut self, excitation: SpectralCurve) -> Self {
        self.excitation = excitation;
        self
    }

    /// Returns the brightness coefficient if it is strictly positive.
    ///
    /// Zero, negative and NaN coefficients count as unknown.
    #[must_use]
    pub fn positive_brightness(&self) -> Option<f64> {
        self.brightness_coefficient.filter(|b| *b > 0.0)
    }
}

/// Spectral records keyed by dye id.
pub type SpectraMap = HashMap<String, DyeSpectra>;
