//! Optical filters and ideal bandpass profiles.

use std::fmt;

use crate::error::{Error, Result};
use crate::SpectralCurve;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First wavelength (nm) of generated bandpass profiles.
pub const BANDPASS_START_NM: u32 = 400;
/// Last wavelength (nm) of generated bandpass profiles.
pub const BANDPASS_END_NM: u32 = 800;

/// Role of a filter in the light path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "&'static str"))]
pub enum FilterKind {
    /// Filters the excitation light.
    Excitation,
    /// Filters the emitted light before detection.
    Emission,
    /// Kind not recorded.
    #[default]
    Unspecified,
}

impl FilterKind {
    /// Parses a kind label; anything unrecognized is `Unspecified`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "excitation" => Self::Excitation,
            "emission" => Self::Emission,
            _ => Self::Unspecified,
        }
    }

    /// Returns the wire label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excitation => "excitation",
            Self::Emission => "emission",
            Self::Unspecified => "unknown",
        }
    }

    /// Returns true for detection-side filters.
    #[must_use]
    pub fn is_emission(self) -> bool {
        self == Self::Emission
    }
}

impl From<String> for FilterKind {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<FilterKind> for &'static str {
    fn from(kind: FilterKind) -> Self {
        kind.as_str()
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An optical filter with a transmission profile in percent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Filter {
    /// Store identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Transmission (%) by wavelength; values are not clamped.
    #[cfg_attr(feature = "serde", serde(rename = "profile", default))]
    pub transmission: SpectralCurve,
    /// Role of the filter.
    #[cfg_attr(feature = "serde", serde(rename = "filterType", default))]
    pub kind: FilterKind,
}

impl Filter {
    /// Creates a filter.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        transmission: SpectralCurve,
        kind: FilterKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            transmission,
            kind,
        }
    }

    /// Creates an ideal bandpass filter: 100 % within `[lo, hi]`, 0 % elsewhere.
    ///
    /// The profile is sampled every nanometre over
    /// [`BANDPASS_START_NM`]..=[`BANDPASS_END_NM`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidBand`] if the bounds are not finite or `lo > hi`.
    pub fn bandpass(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: FilterKind,
        lo: f64,
        hi: f64,
    ) -> Result<Self> {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(Error::InvalidBand { lo, hi });
        }
        Ok(Self::new(id, name, ideal_bandpass(lo, hi), kind))
    }
}

/// Samples an ideal bandpass on the 1 nm preset grid.
pub(crate) fn ideal_bandpass(lo: f64, hi: f64) -> SpectralCurve {
    (BANDPASS_START_NM..=BANDPASS_END_NM)
        .map(|nm| {
            let wl = f64::from(nm);
            let transmission = if wl >= lo && wl <= hi { 100.0 } else { 0.0 };
            (wl, transmission)
        })
        .collect()
}
