//! Camera quantum-efficiency profiles.

use crate::SpectralCurve;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quantum efficiency (%) of a camera sensor, keyed by camera id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraProfile {
    /// Store identifier.
    pub id: String,
    /// QE percentage by wavelength.
    pub qe: SpectralCurve,
}

impl CameraProfile {
    /// Creates a camera profile.
    pub fn new(id: impl Into<String>, qe: SpectralCurve) -> Self {
        Self { id: id.into(), qe }
    }

    /// Returns the QE curve, or `None` when the camera has no samples.
    #[must_use]
    pub fn curve(&self) -> Option<&SpectralCurve> {
        (!self.qe.is_empty()).then_some(&self.qe)
    }
}
