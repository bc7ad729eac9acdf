//! Built-in instrument filter sets.
//!
//! Channel bounds are the vendor-published bandpasses of common qPCR
//! instruments, modelled as ideal 0/100 % filters on a 1 nm grid.

use crate::filter::ideal_bandpass;
use crate::{Filter, FilterKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named set of filters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstrumentConfig {
    /// Instrument name.
    pub name: String,
    /// `"default"` for built-ins, `"custom"` otherwise.
    pub category: String,
    /// Excitation and emission filters.
    pub filters: Vec<Filter>,
}

impl InstrumentConfig {
    /// Returns the detection-side filters in configuration order.
    pub fn emission_filters(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter().filter(|f| f.kind.is_emission())
    }
}

// (id, name, lo, hi)
type Channel = (&'static str, &'static str, f64, f64);

const QUANTSTUDIO_5_EXCITATION: [Channel; 6] = [
    ("qs5_x1_excitation", "x1 Excitation (Blue)", 455.0, 485.0),
    ("qs5_x2_excitation", "x2 Excitation (Green)", 510.0, 530.0),
    ("qs5_x3_excitation", "x3 Excitation (Yellow)", 540.0, 560.0),
    ("qs5_x4_excitation", "x4 Excitation (Orange)", 570.0, 590.0),
    ("qs5_x5_excitation", "x5 Excitation (Red)", 630.0, 650.0),
    ("qs5_x6_excitation", "x6 Excitation (Deep-Red)", 652.0, 672.0),
];

const QUANTSTUDIO_5_EMISSION: [Channel; 6] = [
    ("qs5_m1_emission", "m1 Emission (Blue)", 505.0, 535.0),
    ("qs5_m2_emission", "m2 Emission (Green)", 546.0, 570.0),
    ("qs5_m3_emission", "m3 Emission (Yellow)", 577.0, 597.0),
    ("qs5_m4_emission", "m4 Emission (Orange)", 609.0, 637.0),
    ("qs5_m5_emission", "m5 Emission (Red)", 668.0, 696.0),
    ("qs5_m6_emission", "m6 Emission (Deep-Red)", 699.0, 723.0),
];

const CFX96_EXCITATION: [Channel; 5] = [
    ("cfx96_ch1_excitation", "Channel 1 Excitation (450-490)", 450.0, 490.0),
    ("cfx96_ch2_excitation", "Channel 2 Excitation (515-535)", 515.0, 535.0),
    ("cfx96_ch3_excitation", "Channel 3 Excitation (560-590)", 560.0, 590.0),
    ("cfx96_ch4_excitation", "Channel 4 Excitation (620-650)", 620.0, 650.0),
    ("cfx96_ch5_excitation", "Channel 5 Excitation (672-684)", 672.0, 684.0),
];

const CFX96_DETECTION: [Channel; 5] = [
    ("cfx96_ch1_detection", "Channel 1 Detection (510-530)", 510.0, 530.0),
    ("cfx96_ch2_detection", "Channel 2 Detection (560-580)", 560.0, 580.0),
    ("cfx96_ch3_detection", "Channel 3 Detection (610-650)", 610.0, 650.0),
    ("cfx96_ch4_detection", "Channel 4 Detection (675-690)", 675.0, 690.0),
    ("cfx96_ch5_detection", "Channel 5 Detection (705-730)", 705.0, 730.0),
];

fn channels(excitation: &[Channel], emission: &[Channel]) -> Vec<Filter> {
    let tagged = excitation
        .iter()
        .map(|c| (c, FilterKind::Excitation))
        .chain(emission.iter().map(|c| (c, FilterKind::Emission)));
    tagged
        .map(|(&(id, name, lo, hi), kind)| Filter::new(id, name, ideal_bandpass(lo, hi), kind))
        .collect()
}

/// Returns the pre-installed instrument configurations.
#[must_use]
pub fn builtin_instruments() -> Vec<InstrumentConfig> {
    vec![
        InstrumentConfig {
            name: "QuantStudio 5".to_string(),
            category: "default".to_string(),
            filters: channels(&QUANTSTUDIO_5_EXCITATION, &QUANTSTUDIO_5_EMISSION),
        },
        InstrumentConfig {
            name: "CFX96 Touch".to_string(),
            category: "default".to_string(),
            filters: channels(&CFX96_EXCITATION, &CFX96_DETECTION),
        },
    ]
}

/// Finds a built-in configuration by name, ignoring case and spaces.
#[must_use]
pub fn find_builtin(name: &str) -> Option<InstrumentConfig> {
    let key = normalize_name(name);
    builtin_instruments()
        .into_iter()
        .find(|config| normalize_name(&config.name) == key)
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
