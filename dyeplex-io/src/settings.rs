//! Persisted user selection.
//!
//! The file is a JSON object with camelCase keys. Keys this crate does not
//! know are kept and written back unchanged.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dyeplex_core::{Dye, Filter};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Result;

/// Saved dye and filter selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Selected dyes, in row order.
    #[serde(default)]
    pub selected_dyes: Vec<Dye>,
    /// Selected filters, including their profiles.
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Reference dye for brightness normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization_dye_id: Option<String>,
    /// Unknown keys, preserved on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Location of the settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store for `path`. Nothing is read until [`load`](Self::load).
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Settings file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Settings> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", self.path.display());
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the settings as pretty JSON, creating parent directories.
    ///
    /// # Errors
    /// Returns an error on serialization or write failure.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, text)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
