//! Directory-backed store of dye, filter and camera records.
//!
//! Layout under the root:
//!
//! ```text
//! dyes/<id>.json
//! filters/<id>.json
//! cameras/<id>.json
//! ```
//!
//! Ids are file stems. Lookup tries the exact id first, then a
//! case-insensitive match.

use std::fs;
use std::path::{Path, PathBuf};

use dyeplex_core::{CameraProfile, Dye, DyeSpectra, Filter, SpectraMap};
use log::{debug, warn};
use serde_json::Value;

use crate::record::{decode_camera, decode_dye, decode_filter};
use crate::{Error, Result};

/// Record category, one subdirectory each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Dye spectra.
    Dye,
    /// Filter transmission profiles.
    Filter,
    /// Camera QE curves.
    Camera,
}

impl RecordKind {
    /// Subdirectory holding this kind of record.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Dye => "dyes",
            Self::Filter => "filters",
            Self::Camera => "cameras",
        }
    }

    /// Singular label used in errors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dye => "dye",
            Self::Filter => "filter",
            Self::Camera => "camera",
        }
    }
}

/// A listed record: id plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    /// File stem.
    pub id: String,
    /// Display name from the record (or derived from the id).
    pub name: String,
}

/// Read-only view over a directory of JSON records.
#[derive(Debug, Clone)]
pub struct SpectraStore {
    root: PathBuf,
}

impl SpectraStore {
    /// Opens a store rooted at `root`.
    ///
    /// # Errors
    /// Returns an error if `root` is not a directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::InvalidFormat(format!(
                "data directory {} does not exist",
                root.display()
            )));
        }
        debug!("Opened spectra store at {}", root.display());
        Ok(Self { root })
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ids of all records of `kind`, sorted. A missing subdirectory is empty.
    ///
    /// # Errors
    /// Returns an error if the subdirectory cannot be read.
    pub fn ids(&self, kind: RecordKind) -> Result<Vec<String>> {
        let dir = self.root.join(kind.dir_name());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Lists dyes with their display names. Unreadable records are skipped.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read.
    pub fn list_dyes(&self) -> Result<Vec<StoreEntry>> {
        self.list(RecordKind::Dye, |id, value| {
            decode_dye(id, value).map(|(dye, _)| dye.name)
        })
    }

    /// Lists filters with their display names. Unreadable records are skipped.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read.
    pub fn list_filters(&self) -> Result<Vec<StoreEntry>> {
        self.list(RecordKind::Filter, |id, value| {
            decode_filter(id, value).map(|filter| filter.name)
        })
    }

    /// Lists cameras. Camera names are their ids.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read.
    pub fn list_cameras(&self) -> Result<Vec<StoreEntry>> {
        Ok(self
            .ids(RecordKind::Camera)?
            .into_iter()
            .map(|id| StoreEntry {
                name: id.clone(),
                id,
            })
            .collect())
    }

    /// Loads one dye and its spectra.
    ///
    /// # Errors
    /// [`Error::NotFound`] if no record matches, or a decoding error.
    pub fn dye(&self, id: &str) -> Result<(Dye, DyeSpectra)> {
        let (stem, value) = self.read(RecordKind::Dye, id)?;
        decode_dye(&stem, &value)
    }

    /// Loads one filter.
    ///
    /// # Errors
    /// [`Error::NotFound`] if no record matches, or a decoding error.
    pub fn filter(&self, id: &str) -> Result<Filter> {
        let (stem, value) = self.read(RecordKind::Filter, id)?;
        decode_filter(&stem, &value)
    }

    /// Loads one camera QE curve.
    ///
    /// # Errors
    /// [`Error::NotFound`] if no record matches, or a decoding error.
    pub fn camera(&self, id: &str) -> Result<CameraProfile> {
        let (stem, value) = self.read(RecordKind::Camera, id)?;
        decode_camera(&stem, &value)
    }

    /// Loads spectra for every dye that has a readable record.
    ///
    /// Dyes whose record is missing or malformed are left out of the map
    /// with a warning; the matrix gives them a zero row.
    #[must_use]
    pub fn load_spectra(&self, dyes: &[Dye]) -> SpectraMap {
        let mut spectra = SpectraMap::with_capacity(dyes.len());
        for dye in dyes {
            match self.dye(&dye.id) {
                Ok((_, record)) => {
                    spectra.insert(dye.id.clone(), record);
                }
                Err(e) => warn!("No spectra for dye {}: {e}", dye.id),
            }
        }
        debug!("Loaded spectra for {} of {} dyes", spectra.len(), dyes.len());
        spectra
    }

    fn list(
        &self,
        kind: RecordKind,
        name_of: impl Fn(&str, &Value) -> Result<String>,
    ) -> Result<Vec<StoreEntry>> {
        let mut entries = Vec::new();
        for id in self.ids(kind)? {
            let path = self.path_for(kind, &id);
            match read_json(&path).and_then(|value| name_of(&id, &value)) {
                Ok(name) => entries.push(StoreEntry { id, name }),
                Err(e) => warn!("Skipping {}: {e}", path.display()),
            }
        }
        Ok(entries)
    }

    fn read(&self, kind: RecordKind, id: &str) -> Result<(String, Value)> {
        let stem = self.resolve(kind, id)?;
        let value = read_json(&self.path_for(kind, &stem))?;
        Ok((stem, value))
    }

    fn resolve(&self, kind: RecordKind, id: &str) -> Result<String> {
        if self.path_for(kind, id).is_file() {
            return Ok(id.to_string());
        }
        self.ids(kind)?
            .into_iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(id))
            .ok_or_else(|| Error::NotFound {
                kind: kind.label(),
                id: id.to_string(),
            })
    }

    fn path_for(&self, kind: RecordKind, id: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(format!("{id}.json"))
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
