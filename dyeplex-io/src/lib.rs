//! dyeplex-io: Data boundary for dyeplex.
//!
//! This crate decodes dye, filter and camera records into the core data
//! model, serves them from a directory store, persists user settings and
//! exports presented tables.
//!

mod error;
pub mod record;
pub mod settings;
pub mod store;
mod writer;

pub use error::{Error, Result};
pub use record::{decode_camera, decode_curve, decode_dye, decode_filter};
pub use settings::{Settings, SettingsStore};
pub use store::{RecordKind, SpectraStore, StoreEntry};
pub use writer::{write_table_csv, TableWriter};
