//! dyeplex command-line interface.
//!
//! Computes fluorescence crosstalk tables from a directory of dye, filter
//! and camera records, optionally combined with built-in instrument presets.
#![allow(
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    clippy::manual_let_else,
    clippy::too_many_lines
)]

use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use rayon::prelude::*;

use dyeplex_core::{builtin_instruments, find_builtin, CrosstalkMatrix, Dye, Filter, FilterOrder};
use dyeplex_engine::{
    compute_crosstalk, CrosstalkInputs, CrosstalkSession, NormalizationMode, PipelineConfig,
    PresentedMatrix,
};
use dyeplex_io::{Settings, SettingsStore, SpectraStore, TableWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    DyeplexIo(#[from] dyeplex_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] dyeplex_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

/// Fluorescence crosstalk analysis for dye and filter panels.
#[derive(Parser)]
#[command(name = "dyeplex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Dye selection and the store it is read from.
#[derive(Args, Debug)]
struct Selection {
    /// Data directory with dyes/, filters/ and cameras/ subdirectories
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Dye id (repeatable; rows keep this order)
    #[arg(long = "dye")]
    dyes: Vec<String>,

    /// Camera id whose QE curve weights the signal
    #[arg(long)]
    camera: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and print (or export) a crosstalk table
    Matrix {
        #[command(flatten)]
        selection: Selection,

        /// Filter id from the data directory (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Built-in instrument whose channels are appended to the filters
        #[arg(short, long)]
        preset: Option<String>,

        /// Ignore the camera QE curve
        #[arg(long)]
        no_qe: bool,

        /// Reference dye for brightness normalization
        #[arg(long)]
        normalize_to: Option<String>,

        /// Normalize by the global maximum instead of per column
        #[arg(long)]
        global: bool,

        /// Keep excitation and untyped filters as matrix columns
        #[arg(long)]
        all_filters: bool,

        /// Display order of the matrix columns, e.g. 2,0,1
        #[arg(long, value_delimiter = ',')]
        order: Vec<usize>,

        /// Write the table as CSV to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the presented table as JSON
        #[arg(long)]
        json: bool,

        /// Settings file supplying the selection when none is given
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Write the resulting selection back to the settings file
        #[arg(long, requires = "settings")]
        save: bool,
    },

    /// List built-in instrument presets
    Presets {
        /// Evaluate every preset against the selected dyes
        #[arg(long)]
        compare: bool,

        #[command(flatten)]
        selection: Selection,
    },

    /// Summarize a data directory
    Info {
        /// Data directory
        data_dir: PathBuf,

        /// List every record
        #[arg(short, long)]
        list: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Matrix {
            selection,
            filters,
            preset,
            no_qe,
            normalize_to,
            global,
            all_filters,
            order,
            output,
            json,
            settings,
            save,
        } => {
            let store = open_store(selection.data_dir.as_deref())?;
            let settings_store = settings.map(SettingsStore::new);
            let saved = match &settings_store {
                Some(s) => s.load()?,
                None => Settings::default(),
            };

            let dyes = if selection.dyes.is_empty() {
                saved.selected_dyes.clone()
            } else {
                resolve_dyes(store.as_ref(), &selection.dyes)?
            };

            let mut columns = Vec::new();
            if !filters.is_empty() {
                let store = require_store(store.as_ref(), "--filter")?;
                for id in &filters {
                    columns.push(store.filter(id)?);
                }
            }
            if let Some(name) = &preset {
                let instrument = find_builtin(name).ok_or_else(|| {
                    dyeplex_core::Error::Config(format!("unknown instrument preset: {name}"))
                })?;
                columns.extend(instrument.filters);
            }
            if filters.is_empty() && preset.is_none() {
                columns.clone_from(&saved.filters);
            }

            if dyes.is_empty() || columns.is_empty() {
                return Err(CliError::Usage(
                    "no dyes or filters selected (use --dye/--filter/--preset or --settings)"
                        .to_string(),
                ));
            }

            let camera = match &selection.camera {
                Some(id) => Some(require_store(store.as_ref(), "--camera")?.camera(id)?),
                None => None,
            };
            let reference = normalize_to.or_else(|| saved.normalization_dye_id.clone());

            let mut config = PipelineConfig::new()
                .with_include_qe(!no_qe)
                .with_emission_filters_only(!all_filters)
                .with_mode(if global {
                    NormalizationMode::Global
                } else {
                    NormalizationMode::PerColumn
                });
            if let Some(reference) = &reference {
                config = config.with_normalization_dye(reference.clone());
            }

            let mut session = CrosstalkSession::new(config);
            session.set_dyes(dyes.clone());
            session.set_filters(columns.clone());
            session.set_spectra(store.as_ref().map(|s| s.load_spectra(&dyes)));
            session.set_camera(camera);

            if !order.is_empty() {
                session.set_filter_order(FilterOrder::from_indices(order)?)?;
            }

            let presented = session.present();
            let result = session.result();
            if result.normalized {
                info!(
                    "Brightness normalized to {}",
                    reference.as_deref().unwrap_or_default()
                );
                for dye in &dyes {
                    match result.factors.get(&dye.id).flatten() {
                        Some(factor) => debug!("  {}: x{factor:.4}", dye.name),
                        None => debug!("  {}: brightness unknown, unscaled", dye.name),
                    }
                }
            }
            let matrix_columns = result.columns.clone();

            if let Some(path) = &output {
                let mut writer = TableWriter::create(path)?;
                writer.write_csv(&dyes, &matrix_columns, &presented)?;
                info!("Wrote table to {}", path.display());
            } else if json {
                println!("{}", serde_json::to_string_pretty(&presented)?);
            } else {
                print_table(&dyes, &matrix_columns, &presented);
            }

            if save {
                if let Some(settings_store) = &settings_store {
                    let updated = Settings {
                        selected_dyes: dyes,
                        filters: columns,
                        normalization_dye_id: reference,
                        ..saved
                    };
                    settings_store.save(&updated)?;
                }
            }
        }

        Commands::Presets { compare, selection } => {
            let presets = builtin_instruments();
            if !compare {
                println!(
                    "{:<16} | {:<10} | {:>10} | {:>8}",
                    "Preset", "Category", "Excitation", "Emission"
                );
                println!("{:-<53}", "");
                for preset in &presets {
                    let emission = preset.emission_filters().count();
                    println!(
                        "{:<16} | {:<10} | {:>10} | {:>8}",
                        preset.name,
                        preset.category,
                        preset.filters.len() - emission,
                        emission
                    );
                }
                return Ok(());
            }

            let store = open_store(selection.data_dir.as_deref())?;
            let store = require_store(store.as_ref(), "--compare")?;
            let dyes = resolve_dyes(Some(store), &selection.dyes)?;
            if dyes.is_empty() {
                return Err(CliError::Usage("--compare needs at least one --dye".to_string()));
            }
            let spectra = store.load_spectra(&dyes);
            let camera = match &selection.camera {
                Some(id) => Some(store.camera(id)?),
                None => None,
            };
            let config = PipelineConfig::new();

            let rows: Vec<(String, usize, f64)> = presets
                .par_iter()
                .map(|preset| {
                    let inputs = CrosstalkInputs {
                        dyes: &dyes,
                        filters: &preset.filters,
                        spectra: Some(&spectra),
                        camera: camera.as_ref(),
                    };
                    let result = compute_crosstalk(inputs, &config);
                    (
                        preset.name.clone(),
                        result.columns.len(),
                        max_spillover(&result.matrix),
                    )
                })
                .collect();

            println!("{:<16} | {:>8} | {:>13}", "Preset", "Channels", "Max spillover");
            println!("{:-<43}", "");
            for (name, channels, spillover) in rows {
                println!("{:<16} | {:>8} | {:>12.1}%", name, channels, spillover * 100.0);
            }
        }

        Commands::Info { data_dir, list } => {
            let store = SpectraStore::open(&data_dir)?;
            let dyes = store.list_dyes()?;
            let filters = store.list_filters()?;
            let cameras = store.list_cameras()?;

            println!("Data directory: {}", store.root().display());
            println!("Dyes: {}", dyes.len());
            println!("Filters: {}", filters.len());
            println!("Cameras: {}", cameras.len());

            if list {
                let sections = [("Dyes", &dyes), ("Filters", &filters), ("Cameras", &cameras)];
                for (label, entries) in sections {
                    if entries.is_empty() {
                        continue;
                    }
                    println!("\n{label}:");
                    for entry in entries {
                        println!("  {:<32} {}", entry.id, entry.name);
                    }
                }
            }
        }
    }

    Ok(())
}

fn open_store(data_dir: Option<&Path>) -> Result<Option<SpectraStore>> {
    Ok(data_dir.map(SpectraStore::open).transpose()?)
}

fn require_store<'a>(store: Option<&'a SpectraStore>, flag: &str) -> Result<&'a SpectraStore> {
    store.ok_or_else(|| CliError::Usage(format!("{flag} requires --data-dir")))
}

fn resolve_dyes(store: Option<&SpectraStore>, ids: &[String]) -> Result<Vec<Dye>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let store = require_store(store, "--dye")?;
    ids.iter()
        .map(|id| -> Result<Dye> { Ok(store.dye(id)?.0) })
        .collect()
}

/// Largest ratio of a dye's second-strongest channel to its strongest.
fn max_spillover(matrix: &CrosstalkMatrix) -> f64 {
    matrix
        .rows()
        .iter()
        .filter_map(|row| {
            let mut cells = row.clone();
            cells.sort_by(|a, b| b.total_cmp(a));
            match cells.as_slice() {
                [primary, second, ..] if *primary > 0.0 => Some(second / primary),
                _ => None,
            }
        })
        .fold(0.0, f64::max)
}

fn print_table(dyes: &[Dye], columns: &[Filter], presented: &PresentedMatrix) {
    let headers: Vec<&str> = presented
        .columns
        .iter()
        .filter_map(|&j| columns.get(j))
        .map(|f| f.name.as_str())
        .collect();
    let name_width = dyes
        .iter()
        .map(|d| d.name.len())
        .chain(std::iter::once("Col Sum".len()))
        .max()
        .unwrap_or(0);
    let cell_width = headers
        .iter()
        .map(|h| h.len())
        .chain(std::iter::once("Row Sum".len()))
        .max()
        .unwrap_or(0);

    print!("{:<name_width$}", "Dye");
    for header in &headers {
        print!(" | {header:>cell_width$}");
    }
    println!(" | {:>cell_width$}", "Row Sum");
    println!("{:-<1$}", "", name_width + (headers.len() + 1) * (cell_width + 3));

    for ((dye, row), row_sum) in dyes.iter().zip(&presented.ordered).zip(&presented.row_sums) {
        print!("{:<name_width$}", dye.name);
        for value in row {
            print!(" | {value:>cell_width$.3}");
        }
        println!(" | {row_sum:>cell_width$.3}");
    }

    print!("{:<name_width$}", "Col Sum");
    for value in &presented.col_sums {
        print!(" | {value:>cell_width$.3}");
    }
    println!(" | {:>cell_width$.3}", presented.total);
}
