use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use dyeplex_core::{Dye, FilterKind, FilterOrder};
use dyeplex_engine::{
    compute_crosstalk, reorder_and_normalize, CrosstalkInputs, NormalizationMode, PipelineConfig,
};
use dyeplex_io::{write_table_csv, Settings, SettingsStore, SpectraStore};
use tempfile::tempdir;

fn write(root: &Path, dir: &str, id: &str, body: &str) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{id}.json")), body).unwrap();
}

fn seed(root: &Path) {
    write(
        root,
        "dyes",
        "fam_10",
        r#"{"emission": [[500, 0], [520, 100], [540, 0]], "brightness_coefficient": 0.9}"#,
    );
    write(
        root,
        "dyes",
        "hex_11",
        r#"{"data": {"hex_11": {
            "info": {"name": "HEX", "brightness_coefficient": 0.45},
            "emission": {"": [{"x": "540", "y": "0"}, {"x": "556", "y": "100"}, {"x": "572", "y": "0"}]}
        }}}"#,
    );
    write(
        root,
        "filters",
        "fam_em",
        r#"{"name": "FAM-em", "filterType": "emission",
            "profile": [[510, 0], [520, 100], [530, 0]]}"#,
    );
    write(
        root,
        "filters",
        "hex_em",
        r#"{"filterType": "Emission", "profile": [[545, 0], [546, 100], [566, 100], [567, 0]]}"#,
    );
    write(
        root,
        "filters",
        "blue_ex",
        r#"{"filterType": "excitation", "profile": [[450, 100], [490, 100]]}"#,
    );
    write(root, "cameras", "flat", r#"{"qe": [[400, 100], [800, 100]]}"#);
}

#[test]
fn test_store_to_table() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let store = SpectraStore::open(dir.path()).unwrap();

    let dyes: Vec<Dye> = store
        .list_dyes()
        .unwrap()
        .into_iter()
        .map(|entry| Dye::new(entry.id, entry.name))
        .collect();
    assert_eq!(dyes[0].name, "Fam");
    assert_eq!(dyes[1].name, "HEX");

    let filters: Vec<_> = ["fam_em", "HEX_EM", "blue_ex"]
        .iter()
        .map(|id| store.filter(id).unwrap())
        .collect();
    assert_eq!(filters[1].id, "hex_em");
    assert_eq!(filters[1].name, "Hex Em");
    assert_eq!(filters[2].kind, FilterKind::Excitation);

    let spectra = store.load_spectra(&dyes);
    let camera = store.camera("flat").unwrap();
    let inputs = CrosstalkInputs {
        dyes: &dyes,
        filters: &filters,
        spectra: Some(&spectra),
        camera: Some(&camera),
    };

    let result = compute_crosstalk(inputs, &PipelineConfig::new());
    assert_eq!(result.matrix.num_filters(), 2);
    assert_relative_eq!(result.matrix.get(0, 0).unwrap(), 100.0);
    assert_relative_eq!(result.matrix.get(0, 1).unwrap(), 0.0);

    let config = PipelineConfig::new().with_normalization_dye("fam_10");
    let scaled = compute_crosstalk(inputs, &config);
    assert_relative_eq!(
        scaled.matrix.get(1, 1).unwrap(),
        2.0 * result.matrix.get(1, 1).unwrap(),
        max_relative = 1e-12
    );

    let presented = reorder_and_normalize(
        &result.matrix,
        &FilterOrder::from_indices(vec![1, 0]).unwrap(),
        NormalizationMode::PerColumn,
    );
    let mut out = Vec::new();
    write_table_csv(&mut out, &dyes, &result.columns, &presented).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Dye \\ Filter,Hex Em,FAM-em,Row Sum\n"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_missing_dye_record_gives_zero_row() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let store = SpectraStore::open(dir.path()).unwrap();

    let dyes = vec![Dye::new("fam_10", "FAM"), Dye::new("cy5", "Cy5")];
    let spectra = store.load_spectra(&dyes);
    assert_eq!(spectra.len(), 1);

    let filters = vec![store.filter("fam_em").unwrap()];
    let result = compute_crosstalk(
        CrosstalkInputs {
            dyes: &dyes,
            filters: &filters,
            spectra: Some(&spectra),
            camera: None,
        },
        &PipelineConfig::new(),
    );
    assert_eq!(result.matrix.num_dyes(), 2);
    assert_relative_eq!(result.matrix.get(1, 0).unwrap(), 0.0);
}

#[test]
fn test_settings_round_trip_with_store_records() {
    let dir = tempdir().unwrap();
    seed(dir.path());
    let store = SpectraStore::open(dir.path()).unwrap();

    let settings = Settings {
        selected_dyes: vec![Dye::new("hex_11", "HEX")],
        filters: vec![store.filter("hex_em").unwrap()],
        normalization_dye_id: Some("hex_11".into()),
        ..Settings::default()
    };
    let settings_store = SettingsStore::new(dir.path().join("settings.json"));
    settings_store.save(&settings).unwrap();
    assert_eq!(settings_store.load().unwrap(), settings);
}
