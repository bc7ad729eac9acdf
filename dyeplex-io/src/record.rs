//! Decoding of dye, filter and camera JSON records.
//!
//! Curves arrive either as `[wavelength, value]` pairs or as `{x, y}`
//! objects, with coordinates given as numbers or numeric strings. Every
//! point is normalized to a `(wavelength, value)` tuple here, before it
//! reaches the engine; anything else is rejected with the offending index.

use dyeplex_core::{CameraProfile, Dye, DyeSpectra, Filter, FilterKind, SpectralCurve};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// One coordinate: a number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Coord {
    Number(f64),
    Text(String),
}

impl Coord {
    fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Accepted point shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePoint {
    Pair([Coord; 2]),
    Object { x: Coord, y: Coord },
}

impl WirePoint {
    fn to_tuple(&self) -> Option<(f64, f64)> {
        let (wl, value) = match self {
            Self::Pair([wl, value]) => (wl, value),
            Self::Object { x, y } => (x, y),
        };
        Some((wl.to_f64()?, value.to_f64()?))
    }
}

/// Decodes a JSON array of points into a curve.
///
/// # Errors
/// [`Error::InvalidFormat`] if `value` is not an array,
/// [`Error::UnrecognizedPoint`] for the first point of unknown shape or with
/// a non-numeric coordinate.
pub fn decode_curve(value: &Value) -> Result<SpectralCurve> {
    let Value::Array(items) = value else {
        return Err(Error::InvalidFormat(format!(
            "expected an array of points, found {}",
            json_kind(value)
        )));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            WirePoint::deserialize(item)
                .ok()
                .and_then(|point| point.to_tuple())
                .ok_or_else(|| Error::UnrecognizedPoint {
                    index,
                    value: item.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()
        .map(SpectralCurve::new)
}

/// Decodes a dye record.
///
/// Spectra are read from top-level `emission`/`excitation` arrays, or from
/// the legacy layout `data.<id>.emission[""]`. The brightness coefficient
/// is read from the top level, then from `data.<k>.info`.
///
/// # Errors
/// Returns an error if the record is not an object or a curve is malformed.
pub fn decode_dye(id: &str, record: &Value) -> Result<(Dye, DyeSpectra)> {
    let Value::Object(map) = record else {
        return Err(Error::InvalidFormat(format!("dye {id}: expected an object")));
    };
    let entries = map.get("data").and_then(Value::as_object);
    let nested = entries.and_then(|data| {
        data.get(id)
            .or_else(|| data.values().next())
            .and_then(Value::as_object)
    });

    let emission = spectrum_field(map, nested, "emission")?;
    let excitation = spectrum_field(map, nested, "excitation")?;

    let infos = || {
        entries
            .into_iter()
            .flat_map(Map::values)
            .filter_map(|entry| entry.get("info"))
    };
    let brightness_coefficient = map
        .get("brightness_coefficient")
        .and_then(Value::as_f64)
        .or_else(|| {
            infos().find_map(|info| info.get("brightness_coefficient").and_then(Value::as_f64))
        });

    let name = infos()
        .next()
        .and_then(|info| info.get("name"))
        .or_else(|| map.get("name"))
        .and_then(Value::as_str)
        .map_or_else(|| humanize_dye_id(id), str::to_string);

    let spectra = DyeSpectra {
        emission,
        excitation,
        brightness_coefficient,
    };
    Ok((Dye::new(id, name), spectra))
}

/// Decodes a filter record `{name?, profile, filterType?}`.
///
/// # Errors
/// Returns an error if the record is not an object or the profile is malformed.
pub fn decode_filter(id: &str, record: &Value) -> Result<Filter> {
    let Value::Object(map) = record else {
        return Err(Error::InvalidFormat(format!("filter {id}: expected an object")));
    };
    let transmission = match map.get("profile") {
        Some(profile) => decode_curve(profile)?,
        None => SpectralCurve::empty(),
    };
    let kind = map
        .get("filterType")
        .and_then(Value::as_str)
        .map_or(FilterKind::Unspecified, FilterKind::from_label);
    let name = map
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| title_case(&id.replace('_', " ")), str::to_string);
    Ok(Filter::new(id, name, transmission, kind))
}

/// Decodes a camera QE record: a point array, or an object with a `qe` array.
///
/// # Errors
/// Returns an error for any other shape or a malformed point.
pub fn decode_camera(id: &str, record: &Value) -> Result<CameraProfile> {
    let points = match record {
        Value::Object(map) => map.get("qe").ok_or_else(|| {
            Error::InvalidFormat(format!("camera {id}: object without a qe array"))
        })?,
        other => other,
    };
    Ok(CameraProfile::new(id, decode_curve(points)?))
}

fn spectrum_field(
    top: &Map<String, Value>,
    nested: Option<&Map<String, Value>>,
    field: &str,
) -> Result<SpectralCurve> {
    let candidate = top
        .get(field)
        .filter(|v| v.is_array())
        .or_else(|| nested.and_then(|n| n.get(field)))
        .or_else(|| top.get(field));
    match candidate {
        Some(points @ Value::Array(_)) => decode_curve(points),
        // Named spectra: the unnamed ("") one, else the first.
        Some(Value::Object(named)) => match named.get("").or_else(|| named.values().next()) {
            Some(points) => decode_curve(points),
            None => Ok(SpectralCurve::empty()),
        },
        _ => Ok(SpectralCurve::empty()),
    }
}

/// Display name from a dye file stem: text before the first `_`, title-cased.
#[must_use]
pub fn humanize_dye_id(id: &str) -> String {
    let stem = id.split('_').next().unwrap_or(id);
    title_case(stem)
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
