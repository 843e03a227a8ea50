//! Fallback parse: a geojson `FeatureCollection` of point features.

use std::{borrow::Cow, path::Path};

use polars::prelude::*;
use serde::Deserialize;
use tracing::warn;

use crate::{Result, schema};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    name: Option<String>,
    nombre_entidad: Option<String>,
    nombre_municipio: Option<String>,
    nombre_localidad: Option<String>,
    nombre_de_centro_de_trabajo: Option<String>,
}

pub(super) fn read_feature_collection(path: &Path) -> Result<DataFrame> {
    let bytes = std::fs::read(path)?;
    let text = decode_permissive(&bytes);
    let collection: FeatureCollection = serde_json::from_str(&text)?;
    frame_from_features(collection)
}

/// Decode as UTF-8 when clean, otherwise as lossy latin1.
///
/// The fallback payload is known to carry latin1 bytes in the wild;
/// undecodable content is replaced, never fatal.
fn decode_permissive(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            warn!("Dataset payload is not valid UTF-8, decoding permissively as latin1");
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            Cow::Owned(text.into_owned())
        }
    }
}

fn frame_from_features(collection: FeatureCollection) -> Result<DataFrame> {
    let total = collection.features.len();

    let mut codes: Vec<Option<String>> = Vec::with_capacity(total);
    let mut states: Vec<Option<String>> = Vec::with_capacity(total);
    let mut municipalities: Vec<Option<String>> = Vec::with_capacity(total);
    let mut localities: Vec<Option<String>> = Vec::with_capacity(total);
    let mut school_names: Vec<Option<String>> = Vec::with_capacity(total);
    let mut latitudes: Vec<f64> = Vec::with_capacity(total);
    let mut longitudes: Vec<f64> = Vec::with_capacity(total);

    let mut skipped = 0usize;
    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            skipped += 1;
            continue;
        };
        // Coordinates are geojson order: [longitude, latitude].
        if geometry.kind != "Point" || geometry.coordinates.len() < 2 {
            skipped += 1;
            continue;
        }
        longitudes.push(geometry.coordinates[0]);
        latitudes.push(geometry.coordinates[1]);

        let properties = feature.properties;
        codes.push(properties.name);
        states.push(properties.nombre_entidad);
        municipalities.push(properties.nombre_municipio);
        localities.push(properties.nombre_localidad);
        school_names.push(properties.nombre_de_centro_de_trabajo);
    }

    if skipped > 0 {
        warn!(skipped, total, "Dropped features without a usable point geometry");
    }

    df!(
        schema::CODE => codes,
        schema::STATE => states,
        schema::MUNICIPALITY => municipalities,
        schema::LOCALITY => localities,
        schema::SCHOOL_NAME => school_names,
        schema::LATITUDE => latitudes,
        schema::LONGITUDE => longitudes,
    )
    .map_err(From::from)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::tests_utils::*;

    #[test]
    fn test_non_point_features_are_dropped() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type": "FeatureCollection", "features": [
                {{"geometry": {{"type": "Point", "coordinates": [-96.7266, 17.0654]}},
                  "properties": {{"name": "20DPR0123K", "nombre_entidad": "Oaxaca"}}}},
                {{"geometry": {{"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}},
                  "properties": {{"name": "IGNORED"}}}},
                {{"geometry": null, "properties": {{"name": "ALSO_IGNORED"}}}}
            ]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let df = read_feature_collection(file.path()).unwrap();

        assert_eq!(df.height(), 1);
        assert_has_columns(&df, &schema::REQUIRED_COLUMNS);
        let codes: Vec<Option<&str>> = df
            .column(schema::CODE)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(codes, vec![Some("20DPR0123K")]);
    }

    #[test]
    fn test_empty_feature_collection_yields_empty_frame() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"type": "FeatureCollection", "features": []}}"#).unwrap();
        file.flush().unwrap();

        let df = read_feature_collection(file.path()).unwrap();
        assert_eq!(df.height(), 0);
        assert_has_columns(&df, &schema::REQUIRED_COLUMNS);
    }

    #[test]
    fn test_object_without_features_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        file.flush().unwrap();

        assert!(read_feature_collection(file.path()).is_err());
    }

    #[test]
    fn test_decode_permissive_passes_utf8_through() {
        let text = decode_permissive("Mérida".as_bytes());
        assert_eq!(text, "Mérida");
    }

    #[test]
    fn test_decode_permissive_recovers_latin1() {
        // "Mérida" with the é encoded as the single latin1 byte 0xE9.
        let bytes = b"M\xe9rida";
        let text = decode_permissive(bytes);
        assert_eq!(text, "Mérida");
    }
}
