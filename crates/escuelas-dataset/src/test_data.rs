//! Fixture generation for tests across the workspace.
//!
//! Produces small but realistic slices of the schools dataset, both as
//! in-memory frames and as temporary parquet/geojson files.

use std::io::Write;

use polars::prelude::*;
use serde_json::json;
use tempfile::NamedTempFile;
use tracing::info;

use crate::{Result, schema};

/// Configuration for test data generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Number of rows to generate
    pub rows: usize,
    /// Whether to expand the base rows into a larger realistic set
    pub realistic_data: bool,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self {
            rows: 50,
            realistic_data: true,
        }
    }
}

impl TestDataConfig {
    /// Minimal data for unit tests
    pub fn minimal() -> Self {
        Self {
            rows: BASE_ROWS.len(),
            realistic_data: false,
        }
    }

    /// Sample data for integration tests
    pub fn sample() -> Self {
        Self {
            rows: 50,
            realistic_data: true,
        }
    }
}

// (code, state, municipality, locality, school name, latitude, longitude)
type BaseRow = (
    &'static str,
    &'static str,
    Option<&'static str>,
    Option<&'static str>,
    &'static str,
    f64,
    f64,
);

const BASE_ROWS: [BaseRow; 10] = [
    (
        "20DPR0132K",
        "Oaxaca",
        Some("Oaxaca de Juárez"),
        Some("Centro"),
        "PRIMARIA BENITO JUAREZ",
        17.0654,
        -96.7266,
    ),
    (
        "20DPR0455X",
        "Oaxaca",
        Some("Oaxaca de Juárez"),
        Some("San Felipe del Agua"),
        "PRIMARIA IGNACIO ZARAGOZA",
        17.0892,
        -96.7134,
    ),
    (
        "20DJN0218Q",
        "Oaxaca",
        Some("Santa Cruz Xoxocotlán"),
        None,
        "JARDIN DE NIÑOS ROSAURA ZAPATA",
        17.0261,
        -96.7330,
    ),
    (
        "14DPR2133F",
        "Jalisco",
        Some("Guadalajara"),
        Some("Centro"),
        "PRIMARIA NIÑOS HEROES",
        20.6767,
        -103.3475,
    ),
    (
        "14DES0041M",
        "Jalisco",
        Some("Zapopan"),
        Some("Ciudad Granja"),
        "SECUNDARIA TECNICA 58",
        20.7214,
        -103.4304,
    ),
    (
        "09DPR1385W",
        "Ciudad de México",
        Some("Coyoacán"),
        Some("Del Carmen"),
        "PRIMARIA REPUBLICA DE CHILE",
        19.3467,
        -99.1617,
    ),
    (
        "09DJN0723B",
        "Ciudad de México",
        None,
        None,
        "JARDIN DE NIÑOS XOCHICALLI",
        19.4326,
        -99.1332,
    ),
    (
        "19DPR0871C",
        "Nuevo León",
        Some("Monterrey"),
        Some("Centro"),
        "PRIMARIA PROFR. MOISES SAENZ",
        25.6866,
        -100.3161,
    ),
    (
        "31DPR0654T",
        "Yucatán",
        Some("Mérida"),
        Some("Itzimná"),
        "PRIMARIA FELIPE CARRILLO PUERTO",
        20.9674,
        -89.5926,
    ),
    (
        "31DJN0112J",
        "Yucatán",
        Some("Valladolid"),
        None,
        "JARDIN DE NIÑOS SOR JUANA INES",
        20.6896,
        -88.2011,
    ),
];

/// Build an in-memory schools frame.
///
/// Minimal configs repeat the base rows verbatim; realistic configs expand
/// them with per-row code suffixes and small coordinate offsets so the
/// values stay unique.
pub fn test_frame(config: &TestDataConfig) -> Result<DataFrame> {
    info!("Creating test frame with config: {:?}", config);

    let rows = config.rows.max(1);

    let mut codes: Vec<String> = Vec::with_capacity(rows);
    let mut states: Vec<Option<String>> = Vec::with_capacity(rows);
    let mut municipalities: Vec<Option<String>> = Vec::with_capacity(rows);
    let mut localities: Vec<Option<String>> = Vec::with_capacity(rows);
    let mut school_names: Vec<String> = Vec::with_capacity(rows);
    let mut latitudes: Vec<f64> = Vec::with_capacity(rows);
    let mut longitudes: Vec<f64> = Vec::with_capacity(rows);

    for i in 0..rows {
        let (code, state, municipality, locality, school, lat, lon) =
            BASE_ROWS[i % BASE_ROWS.len()];
        let cycle = i / BASE_ROWS.len();

        if config.realistic_data && cycle > 0 {
            codes.push(format!("{code}-{cycle}"));
            school_names.push(format!("{school} {cycle}"));
            latitudes.push(lat + cycle as f64 * 0.013);
            longitudes.push(lon + cycle as f64 * 0.017);
        } else {
            codes.push(code.to_string());
            school_names.push(school.to_string());
            latitudes.push(lat);
            longitudes.push(lon);
        }
        states.push(Some(state.to_string()));
        municipalities.push(municipality.map(str::to_string));
        localities.push(locality.map(str::to_string));
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

/// Write a test frame to a temporary parquet file.
pub fn create_test_parquet_file(config: &TestDataConfig) -> Result<NamedTempFile> {
    let mut df = test_frame(config)?;
    let temp = NamedTempFile::new()?;
    let mut file = std::fs::File::create(temp.path())?;
    ParquetWriter::new(&mut file).finish(&mut df)?;
    Ok(temp)
}

/// Write a test frame as a geojson feature collection (UTF-8 clean).
pub fn create_test_geojson_file(config: &TestDataConfig) -> Result<NamedTempFile> {
    let df = test_frame(config)?;

    let codes = df.column(schema::CODE)?.str()?;
    let states = df.column(schema::STATE)?.str()?;
    let municipalities = df.column(schema::MUNICIPALITY)?.str()?;
    let localities = df.column(schema::LOCALITY)?.str()?;
    let school_names = df.column(schema::SCHOOL_NAME)?.str()?;
    let latitudes = df.column(schema::LATITUDE)?.f64()?;
    let longitudes = df.column(schema::LONGITUDE)?.f64()?;

    let features: Vec<_> = (0..df.height())
        .map(|i| {
            json!({
                "geometry": {
                    "type": "Point",
                    "coordinates": [longitudes.get(i), latitudes.get(i)],
                },
                "properties": {
                    "name": codes.get(i),
                    "nombre_entidad": states.get(i),
                    "nombre_municipio": municipalities.get(i),
                    "nombre_localidad": localities.get(i),
                    "nombre_de_centro_de_trabajo": school_names.get(i),
                },
            })
        })
        .collect();
    let collection = json!({"type": "FeatureCollection", "features": features});

    let mut temp = NamedTempFile::new()?;
    temp.write_all(serde_json::to_string(&collection)?.as_bytes())?;
    temp.flush()?;
    Ok(temp)
}

/// A small feature collection with latin1-encoded accents in the payload.
pub fn create_latin1_geojson_file() -> Result<NamedTempFile> {
    let mut temp = NamedTempFile::new()?;
    // "Yucat\xe1n" and "M\xe9rida": latin1 single-byte accents, invalid UTF-8.
    temp.write_all(
        b"{\"type\": \"FeatureCollection\", \"features\": [
            {\"geometry\": {\"type\": \"Point\", \"coordinates\": [-89.5926, 20.9674]},
             \"properties\": {\"name\": \"31DPR0654T\",
                              \"nombre_entidad\": \"Yucat\xe1n\",
                              \"nombre_municipio\": \"M\xe9rida\",
                              \"nombre_localidad\": \"Itzimn\xe1\",
                              \"nombre_de_centro_de_trabajo\": \"PRIMARIA FELIPE CARRILLO PUERTO\"}}
        ]}",
    )?;
    temp.flush()?;
    Ok(temp)
}

/// A payload neither parquet nor geojson can make sense of.
pub fn create_unparseable_file() -> Result<NamedTempFile> {
    let mut temp = NamedTempFile::new()?;
    temp.write_all(b"\x00\x01\x02\x03 definitely not a dataset")?;
    temp.flush()?;
    Ok(temp)
}
