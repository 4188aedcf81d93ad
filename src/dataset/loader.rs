//! CSV and JSON dataset parsing.

use super::{Dataset, DatasetError};
use crate::models::ClimateRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// On-disk or on-the-wire dataset format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            _ => Err(DatasetError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Detect the format from an HTTP content type. CSV unless JSON is named.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.to_lowercase().contains("json") => DataFormat::Json,
            _ => DataFormat::Csv,
        }
    }
}

/// Normalize a header name and map known aliases to canonical columns.
pub fn normalize_column(raw: &str) -> String {
    let name = raw
        .trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace([' ', '-'], "_");

    let canonical = match name.as_str() {
        "damage" | "damages" | "damage_usd" | "economic_damage" => "damage_cost",
        "co2" | "emissions" | "co2_emission" => "co2_emissions",
        "gdp_usd" => "gdp",
        "event" | "hazard" | "disaster_type" => "event_type",
        other => other,
    };

    canonical.to_string()
}

/// Parse CSV rows from a reader.
pub fn parse_csv<R: Read>(source: &str, reader: R) -> Result<Dataset, DatasetError> {
    let csv_error = |e: csv::Error| DatasetError::Csv {
        dataset: source.to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let raw_headers = reader.headers().map_err(csv_error)?.clone();
    let mut headers = csv::StringRecord::new();
    for header in raw_headers.iter() {
        headers.push_field(&normalize_column(header));
    }
    reader.set_headers(headers.clone());

    let mut records = Vec::new();
    for row in reader.deserialize::<ClimateRecord>() {
        records.push(row.map_err(csv_error)?);
    }

    Ok(Dataset {
        source: source.to_string(),
        columns: headers.iter().map(String::from).collect(),
        records,
    })
}

/// JSON datasets are either a bare array or an object with a `records` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    Records(Vec<ClimateRecord>),
    Wrapped { records: Vec<ClimateRecord> },
}

/// Parse a JSON dataset.
pub fn parse_json(source: &str, bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let payload: JsonPayload =
        serde_json::from_slice(bytes).map_err(|e| DatasetError::Json {
            dataset: source.to_string(),
            source: e,
        })?;

    let records = match payload {
        JsonPayload::Records(records) | JsonPayload::Wrapped { records } => records,
    };

    let columns = ClimateRecord::COLUMNS
        .iter()
        .filter(|name| records.iter().any(|r| r.present_columns().contains(name)))
        .map(|name| name.to_string())
        .collect();

    Ok(Dataset {
        source: source.to_string(),
        columns,
        records,
    })
}

/// Parse an in-memory dataset of a known format.
pub fn parse_bytes(source: &str, format: DataFormat, bytes: &[u8]) -> Result<Dataset, DatasetError> {
    match format {
        DataFormat::Csv => parse_csv(source, bytes),
        DataFormat::Json => parse_json(source, bytes),
    }
}

/// Read and parse a single dataset file.
pub fn load_file(path: &Path) -> Result<Dataset, DatasetError> {
    let format = DataFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_bytes(&path.display().to_string(), format, &bytes)
}
