//! CSV loader for city trip datasets.

use std::io;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::config::DatasetConfig;
use crate::error::{Error, Result};
use crate::filter::City;
use crate::table::{Column, Trip, TripTable};

/// Columns every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Start Time",
    "End Time",
    "Start Station",
    "End Station",
    "User Type",
];

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A single row deserialized from a city CSV. Unlisted columns are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time", deserialize_with = "de_timestamp")]
    start_time: NaiveDateTime,
    #[serde(rename = "End Time", deserialize_with = "de_timestamp")]
    end_time: NaiveDateTime,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type")]
    user_type: String,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl From<RawTrip> for Trip {
    fn from(raw: RawTrip) -> Self {
        Trip::new(
            raw.start_time,
            raw.end_time,
            raw.start_station,
            raw.end_station,
            raw.user_type,
        )
        .with_gender(raw.gender.filter(|g| !g.trim().is_empty()))
        .with_birth_year(
            raw.birth_year
                .filter(|y| y.is_finite())
                .map(|y| y.trunc() as i32),
        )
    }
}

/// Parses a start/end timestamp such as `2017-01-01 09:07:57`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn de_timestamp<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("'{s}' is not a valid timestamp")))
}

/// Loads the dataset configured for `city`.
///
/// # Errors
///
/// Returns [`Error::DataUnavailable`] if the file is missing or any row is malformed.
pub fn load_city(config: &DatasetConfig, city: City) -> Result<TripTable> {
    let path = config.resolve(city);
    info!(city = %city, path = %path.display(), "Loading dataset");
    load_csv(&path)
}

/// Loads a trip table from a CSV file.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_csv(path: &Path) -> Result<TripTable> {
    let file = std::fs::File::open(path).map_err(|e| Error::data_unavailable(path, e))?;
    let table = from_reader(file, path)?;
    info!(rows = table.len(), "Dataset loaded");
    Ok(table)
}

/// Reads trips from any CSV source. `source` is only used in error messages.
pub fn from_reader<R: io::Read>(reader: R, source: &Path) -> Result<TripTable> {
    // Header cells are trimmed so detection and serde agree on column names.
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| Error::data_unavailable(source, e))?
        .clone();
    let has = |name: &str| headers.iter().any(|h| h == name);

    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !has(c)) {
        return Err(Error::data_unavailable(
            source,
            format!("missing required column '{missing}'"),
        ));
    }

    let columns: Vec<Column> = [Column::Gender, Column::BirthYear]
        .into_iter()
        .filter(|c| has(c.header()))
        .collect();
    debug!(?columns, "Optional columns detected");

    let mut trips = Vec::new();
    for result in rdr.deserialize() {
        let raw: RawTrip = result.map_err(|e| Error::data_unavailable(source, e))?;
        trips.push(Trip::from(raw));
    }

    Ok(TripTable::new(trips, columns))
}
