//! Result structures produced by the reports.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::Result;

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeReport {
    pub most_common_month: String,
    pub most_common_day: String,
    pub most_common_hour: u32,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationReport {
    pub most_common_start_station: String,
    pub most_common_end_station: String,
    pub most_common_trip: String,
}

/// Total and average trip duration. Serialized in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationReport {
    pub trips: usize,
    #[serde(rename = "total_seconds", serialize_with = "as_seconds")]
    pub total: TimeDelta,
    #[serde(rename = "mean_seconds", serialize_with = "as_seconds")]
    pub mean: TimeDelta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    /// Oldest rider.
    pub earliest: i32,
    /// Youngest rider.
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider breakdown. Gender and birth-year sections exist only when the
/// dataset carries those columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserReport {
    pub user_types: BTreeMap<String, usize>,
    pub subscribers: usize,
    pub customers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<GenderCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<BirthYearStats>,
}

/// All four reports for one filtered table. Each report fails on its own.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub city: String,
    pub month: String,
    pub day: String,
    pub rows: usize,
    #[serde(serialize_with = "outcome")]
    pub time: Result<TimeReport>,
    #[serde(serialize_with = "outcome")]
    pub stations: Result<StationReport>,
    #[serde(serialize_with = "outcome")]
    pub duration: Result<DurationReport>,
    #[serde(serialize_with = "outcome")]
    pub users: Result<UserReport>,
}

impl Summary {
    /// Number of reports that ended in an error.
    pub fn failed_reports(&self) -> usize {
        [
            self.time.is_err(),
            self.stations.is_err(),
            self.duration.is_err(),
            self.users.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

fn as_seconds<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    let seconds = delta
        .num_microseconds()
        .map_or(delta.num_milliseconds() as f64 / 1e3, |us| us as f64 / 1e6);
    serializer.serialize_f64(seconds)
}

fn outcome<T: Serialize, S: Serializer>(
    report: &Result<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match report {
        Ok(value) => value.serialize(serializer),
        Err(e) => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("error", &e.to_string())?;
            map.end()
        }
    }
}
