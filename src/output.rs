//! Output formatting and persistence for trip summaries.
//!
//! Supports console text, pretty-printing, JSON serialization, CSV append
//! and paged display of raw trip rows.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::filter::weekday_name;
use crate::reports::Summary;
use crate::table::Trip;

const RULE_WIDTH: usize = 40;

/// Logs a summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &Summary) {
    debug!("{:#?}", summary);
}

/// Pretty-printed JSON for a summary.
pub fn to_json(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Logs a summary as pretty-printed JSON.
pub fn print_json(summary: &Summary) -> Result<()> {
    info!("{}", to_json(summary)?);
    Ok(())
}

/// Formats a duration the way pandas prints a timedelta: `1 days 02:03:04`.
///
/// Sub-second parts are shown as microseconds only when non-zero.
pub fn format_duration(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let delta = delta.abs();

    let days = delta.num_days();
    let secs = delta.num_seconds() - days * 86_400;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let micros = delta.subsec_nanos() / 1_000;

    if micros == 0 {
        format!("{sign}{days} days {h:02}:{m:02}:{s:02}")
    } else {
        format!("{sign}{days} days {h:02}:{m:02}:{s:02}.{micros:06}")
    }
}

/// Writes the four reports as console sentences. Failed reports print their error.
pub fn write_text<W: Write>(out: &mut W, summary: &Summary) -> std::io::Result<()> {
    let rule = "-".repeat(RULE_WIDTH);
    writeln!(
        out,
        "City: {}  Month: {}  Day: {}  ({} trips)",
        summary.city, summary.month, summary.day, summary.rows
    )?;
    writeln!(out, "{rule}")?;

    writeln!(out, "\nThe Most Frequent Times of Travel\n")?;
    match &summary.time {
        Ok(t) => {
            writeln!(out, "The most common month is {}.", t.most_common_month)?;
            writeln!(out, "The most common day of the week is {}.", t.most_common_day)?;
            writeln!(out, "The most common start hour is {}.", t.most_common_hour)?;
        }
        Err(e) => writeln!(out, "{e}")?,
    }
    writeln!(out, "{rule}")?;

    writeln!(out, "\nThe Most Popular Stations and Trip\n")?;
    match &summary.stations {
        Ok(s) => {
            writeln!(
                out,
                "The most commonly used starting point is {}.",
                s.most_common_start_station
            )?;
            writeln!(
                out,
                "The most commonly used ending point is {}.",
                s.most_common_end_station
            )?;
            writeln!(
                out,
                "The most common trip (Start to End) is {}.",
                s.most_common_trip
            )?;
        }
        Err(e) => writeln!(out, "{e}")?,
    }
    writeln!(out, "{rule}")?;

    writeln!(out, "\nTrip Duration\n")?;
    match &summary.duration {
        Ok(d) => {
            writeln!(
                out,
                "The total amount of time traveled is {}.",
                format_duration(d.total)
            )?;
            writeln!(out, "The average trip length is {}.", format_duration(d.mean))?;
        }
        Err(e) => writeln!(out, "{e}")?,
    }
    writeln!(out, "{rule}")?;

    writeln!(out, "\nUser Stats\n")?;
    match &summary.users {
        Ok(u) => {
            writeln!(
                out,
                "There were {} Subscribers and {} Casual Users.",
                u.subscribers, u.customers
            )?;
            if let Some(g) = &u.gender {
                writeln!(out, "There were {} men and {} women.", g.male, g.female)?;
            }
            if let Some(b) = &u.birth_year {
                writeln!(out, "The oldest user was born in {}.", b.earliest)?;
                writeln!(out, "The youngest user was born in {}.", b.most_recent)?;
                writeln!(out, "The most common year of birth was {}.", b.most_common)?;
            }
        }
        Err(e) => writeln!(out, "{e}")?,
    }
    writeln!(out, "{rule}")?;
    Ok(())
}

/// Writes trip rows as labelled blocks. `first_index` numbers the first row.
pub fn write_rows<W: Write>(
    out: &mut W,
    rows: &[Trip],
    first_index: usize,
) -> std::io::Result<()> {
    for (offset, trip) in rows.iter().enumerate() {
        writeln!(out, "Row {}", first_index + offset)?;
        writeln!(out, "  Start Time     {}", trip.start_time)?;
        writeln!(out, "  End Time       {}", trip.end_time)?;
        writeln!(out, "  Start Station  {}", trip.start_station)?;
        writeln!(out, "  End Station    {}", trip.end_station)?;
        writeln!(out, "  User Type      {}", trip.user_type)?;
        if let Some(gender) = &trip.gender {
            writeln!(out, "  Gender         {gender}")?;
        }
        if let Some(year) = trip.birth_year {
            writeln!(out, "  Birth Year     {year}")?;
        }
        writeln!(out, "  month          {}", trip.month)?;
        writeln!(out, "  day_of_week    {}", weekday_name(trip.weekday))?;
        writeln!(out)?;
    }
    Ok(())
}

/// One flat CSV row summarising a query cycle. Failed report fields stay empty.
#[derive(Debug, Default, Serialize)]
pub struct SummaryRecord {
    pub timestamp: DateTime<Utc>,
    pub city: String,
    pub month: String,
    pub day: String,
    pub rows: usize,

    // time of travel
    pub most_common_month: Option<String>,
    pub most_common_day: Option<String>,
    pub most_common_hour: Option<u32>,

    // stations
    pub most_common_start_station: Option<String>,
    pub most_common_end_station: Option<String>,
    pub most_common_trip: Option<String>,

    // duration
    pub total_duration_secs: Option<i64>,
    pub mean_duration_secs: Option<f64>,

    // users
    pub subscribers: Option<usize>,
    pub customers: Option<usize>,
    pub male: Option<usize>,
    pub female: Option<usize>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,

    pub failed_reports: usize,
}

impl SummaryRecord {
    pub fn from_summary(summary: &Summary) -> Self {
        let time = summary.time.as_ref().ok();
        let stations = summary.stations.as_ref().ok();
        let duration = summary.duration.as_ref().ok();
        let users = summary.users.as_ref().ok();
        let gender = users.and_then(|u| u.gender.as_ref());
        let birth = users.and_then(|u| u.birth_year.as_ref());

        SummaryRecord {
            timestamp: Utc::now(),
            city: summary.city.clone(),
            month: summary.month.clone(),
            day: summary.day.clone(),
            rows: summary.rows,
            most_common_month: time.map(|t| t.most_common_month.clone()),
            most_common_day: time.map(|t| t.most_common_day.clone()),
            most_common_hour: time.map(|t| t.most_common_hour),
            most_common_start_station: stations.map(|s| s.most_common_start_station.clone()),
            most_common_end_station: stations.map(|s| s.most_common_end_station.clone()),
            most_common_trip: stations.map(|s| s.most_common_trip.clone()),
            total_duration_secs: duration.map(|d| d.total.num_seconds()),
            mean_duration_secs: duration.map(|d| {
                d.mean
                    .num_microseconds()
                    .map_or(d.mean.num_milliseconds() as f64 / 1e3, |us| us as f64 / 1e6)
            }),
            subscribers: users.map(|u| u.subscribers),
            customers: users.map(|u| u.customers),
            male: gender.map(|g| g.male),
            female: gender.map(|g| g.female),
            earliest_birth_year: birth.map(|b| b.earliest),
            most_recent_birth_year: birth.map(|b| b.most_recent),
            most_common_birth_year: birth.map(|b| b.most_common),
            failed_reports: summary.failed_reports(),
        }
    }
}

/// Appends a [`SummaryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &SummaryRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on the first write
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
