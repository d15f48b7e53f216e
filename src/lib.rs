//! Descriptive statistics over bike-share trip datasets.
//!
//! A query cycle loads one city's CSV ([`loader`]), narrows it by month and
//! weekday ([`filter`]) and runs four independent reports ([`reports`]).

pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod reports;
pub mod table;

pub use error::{Error, Result};

use crate::config::DatasetConfig;
use crate::filter::FilterSpec;
use crate::reports::Summary;
use crate::table::TripTable;

/// Loads and filters the dataset selected by `spec`.
///
/// # Errors
///
/// Returns [`Error::DataUnavailable`] when the city's dataset cannot be read.
pub fn load_filtered(config: &DatasetConfig, spec: &FilterSpec) -> Result<TripTable> {
    let table = loader::load_city(config, spec.city)?;
    Ok(filter::apply(&table, spec))
}

/// Runs a full query cycle: load, filter and summarize.
///
/// Returns the filtered table alongside the summary so callers can page through rows.
///
/// # Errors
///
/// Returns [`Error::DataUnavailable`] when the city's dataset cannot be read.
/// Report-level failures are carried inside the [`Summary`].
pub fn run(config: &DatasetConfig, spec: &FilterSpec) -> Result<(TripTable, Summary)> {
    let table = load_filtered(config, spec)?;
    let summary = reports::summarize(&table, spec);
    Ok((table, summary))
}
