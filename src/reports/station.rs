use tracing::debug;

use crate::error::{Error, Result};
use crate::reports::types::StationReport;
use crate::reports::utility::mode;
use crate::table::TripTable;

pub const REPORT: &str = "station popularity";

/// Most used start station, end station and start-to-end trip.
///
/// Trips are ordered: `A TO B` and `B TO A` are counted separately.
/// Blank station cells are skipped; a trip only counts as a route when both
/// ends are named.
///
/// # Errors
///
/// [`Error::NoData`] when the table is empty or no row names a station.
#[tracing::instrument(name = "station_stats", skip_all, fields(rows = table.len()))]
pub fn station_stats(table: &TripTable) -> Result<StationReport> {
    if table.is_empty() {
        return Err(Error::no_data(REPORT, "filtered table is empty"));
    }
    let unnamed = || Error::no_data(REPORT, "no station names recorded");

    let start = mode(table.iter().map(|t| t.start_station.as_str()).filter(|s| is_named(s)))
        .ok_or_else(unnamed)?;
    let end = mode(table.iter().map(|t| t.end_station.as_str()).filter(|s| is_named(s)))
        .ok_or_else(unnamed)?;
    let route = mode(
        table
            .iter()
            .filter(|t| is_named(&t.start_station) && is_named(&t.end_station))
            .map(|t| t.route()),
    )
    .ok_or_else(unnamed)?;

    let report = StationReport {
        most_common_start_station: start.to_string(),
        most_common_end_station: end.to_string(),
        most_common_trip: route,
    };
    debug!(?report, "Station popularity computed");
    Ok(report)
}

fn is_named(station: &str) -> bool {
    !station.trim().is_empty()
}
