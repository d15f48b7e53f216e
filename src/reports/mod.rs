//! Descriptive statistics over a filtered trip table.
//!
//! Four independent reports read the same table: time of travel, station
//! popularity, trip duration and user demographics. Each returns its own
//! `Result`, so an empty or lopsided subset fails per report rather than
//! aborting the others. [`summarize`] runs all four.

pub mod duration;
pub mod station;
pub mod time;
pub mod types;
pub mod users;
pub mod utility;

pub use duration::duration_stats;
pub use station::station_stats;
pub use time::time_stats;
pub use types::{
    BirthYearStats, DurationReport, GenderCounts, StationReport, Summary, TimeReport, UserReport,
};
pub use users::user_stats;

use tracing::{info, warn};

use crate::error::Result;
use crate::filter::FilterSpec;
use crate::table::TripTable;

/// Runs every report over `table`, which must already be filtered by `spec`.
pub fn summarize(table: &TripTable, spec: &FilterSpec) -> Summary {
    let summary = Summary {
        city: spec.city.to_string(),
        month: spec.month.to_string(),
        day: spec.day.to_string(),
        rows: table.len(),
        time: logged(time_stats(table)),
        stations: logged(station_stats(table)),
        duration: logged(duration_stats(table)),
        users: logged(user_stats(table)),
    };
    info!(
        rows = summary.rows,
        failed = summary.failed_reports(),
        "Reports complete"
    );
    summary
}

fn logged<T>(report: Result<T>) -> Result<T> {
    if let Err(e) = &report {
        warn!(error = %e, "Report unavailable");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{City, DayFilter, MonthFilter};
    use crate::table::tests::trip;

    #[test]
    fn test_summarize_empty_table_all_no_data() {
        let spec = FilterSpec::new(City::NewYorkCity, MonthFilter::All, DayFilter::All);
        let summary = summarize(&TripTable::default(), &spec);

        assert_eq!(summary.rows, 0);
        assert_eq!(summary.failed_reports(), 4);
        assert!(summary.time.as_ref().unwrap_err().is_no_data());
        assert!(summary.stations.as_ref().unwrap_err().is_no_data());
        assert!(summary.duration.as_ref().unwrap_err().is_no_data());
        assert!(summary.users.as_ref().unwrap_err().is_no_data());
    }

    #[test]
    fn test_summarize_reports_fail_independently() {
        // No Customer rows: only the user report fails.
        let table = TripTable::new(
            vec![trip("2017-01-02 08:00:00", "2017-01-02 08:10:00", "A", "B", "Subscriber")],
            [],
        );
        let spec = FilterSpec::new(City::Washington, MonthFilter::All, DayFilter::All);
        let summary = summarize(&table, &spec);

        assert_eq!(summary.failed_reports(), 1);
        assert!(summary.time.is_ok());
        assert!(summary.stations.is_ok());
        assert!(summary.duration.is_ok());
        assert!(summary.users.is_err());
        assert_eq!(summary.city, "washington");
    }
}
