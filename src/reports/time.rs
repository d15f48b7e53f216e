use chrono::Month;
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::weekday_name;
use crate::reports::types::TimeReport;
use crate::reports::utility::mode;
use crate::table::TripTable;

pub const REPORT: &str = "time of travel";

/// Most common month, weekday and start hour of the trips in `table`.
///
/// # Errors
///
/// [`Error::NoData`] when the table is empty.
#[tracing::instrument(name = "time_stats", skip_all, fields(rows = table.len()))]
pub fn time_stats(table: &TripTable) -> Result<TimeReport> {
    let empty = || Error::no_data(REPORT, "filtered table is empty");

    let month = mode(table.iter().map(|t| t.month)).ok_or_else(empty)?;
    let day = mode(table.iter().map(|t| weekday_name(t.weekday))).ok_or_else(empty)?;
    let hour = mode(table.iter().map(|t| t.hour)).ok_or_else(empty)?;

    let month_name = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string());

    let report = TimeReport {
        most_common_month: month_name,
        most_common_day: day.to_string(),
        most_common_hour: hour,
    };
    debug!(?report, "Time of travel computed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::trip;

    #[test]
    fn test_empty_table_is_no_data() {
        let err = time_stats(&TripTable::default()).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_most_common_values() {
        let table = TripTable::new(
            vec![
                trip("2017-03-06 08:00:00", "2017-03-06 08:10:00", "A", "B", "Subscriber"),
                trip("2017-03-13 08:30:00", "2017-03-13 08:50:00", "A", "B", "Subscriber"),
                trip("2017-05-03 17:00:00", "2017-05-03 17:15:00", "B", "A", "Customer"),
            ],
            [],
        );
        let report = time_stats(&table).unwrap();

        assert_eq!(report.most_common_month, "March");
        assert_eq!(report.most_common_day, "Monday");
        assert_eq!(report.most_common_hour, 8);
    }

    #[test]
    fn test_ties_resolve_to_earliest() {
        let table = TripTable::new(
            vec![
                // Sunday in June at 23h, then Tuesday in February at 5h
                trip("2017-06-25 23:00:00", "2017-06-25 23:10:00", "A", "B", "Subscriber"),
                trip("2017-02-07 05:00:00", "2017-02-07 05:10:00", "A", "B", "Subscriber"),
            ],
            [],
        );
        let report = time_stats(&table).unwrap();

        assert_eq!(report.most_common_month, "February");
        // weekday names tie-break alphabetically
        assert_eq!(report.most_common_day, "Sunday");
        assert_eq!(report.most_common_hour, 5);
    }
}
