use chrono::TimeDelta;
use tracing::debug;

use crate::error::{Error, Result};
use crate::reports::types::DurationReport;
use crate::table::TripTable;

pub const REPORT: &str = "trip duration";

/// Total and mean of `end - start` over every trip in `table`.
///
/// # Errors
///
/// [`Error::NoData`] when the table is empty, since the mean is undefined.
#[tracing::instrument(name = "duration_stats", skip_all, fields(rows = table.len()))]
pub fn duration_stats(table: &TripTable) -> Result<DurationReport> {
    if table.is_empty() {
        return Err(Error::no_data(REPORT, "filtered table is empty"));
    }

    let total = table
        .iter()
        .fold(TimeDelta::zero(), |acc, t| acc + t.duration);
    let trips = table.len();
    let mean = mean_delta(total, trips);

    debug!(trips, total_secs = total.num_seconds(), "Trip duration computed");
    Ok(DurationReport { trips, total, mean })
}

/// `total / count` at nanosecond precision, or milliseconds when the total
/// does not fit in an `i64` of nanoseconds.
fn mean_delta(total: TimeDelta, count: usize) -> TimeDelta {
    let count = i64::try_from(count).unwrap_or(i64::MAX).max(1);
    match total.num_nanoseconds() {
        Some(nanos) => TimeDelta::nanoseconds(nanos / count),
        None => TimeDelta::milliseconds(total.num_milliseconds() / count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::trip;

    #[test]
    fn test_empty_table_is_no_data() {
        assert!(duration_stats(&TripTable::default()).unwrap_err().is_no_data());
    }

    #[test]
    fn test_total_and_mean() {
        let table = TripTable::new(
            vec![
                trip("2017-01-02 08:00:00", "2017-01-02 08:10:00", "A", "B", "Subscriber"),
                trip("2017-01-02 09:00:00", "2017-01-02 09:05:00", "A", "B", "Subscriber"),
                trip("2017-01-02 23:50:00", "2017-01-03 00:20:00", "B", "A", "Customer"),
            ],
            [],
        );
        let report = duration_stats(&table).unwrap();

        assert_eq!(report.trips, 3);
        assert_eq!(report.total, TimeDelta::minutes(45));
        assert_eq!(report.mean, TimeDelta::minutes(15));
    }

    #[test]
    fn test_mean_keeps_fractional_seconds() {
        assert_eq!(
            mean_delta(TimeDelta::seconds(10), 4),
            TimeDelta::milliseconds(2500)
        );
    }

    #[test]
    fn test_mean_keeps_sub_millisecond_precision() {
        let mean = mean_delta(TimeDelta::seconds(1), 3);

        assert_eq!(mean, TimeDelta::nanoseconds(333_333_333));
        assert_eq!(
            crate::output::format_duration(mean),
            "0 days 00:00:00.333333"
        );
    }

    #[test]
    fn test_mean_of_huge_total_falls_back_to_milliseconds() {
        let total = TimeDelta::days(200_000);

        assert_eq!(mean_delta(total, 2), TimeDelta::days(100_000));
    }
}
