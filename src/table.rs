//! In-memory trip table with the time fields derived at load time.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike, Weekday};

/// Separator joining start and end station into a trip key.
pub const TRIP_SEPARATOR: &str = " TO ";

/// Rows shown per page when the filtered table is displayed.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Source columns whose presence varies between cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Gender,
    BirthYear,
}

impl Column {
    /// Header text of the column in the source CSV.
    pub fn header(self) -> &'static str {
        match self {
            Column::Gender => "Gender",
            Column::BirthYear => "Birth Year",
        }
    }
}

/// One bike-share trip with its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub user_type: String,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    // derived
    pub month: u32,
    pub weekday: Weekday,
    pub hour: u32,
    pub duration: TimeDelta,
}

impl Trip {
    /// Builds a trip and derives month, weekday, start hour and duration.
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        user_type: impl Into<String>,
    ) -> Self {
        Trip {
            start_time,
            end_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: user_type.into(),
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday(),
            hour: start_time.hour(),
            duration: end_time - start_time,
        }
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    /// Ordered trip key, e.g. `"Canal St TO Clark St"`.
    pub fn route(&self) -> String {
        format!("{}{}{}", self.start_station, TRIP_SEPARATOR, self.end_station)
    }
}

/// Loaded or filtered trips plus the optional columns the source carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    trips: Vec<Trip>,
    columns: BTreeSet<Column>,
}

impl TripTable {
    pub fn new(trips: Vec<Trip>, columns: impl IntoIterator<Item = Column>) -> Self {
        TripTable {
            trips,
            columns: columns.into_iter().collect(),
        }
    }

    /// Whether the source data had the given optional column.
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trip> {
        self.trips.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }

    /// Returns page `index` (zero-based) of `size` rows. Past the end the page is empty.
    pub fn page(&self, index: usize, size: usize) -> &[Trip] {
        let start = index.saturating_mul(size).min(self.trips.len());
        let end = start.saturating_add(size).min(self.trips.len());
        &self.trips[start..end]
    }

    /// Number of pages of `size` rows needed to show the whole table.
    pub fn page_count(&self, size: usize) -> usize {
        if size == 0 {
            0
        } else {
            self.trips.len().div_ceil(size)
        }
    }

    /// New table holding the rows accepted by `keep`, in source order.
    pub fn retain_view(&self, mut keep: impl FnMut(&Trip) -> bool) -> TripTable {
        TripTable {
            trips: self.trips.iter().filter(|t| keep(t)).cloned().collect(),
            columns: self.columns.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a TripTable {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    pub(crate) fn trip(start: &str, end: &str, from: &str, to: &str, user: &str) -> Trip {
        Trip::new(ts(start), ts(end), from, to, user)
    }

    #[test]
    fn test_derived_fields() {
        let t = trip(
            "2017-03-06 08:15:00",
            "2017-03-06 08:40:30",
            "Canal St",
            "Clark St",
            "Subscriber",
        );

        assert_eq!(t.month, 3);
        assert_eq!(t.weekday, Weekday::Mon);
        assert_eq!(t.hour, 8);
        assert_eq!(t.duration, TimeDelta::seconds(25 * 60 + 30));
    }

    #[test]
    fn test_route_is_ordered() {
        let ab = trip("2017-01-01 00:00:00", "2017-01-01 00:10:00", "A", "B", "Customer");
        let ba = trip("2017-01-01 00:00:00", "2017-01-01 00:10:00", "B", "A", "Customer");

        assert_eq!(ab.route(), "A TO B");
        assert_ne!(ab.route(), ba.route());
    }

    #[test]
    fn test_paging() {
        let rows = (0..12)
            .map(|i| {
                trip(
                    "2017-01-01 00:00:00",
                    "2017-01-01 00:10:00",
                    &format!("S{i}"),
                    "E",
                    "Subscriber",
                )
            })
            .collect();
        let table = TripTable::new(rows, []);

        assert_eq!(table.page_count(DEFAULT_PAGE_SIZE), 3);
        assert_eq!(table.page(0, DEFAULT_PAGE_SIZE).len(), 5);
        assert_eq!(table.page(2, DEFAULT_PAGE_SIZE).len(), 2);
        assert_eq!(table.page(2, DEFAULT_PAGE_SIZE)[0].start_station, "S10");
        assert!(table.page(3, DEFAULT_PAGE_SIZE).is_empty());
        assert!(table.page(usize::MAX, DEFAULT_PAGE_SIZE).is_empty());
    }

    #[test]
    fn test_column_capabilities() {
        let table = TripTable::new(Vec::new(), [Column::Gender]);

        assert!(table.has_column(Column::Gender));
        assert!(!table.has_column(Column::BirthYear));
    }
}
