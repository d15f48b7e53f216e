//! City, month and weekday selection and the row filter built from them.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use tracing::info;

use crate::error::ParseFilterError;
use crate::table::{Trip, TripTable};

/// Cities with a published trip dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name of the city's dataset inside the data directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new_york_city" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(ParseFilterError {
                kind: "city",
                value: s.to_string(),
                expected: "chicago, new york city, washington",
            }),
        }
    }
}

/// Months covered by the datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// Calendar number, January = 1.
    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

/// Month constraint: a single month or `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl FromStr for MonthFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "all" {
            return Ok(MonthFilter::All);
        }
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(&wanted))
            .map(MonthFilter::Only)
            .ok_or_else(|| ParseFilterError {
                kind: "month",
                value: s.to_string(),
                expected: "january, february, march, april, may, june, all",
            })
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(m) => f.write_str(m.name()),
        }
    }
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English day name, independent of locale.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Weekday constraint: a single day or `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl FromStr for DayFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "all" {
            return Ok(DayFilter::All);
        }
        WEEKDAYS
            .into_iter()
            .find(|d| weekday_name(*d).eq_ignore_ascii_case(&wanted))
            .map(DayFilter::Only)
            .ok_or_else(|| ParseFilterError {
                kind: "day",
                value: s.to_string(),
                expected: "monday, tuesday, wednesday, thursday, friday, saturday, sunday, all",
            })
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(d) => f.write_str(weekday_name(*d)),
        }
    }
}

/// The (city, month, weekday) selection for one query cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSpec {
    pub fn new(city: City, month: MonthFilter, day: DayFilter) -> Self {
        FilterSpec { city, month, day }
    }

    /// Parses the three user-facing selections at once.
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self, ParseFilterError> {
        Ok(FilterSpec {
            city: city.parse()?,
            month: month.parse()?,
            day: day.parse()?,
        })
    }

    /// Whether a row passes both the month and the weekday constraint.
    pub fn matches(&self, trip: &Trip) -> bool {
        let month_ok = match self.month {
            MonthFilter::All => true,
            MonthFilter::Only(m) => trip.month == m.number(),
        };
        let day_ok = match self.day {
            DayFilter::All => true,
            DayFilter::Only(d) => trip.weekday == d,
        };
        month_ok && day_ok
    }
}

/// Returns the rows of `table` selected by `spec`. The input is left untouched.
#[tracing::instrument(
    skip(table, spec),
    fields(city = %spec.city, month = %spec.month, day = %spec.day, rows_in = table.len())
)]
pub fn apply(table: &TripTable, spec: &FilterSpec) -> TripTable {
    if spec.month == MonthFilter::All && spec.day == DayFilter::All {
        return table.clone();
    }

    let filtered = table.retain_view(|t| spec.matches(t));
    info!(rows_out = filtered.len(), "Filter applied");
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::trip;

    fn sample_table() -> TripTable {
        TripTable::new(
            vec![
                // Monday
                trip("2017-03-06 08:00:00", "2017-03-06 08:10:00", "A", "B", "Subscriber"),
                // Tuesday
                trip("2017-03-07 09:00:00", "2017-03-07 09:20:00", "B", "A", "Customer"),
                // Monday
                trip("2017-01-02 17:00:00", "2017-01-02 17:05:00", "A", "C", "Subscriber"),
                // Sunday
                trip("2017-06-25 12:00:00", "2017-06-25 12:45:00", "C", "A", "Customer"),
            ],
            [],
        )
    }

    #[test]
    fn test_parse_city() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!(" New York City ".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("washington".parse::<City>().unwrap(), City::Washington);
        assert!("boston".parse::<City>().is_err());
    }

    #[test]
    fn test_parse_month_filter() {
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!(
            "MARCH".parse::<MonthFilter>().unwrap(),
            MonthFilter::Only(Month::March)
        );
        let err = "july".parse::<MonthFilter>().unwrap_err();
        assert_eq!(err.kind, "month");
    }

    #[test]
    fn test_parse_day_filter() {
        assert_eq!("All".parse::<DayFilter>().unwrap(), DayFilter::All);
        assert_eq!(
            "monday".parse::<DayFilter>().unwrap(),
            DayFilter::Only(Weekday::Mon)
        );
        assert!("mon".parse::<DayFilter>().is_err());
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::January.number(), 1);
        assert_eq!(Month::June.number(), 6);
    }

    #[test]
    fn test_all_all_returns_full_table() {
        let table = sample_table();
        let spec = FilterSpec::new(City::Chicago, MonthFilter::All, DayFilter::All);

        assert_eq!(apply(&table, &spec), table);
    }

    #[test]
    fn test_month_filter() {
        let table = sample_table();
        let spec = FilterSpec::parse("chicago", "march", "all").unwrap();
        let out = apply(&table, &spec);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| t.month == 3));
    }

    #[test]
    fn test_month_and_day_compose() {
        let table = sample_table();
        let spec = FilterSpec::parse("chicago", "march", "monday").unwrap();
        let out = apply(&table, &spec);

        assert_eq!(out.len(), 1);
        assert_eq!(out.get(0).unwrap().start_station, "A");
        assert_eq!(out.get(0).unwrap().end_station, "B");
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let table = sample_table();
        let spec = FilterSpec::parse("chicago", "february", "all").unwrap();

        assert!(apply(&table, &spec).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent_subset() {
        let table = sample_table();
        let spec = FilterSpec::parse("chicago", "all", "monday").unwrap();
        let once = apply(&table, &spec);
        let twice = apply(&once, &spec);

        assert_eq!(once, twice);
        assert!(once.iter().all(|t| table.iter().any(|src| src == t)));
        assert_eq!(table.len(), 4);
    }
}
