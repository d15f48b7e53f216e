use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::reports::types::{BirthYearStats, GenderCounts, UserReport};
use crate::reports::utility::{mode, value_counts};
use crate::table::{Column, TripTable};

pub const REPORT: &str = "user demographics";

pub const SUBSCRIBER: &str = "Subscriber";
pub const CUSTOMER: &str = "Customer";
pub const MALE: &str = "Male";
pub const FEMALE: &str = "Female";

/// User-type counts, plus gender counts and birth-year extremes when the
/// dataset has those columns.
///
/// # Errors
///
/// [`Error::NoData`] when the table is empty, when either `Subscriber` or
/// `Customer` never occurs, when the gender column lacks `Male` or `Female`
/// rows, or when the birth-year column has no values in this subset.
#[tracing::instrument(name = "user_stats", skip_all, fields(rows = table.len()))]
pub fn user_stats(table: &TripTable) -> Result<UserReport> {
    if table.is_empty() {
        return Err(Error::no_data(REPORT, "filtered table is empty"));
    }

    let user_types: BTreeMap<String, usize> =
        value_counts(table.iter().map(|t| t.user_type.clone()));
    let subscribers = required_count(&user_types, SUBSCRIBER)?;
    let customers = required_count(&user_types, CUSTOMER)?;

    let gender = if table.has_column(Column::Gender) {
        let counts = value_counts(table.iter().filter_map(|t| t.gender.clone()));
        Some(GenderCounts {
            male: required_count(&counts, MALE)?,
            female: required_count(&counts, FEMALE)?,
        })
    } else {
        None
    };

    let birth_year = if table.has_column(Column::BirthYear) {
        Some(birth_year_stats(table)?)
    } else {
        None
    };

    let report = UserReport {
        user_types,
        subscribers,
        customers,
        gender,
        birth_year,
    };
    debug!(?report, "User demographics computed");
    Ok(report)
}

fn required_count(counts: &BTreeMap<String, usize>, category: &str) -> Result<usize> {
    counts
        .get(category)
        .copied()
        .ok_or_else(|| Error::no_data(REPORT, format!("no '{category}' rows")))
}

fn birth_year_stats(table: &TripTable) -> Result<BirthYearStats> {
    let years: Vec<i32> = table.iter().filter_map(|t| t.birth_year).collect();
    let none = || Error::no_data(REPORT, "no birth years recorded");

    Ok(BirthYearStats {
        earliest: years.iter().copied().min().ok_or_else(none)?,
        most_recent: years.iter().copied().max().ok_or_else(none)?,
        most_common: mode(years.iter().copied()).ok_or_else(none)?,
    })
}
