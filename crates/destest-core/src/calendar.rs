//! Holiday table and reference-year helpers.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DestestError, DestestResult};

/// Fixed date → label lookup for one reference year.
///
/// The table is literal input data. It is loaded from a file (see
/// `destest_ts::load_holidays`) so other years or locales need no code
/// change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet(BTreeMap<NaiveDate, String>);

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, label: impl Into<String>) {
        self.0.insert(date, label.into());
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains_key(&date)
    }

    pub fn label(&self, date: NaiveDate) -> Option<&str> {
        self.0.get(&date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Holidays that fall outside `year`; used to warn about stale tables.
    pub fn outside_year(&self, year: i32) -> Vec<NaiveDate> {
        self.0.keys().filter(|d| d.year() != year).copied().collect()
    }
}

/// Number of hours in a calendar year (8760, or 8784 for leap years).
pub fn hours_in_year(year: i32) -> DestestResult<usize> {
    let start = year_start(year)?;
    let end = year_start(year + 1)?;
    Ok((end - start).num_hours() as usize)
}

/// Hourly timestamps covering `year`.
pub fn hourly_index(year: i32) -> DestestResult<Vec<NaiveDateTime>> {
    let start = year_start(year)?;
    let hours = hours_in_year(year)?;
    Ok((0..hours as i64)
        .map(|h| start + Duration::hours(h))
        .collect())
}

fn year_start(year: i32) -> DestestResult<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DestestError::Config(format!("year {year} is out of range")))
}
