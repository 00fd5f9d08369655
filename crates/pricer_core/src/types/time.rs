//! Dates and day-count conventions.
//!
//! This module provides:
//! - [`Date`]: A calendar date used for pricing dates, maturities and grids
//! - [`DayCountConvention`]: Year-fraction conventions (ACT/365F by default)
//!
//! Every time grid in the workspace is built from `Date`s and converted to
//! year fractions through the market's day count, so that date arithmetic
//! happens in one place.

use crate::types::error::DateError;
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// Calendar date wrapper around `chrono::NaiveDate`.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let pricing = Date::from_ymd(2015, 1, 1).unwrap();
/// let maturity = Date::parse("2015-03-31").unwrap();
/// assert_eq!(maturity - pricing, 89);
/// assert_eq!(maturity.to_string(), "2015-03-31");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Construct a date from year, month and day.
    ///
    /// # Errors
    /// Returns `DateError::InvalidDate` for impossible components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parse an ISO 8601 date (`YYYY-MM-DD`).
    ///
    /// # Errors
    /// Returns `DateError::ParseError` if the string is not a valid date.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("{}: {}", s, e)))
    }

    /// Wrap an existing `NaiveDate`.
    #[inline]
    pub fn from_naive(date: NaiveDate) -> Self {
        Date(date)
    }

    /// Return the underlying `NaiveDate`.
    #[inline]
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month component (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day-of-month component.
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shift by a (possibly negative) number of calendar days.
    ///
    /// Returns `None` if the result leaves chrono's representable range.
    pub fn add_days(self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(days)).map(Date)
    }

    /// Shift forward by whole months, clamping to the month end.
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// let d = Date::from_ymd(2015, 1, 31).unwrap();
    /// assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2015, 2, 28).unwrap());
    /// ```
    pub fn add_months(self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Date)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Number of calendar days from `rhs` to `self`.
    fn sub(self, rhs: Self) -> Self::Output {
        (self.0 - rhs.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

/// Day count convention for year-fraction calculations.
///
/// # Variants
///
/// - `Actual365Fixed`: actual days / 365 (default)
/// - `Actual360`: actual days / 360
/// - `Thirty360`: 30/360 US bond basis
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::{Date, DayCountConvention};
///
/// let start = Date::from_ymd(2015, 1, 1).unwrap();
/// let end = Date::from_ymd(2015, 3, 31).unwrap();
/// let t = DayCountConvention::Actual365Fixed.year_fraction_dates(start, end);
/// assert!((t - 89.0 / 365.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DayCountConvention {
    /// Actual/365 Fixed
    #[default]
    Actual365Fixed,
    /// Actual/360
    Actual360,
    /// 30/360 US bond basis
    Thirty360,
}

impl DayCountConvention {
    /// Conventional market name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Actual365Fixed => "ACT/365F",
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Year fraction from `start` to `end`; negative when `end < start`.
    pub fn year_fraction_dates(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Actual365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::Actual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (a, b, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };
                let d1 = a.day().min(30);
                let d2 = if b.day() == 31 && d1 == 30 { 30 } else { b.day() };
                let days = 360 * (b.year() - a.year())
                    + 30 * (b.month() as i32 - a.month() as i32)
                    + (d2 as i32 - d1 as i32);
                sign * days as f64 / 360.0
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = String;

    /// Case-insensitive; accepts "ACT/365F", "ACT/365", "ACT/360", "30/360".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' '], "").as_str() {
            "ACT365F" | "ACT365" | "ACTUAL365FIXED" | "A365F" => {
                Ok(DayCountConvention::Actual365Fixed)
            }
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::Actual360),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(format!("Unknown day count convention: {}", s)),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::DayCountConvention;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for DayCountConvention {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for DayCountConvention {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            DayCountConvention::from_str(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_from_ymd_rejects_invalid() {
        let err = Date::from_ymd(2015, 2, 30).unwrap_err();
        assert_eq!(
            err,
            DateError::InvalidDate {
                year: 2015,
                month: 2,
                day: 30
            }
        );
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        let d = Date::parse("2015-03-31").unwrap();
        assert_eq!(d.to_string(), "2015-03-31");
        assert_eq!("2015-03-31".parse::<Date>().unwrap(), d);
        assert!(Date::parse("31/03/2015").is_err());
    }

    #[test]
    fn test_reference_maturity_year_fraction() {
        let start = Date::from_ymd(2015, 1, 1).unwrap();
        let end = Date::from_ymd(2015, 3, 31).unwrap();
        let t = DayCountConvention::Actual365Fixed.year_fraction_dates(start, end);
        assert_relative_eq!(t, 0.2438356164, epsilon = 1e-9);
    }

    #[test]
    fn test_actual_360() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2024, 7, 1).unwrap();
        let t = DayCountConvention::Actual360.year_fraction_dates(start, end);
        assert_relative_eq!(t, 182.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn test_thirty_360_month_end() {
        let start = Date::from_ymd(2024, 1, 31).unwrap();
        let end = Date::from_ymd(2024, 3, 31).unwrap();
        let t = DayCountConvention::Thirty360.year_fraction_dates(start, end);
        assert_relative_eq!(t, 60.0 / 360.0, epsilon = 1e-15);
        let back = DayCountConvention::Thirty360.year_fraction_dates(end, start);
        assert_relative_eq!(back, -60.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn test_add_months_clamps() {
        let d = Date::from_ymd(2016, 1, 31).unwrap();
        assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2016, 2, 29).unwrap());
    }

    #[test]
    fn test_day_count_from_str() {
        assert_eq!(
            "act/365f".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Actual365Fixed
        );
        assert_eq!(
            "30/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Thirty360
        );
        assert!("ACT/ACT ISDA".parse::<DayCountConvention>().is_err());
    }

    proptest! {
        #[test]
        fn prop_add_days_inverts_sub(offset in -5000i64..5000) {
            let base = Date::from_ymd(2015, 6, 15).unwrap();
            let shifted = base.add_days(offset).unwrap();
            prop_assert_eq!(shifted - base, offset);
        }
    }
}
