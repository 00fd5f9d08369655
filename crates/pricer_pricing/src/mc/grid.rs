//! Simulation time grids built from calendar dates.
//!
//! A grid starts at the pricing date, steps forward by the configured
//! [`Frequency`] and always ends exactly on the final date. Extra dates
//! (for example the maturities of every position in a portfolio) are
//! merged in so payoffs can be read off the grid without interpolation.

use pricer_core::types::{Date, DayCountConvention};
use tracing::debug;

use super::config::Frequency;
use super::error::ConfigError;

/// Ordered simulation dates with their year fractions from the first date.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{Date, DayCountConvention};
/// use pricer_pricing::mc::{Frequency, TimeGrid};
///
/// let start = Date::from_ymd(2015, 1, 1).unwrap();
/// let end = Date::from_ymd(2015, 1, 31).unwrap();
/// let special = Date::from_ymd(2015, 1, 10).unwrap();
///
/// let grid = TimeGrid::new(start, end, Frequency::Weekly, &[special], DayCountConvention::Actual365Fixed)
///     .unwrap();
/// // 1, 8, 10, 15, 22, 29, 31 January
/// assert_eq!(grid.len(), 7);
/// assert_eq!(grid.index_of(special), Some(2));
/// assert_eq!(grid.last_date(), end);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeGrid {
    dates: Vec<Date>,
    times: Vec<f64>,
}

impl TimeGrid {
    /// Grid from `start` to `end` at `frequency`, with `special_dates`
    /// merged in. Special dates outside `(start, end]` are ignored.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidParameter` for a zero frequency step or a
    ///   date overflow
    /// - `ConfigError::InsufficientGrid` if `end` is not after `start`
    pub fn new(
        start: Date,
        end: Date,
        frequency: Frequency,
        special_dates: &[Date],
        day_count: DayCountConvention,
    ) -> Result<Self, ConfigError> {
        frequency.validate()?;
        if end <= start {
            return Err(ConfigError::InsufficientGrid(1));
        }

        let mut dates = vec![start];
        let mut k: u32 = 1;
        loop {
            let next = step(start, frequency, k).ok_or(ConfigError::InvalidParameter {
                name: "frequency",
                value: format!("date overflow after {} steps from {}", k, start),
            })?;
            if next >= end {
                break;
            }
            dates.push(next);
            k += 1;
        }
        dates.push(end);

        let mut ignored = 0usize;
        for &date in special_dates {
            if date > start && date <= end {
                dates.push(date);
            } else {
                ignored += 1;
            }
        }
        if ignored > 0 {
            debug!(ignored, "special dates outside the simulation window");
        }

        Self::from_dates(dates, day_count)
    }

    /// Grid on explicit dates; sorted and de-duplicated, the earliest date
    /// is time zero.
    ///
    /// # Errors
    ///
    /// `ConfigError::InsufficientGrid` if fewer than two distinct dates
    /// remain.
    pub fn from_dates(mut dates: Vec<Date>, day_count: DayCountConvention) -> Result<Self, ConfigError> {
        dates.sort_unstable();
        dates.dedup();
        if dates.len() < 2 {
            return Err(ConfigError::InsufficientGrid(dates.len()));
        }
        let start = dates[0];
        let times = dates
            .iter()
            .map(|&d| day_count.year_fraction_dates(start, d))
            .collect();
        Ok(Self { dates, times })
    }

    /// Grid dates.
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Year fractions from the first date.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of grid points.
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false; a grid has at least two points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of steps, `len() - 1`.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.dates.len() - 1
    }

    /// Step length into point `k` (for `k >= 1`).
    #[inline]
    pub fn dt(&self, k: usize) -> f64 {
        self.times[k] - self.times[k - 1]
    }

    /// First date.
    #[inline]
    pub fn first_date(&self) -> Date {
        self.dates[0]
    }

    /// Final date.
    #[inline]
    pub fn last_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Index of a date on the grid.
    pub fn index_of(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }
}

fn step(start: Date, frequency: Frequency, k: u32) -> Option<Date> {
    match frequency {
        Frequency::Daily => start.add_days(k as i64),
        Frequency::Weekly => start.add_days(7 * k as i64),
        Frequency::Monthly => start.add_months(k),
        Frequency::EveryNDays(n) => start.add_days(n as i64 * k as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    const ACT365: DayCountConvention = DayCountConvention::Actual365Fixed;

    #[test]
    fn test_daily_grid() {
        let grid = TimeGrid::new(date(2015, 1, 1), date(2015, 3, 31), Frequency::Daily, &[], ACT365)
            .unwrap();
        assert_eq!(grid.len(), 90);
        assert_eq!(grid.n_steps(), 89);
        assert_relative_eq!(grid.times()[89], 89.0 / 365.0, epsilon = 1e-15);
        assert_relative_eq!(grid.dt(1), 1.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn test_monthly_grid_ends_on_maturity() {
        let grid = TimeGrid::new(
            date(2015, 1, 31),
            date(2015, 6, 15),
            Frequency::Monthly,
            &[],
            ACT365,
        )
        .unwrap();
        assert_eq!(
            grid.dates(),
            &[
                date(2015, 1, 31),
                date(2015, 2, 28),
                date(2015, 3, 31),
                date(2015, 4, 30),
                date(2015, 5, 31),
                date(2015, 6, 15)
            ]
        );
    }

    #[test]
    fn test_every_n_days_and_special_dates() {
        let grid = TimeGrid::new(
            date(2015, 1, 1),
            date(2015, 1, 21),
            Frequency::EveryNDays(10),
            &[date(2015, 1, 5), date(2015, 1, 11), date(2014, 12, 1), date(2016, 1, 1)],
            ACT365,
        )
        .unwrap();
        // Out-of-window specials dropped, the 11th coincides with a regular point.
        assert_eq!(
            grid.dates(),
            &[date(2015, 1, 1), date(2015, 1, 5), date(2015, 1, 11), date(2015, 1, 21)]
        );
    }

    #[test]
    fn test_degenerate_grids_rejected() {
        let d = date(2015, 1, 1);
        assert_eq!(
            TimeGrid::new(d, d, Frequency::Daily, &[], ACT365),
            Err(ConfigError::InsufficientGrid(1))
        );
        assert!(TimeGrid::from_dates(vec![d, d], ACT365).is_err());
        assert!(TimeGrid::new(d, date(2015, 2, 1), Frequency::EveryNDays(0), &[], ACT365).is_err());
    }

    #[test]
    fn test_index_of() {
        let grid = TimeGrid::new(date(2015, 1, 1), date(2015, 2, 1), Frequency::Weekly, &[], ACT365)
            .unwrap();
        assert_eq!(grid.index_of(date(2015, 1, 8)), Some(1));
        assert_eq!(grid.index_of(date(2015, 1, 9)), None);
        assert_eq!(grid.first_date(), date(2015, 1, 1));
    }
}
