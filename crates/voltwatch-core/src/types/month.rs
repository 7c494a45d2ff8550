//! Calendar months in UTC, the unit the month sliders and monthly charts work in.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::errors::SeriesError;

/// A validated calendar month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Rejects months outside 1..=12 and years chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Result<Self, SeriesError> {
        month_start(year, month).ok_or(SeriesError::InvalidMonth { year, month })?;
        Ok(Self { year, month })
    }

    /// Month containing `timestamp`.
    pub fn of(timestamp: DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month; December rolls over into January.
    pub fn next(&self) -> Result<Self, SeriesError> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Half-open `[first instant, first instant of the next month)`.
    pub fn bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), SeriesError> {
        let invalid = || SeriesError::InvalidMonth {
            year: self.year,
            month: self.month,
        };
        let start = month_start(self.year, self.month).ok_or_else(invalid)?;
        let next = self.next()?;
        let end = month_start(next.year, next.month).ok_or_else(invalid)?;
        Ok((start, end))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_month_thirteen() {
        assert_eq!(
            Month::new(2021, 13),
            Err(SeriesError::InvalidMonth { year: 2021, month: 13 })
        );
        assert!(Month::new(2021, 0).is_err());
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let december = Month::new(2021, 12).unwrap();
        assert_eq!(december.next().unwrap(), Month::new(2022, 1).unwrap());
        let (start, end) = december.bounds().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2021, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_orders_chronologically_and_displays_padded() {
        let months = [Month::new(2022, 1).unwrap(), Month::new(2021, 11).unwrap()];
        assert!(months[1] < months[0]);
        assert_eq!(months[1].to_string(), "2021-11");
        assert_eq!(Month::of(Utc.with_ymd_and_hms(2021, 3, 31, 23, 0, 0).unwrap()).to_string(), "2021-03");
    }
}
