//! Reporting period value object.

use core::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Calendar month used as a reporting period (`YYYY-MM`).
///
/// Ordering is chronological (year first, then month), which is what every
/// period-sequenced report relies on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

/// Error returned when a `YYYY-MM` period cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid year-month `{0}` (expected YYYY-MM)")]
pub struct ParseYearMonthError(String);

impl YearMonth {
    /// Returns `None` when `month` is not in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Truncate a calendar date to its month.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(value: NaiveDate) -> Self {
        Self::of(value)
    }
}

impl core::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseYearMonthError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn truncates_date_to_month() {
        let ym = YearMonth::of(date(1996, 7, 4));
        assert_eq!(ym, YearMonth::new(1996, 7).unwrap());
        assert_eq!(ym.to_string(), "1996-07");
    }

    #[test]
    fn orders_chronologically_across_years() {
        let mut periods = vec![
            YearMonth::new(1997, 1).unwrap(),
            YearMonth::new(1996, 12).unwrap(),
            YearMonth::new(1996, 7).unwrap(),
        ];
        periods.sort();
        let rendered: Vec<String> = periods.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["1996-07", "1996-12", "1997-01"]);
    }

    #[test]
    fn parses_and_rejects() {
        assert_eq!("1998-05".parse::<YearMonth>().unwrap(), YearMonth::new(1998, 5).unwrap());
        assert!("1998-13".parse::<YearMonth>().is_err());
        assert!("1998-5".parse::<YearMonth>().is_err());
        assert!("199805".parse::<YearMonth>().is_err());
        assert!(YearMonth::new(2000, 0).is_none());
    }

    #[test]
    fn serializes_as_string() {
        let ym = YearMonth::new(1997, 3).unwrap();
        let json = serde_json::to_string(&ym).unwrap();
        assert_eq!(json, "\"1997-03\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym);
    }
}
