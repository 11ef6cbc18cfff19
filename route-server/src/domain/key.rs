//! Query key construction and validation.
//!
//! Ekispert takes dates as `YYYYMMDD` and times as `HHMM` strings.
//! Both are validated here, before the key exists; no cache or
//! network call can be made with a malformed date or time.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::stations::StationAliases;

/// Error returned when raw search input cannot form a query key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Date is not 8 digits or not a real calendar date
    #[error("malformed date {0:?}: expected YYYYMMDD")]
    MalformedDate(String),

    /// Time is not 4 digits in 0000-2359
    #[error("malformed time {0:?}: expected HHMM in 0000-2359")]
    MalformedTime(String),
}

/// A search date in canonical `YYYYMMDD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchDate(NaiveDate);

impl SearchDate {
    /// Parse a date from exactly 8 ASCII digits.
    ///
    /// The digits must also form a real calendar date, because bare
    /// `HH:MM` upstream times are later combined with this date.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::MalformedDate(s.to_string()));
        }

        let date = NaiveDate::parse_from_str(s, "%Y%m%d")
            .map_err(|_| ValidationError::MalformedDate(s.to_string()))?;

        Ok(Self(date))
    }

    /// Returns the calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for SearchDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

/// A search time in canonical `HHMM` (24-hour, zero-padded) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchTime(NaiveTime);

impl SearchTime {
    /// Parse a time from exactly 4 ASCII digits, 0000-2359.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::MalformedTime(s.to_string()));
        }

        let bytes = s.as_bytes();
        let hour = two_digits(&bytes[0..2]);
        let minute = two_digits(&bytes[2..4]);

        if hour > 23 || minute > 59 {
            return Err(ValidationError::MalformedTime(s.to_string()));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| ValidationError::MalformedTime(s.to_string()))?;

        Ok(Self(time))
    }

    /// Returns the time of day.
    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for SearchTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H%M"))
    }
}

/// Caller guarantees both bytes are ASCII digits.
fn two_digits(bytes: &[u8]) -> u32 {
    u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0')
}

/// Canonical key for one route query.
///
/// Equality is field-wise exact: a one-minute time shift is a
/// different key. The only fuzzy step is the station-name
/// disambiguation applied once, at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Disambiguated origin station name
    pub origin: String,
    /// Disambiguated destination station name
    pub destination: String,
    /// Requested departure date
    pub date: SearchDate,
    /// Requested departure time
    pub time: SearchTime,
}

impl QueryKey {
    /// Build a key from raw user input.
    ///
    /// Applies station-name normalization to both endpoints and
    /// validates the date and time shapes. This is the only way to
    /// construct a `QueryKey`.
    pub fn build(
        origin_raw: &str,
        destination_raw: &str,
        date_raw: &str,
        time_raw: &str,
        aliases: &StationAliases,
    ) -> Result<Self, ValidationError> {
        let origin = aliases.normalize(origin_raw);
        let destination = aliases.normalize(destination_raw);
        let date = SearchDate::parse(date_raw)?;
        let time = SearchTime::parse(time_raw)?;

        Ok(Self {
            origin,
            destination,
            date,
            time,
        })
    }

    /// The requested departure instant (query date + query time).
    pub fn departure_datetime(&self) -> NaiveDateTime {
        self.date.date().and_time(self.time.time())
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_valid_hhmm_round_trips(hour in 0u32..24, minute in 0u32..60) {
            let s = format!("{hour:02}{minute:02}");
            let parsed = SearchTime::parse(&s).unwrap();
            prop_assert_eq!(parsed.to_string(), s);
        }

        #[test]
        fn non_four_digit_times_never_parse(s in "[0-9]{0,3}|[0-9]{5,8}") {
            prop_assert!(SearchTime::parse(&s).is_err());
        }
    }
}
