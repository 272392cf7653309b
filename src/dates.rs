//! Calendar-day bucketing in a fixed reference timezone.
//!
//! Every component that maps an instant to a day (log appends, content
//! filtering, prompt rendering, "today") goes through the same
//! [`ReferenceZone`], so an entry written at 23:59 and a post published at
//! 23:59 always land on the same date. [`DateRange`] is an inclusive span of
//! days and owns the `YYYY-MM-DD_to_YYYY-MM-DD` key used on disk.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Wire and path format for a single day.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    Invalid(String),

    #[error("start date {start} is after end date {end}")]
    Reversed { start: NaiveDate, end: NaiveDate },

    #[error("invalid UTC offset {0:?}: expected +HH:MM or -HH:MM")]
    Offset(String),
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    let trimmed = s.trim();
    // chrono accepts unpadded fields; the on-disk key must be exactly 10 chars.
    if trimmed.len() != 10 {
        return Err(DateError::Invalid(s.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| DateError::Invalid(s.to_string()))
}

/// Format a date as its on-disk key.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A fixed UTC offset that defines where one calendar day ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceZone {
    offset: FixedOffset,
}

impl ReferenceZone {
    pub fn utc() -> Self {
        Self {
            offset: chrono::Offset::fix(&Utc),
        }
    }

    /// Build from seconds east of UTC. Returns `None` outside ±24h.
    pub fn from_seconds_east(secs: i32) -> Option<Self> {
        FixedOffset::east_opt(secs).map(|offset| Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local wall-clock time for a millisecond epoch timestamp.
    pub fn at_millis(&self, millis: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&self.offset))
    }

    /// Local wall-clock time for a second epoch timestamp.
    pub fn at_seconds(&self, secs: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.with_timezone(&self.offset))
    }

    pub fn date_of_millis(&self, millis: i64) -> Option<NaiveDate> {
        self.at_millis(millis).map(|dt| dt.date_naive())
    }

    pub fn date_of_seconds(&self, secs: i64) -> Option<NaiveDate> {
        self.at_seconds(secs).map(|dt| dt.date_naive())
    }

    /// Epoch seconds of local midnight at the start of `date`.
    pub fn start_of_day(&self, date: NaiveDate) -> i64 {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        midnight.and_utc().timestamp() - i64::from(self.offset.local_minus_utc())
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for ReferenceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.offset.local_minus_utc();
        let sign = if secs < 0 { '-' } else { '+' };
        let abs = secs.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
    }
}

impl FromStr for ReferenceZone {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DateError::Offset(s.to_string());
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Self::utc());
        }

        let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
            (1, rest)
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            (-1, rest)
        } else {
            return Err(err());
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(err)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(err());
        }
        let hours: i32 = hours.parse().map_err(|_| err())?;
        let minutes: i32 = minutes.parse().map_err(|_| err())?;
        if hours > 23 || minutes > 59 {
            return Err(err());
        }

        Self::from_seconds_east(sign * (hours * 3600 + minutes * 60)).ok_or_else(err)
    }
}

/// An inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateError> {
        if start > end {
            return Err(DateError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, DateError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The `days` days before `end`, plus `end` itself.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Resolve optional `YYYY-MM-DD` bounds. A missing end is `today`; a
    /// missing start is `default_days` before the end.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
        default_days: u32,
    ) -> Result<Self, DateError> {
        let end = match end {
            Some(s) => parse_date(s)?,
            None => today,
        };
        match start {
            Some(s) => Self::new(parse_date(s)?, end),
            None => Ok(Self::trailing(end, default_days)),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day in the range, in chronological order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            d.succ_opt().filter(|next| *next <= end)
        })
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Directory key: `YYYY-MM-DD` for a single day, `YYYY-MM-DD_to_YYYY-MM-DD` otherwise.
    pub fn key(&self) -> String {
        if self.is_single_day() {
            day_key(self.start)
        } else {
            format!("{}_to_{}", day_key(self.start), day_key(self.end))
        }
    }

    /// Range key even when start == end; weekly artifacts always use this form.
    pub fn range_key(&self) -> String {
        format!("{}_to_{}", day_key(self.start), day_key(self.end))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", day_key(self.start))
        } else {
            write!(f, "{} to {}", day_key(self.start), day_key(self.end))
        }
    }
}
