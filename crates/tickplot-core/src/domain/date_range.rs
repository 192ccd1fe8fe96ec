use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Inclusive calendar range with `start <= end <= today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Validate two `YYYY-MM-DD` strings against `today`.
    pub fn validate(start: &str, end: &str, today: Date) -> Result<Self, ValidationError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;

        if end < start {
            return Err(ValidationError::DateOrdering {
                start: date_key(start),
                end: date_key(end),
            });
        }
        if end > today {
            return Err(ValidationError::FutureDate { end: date_key(end) });
        }

        Ok(Self { start, end })
    }

    /// Same as [`DateRange::validate`] with today's local date.
    pub fn validate_now(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::validate(start, end, today())
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    /// Zero-padded ISO form of the start bound, comparable as a plain string.
    pub fn start_key(&self) -> String {
        date_key(self.start)
    }

    pub fn end_key(&self) -> String {
        date_key(self.end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start_key(), self.end_key())
    }
}

/// Today's date in the local offset, or UTC when the offset cannot be determined.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn parse_date(value: &str) -> Result<Date, ValidationError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDateFormat {
        value: value.to_owned(),
    })
}

fn date_key(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
