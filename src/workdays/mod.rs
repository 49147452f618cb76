use chrono::NaiveDate;
use thiserror::Error;

pub mod calendar;
pub mod duration;
pub mod holidays;

pub use calendar::RangeBreakdown;
pub use duration::{RequestSpan, compute_duration};
pub use holidays::{FederalHolidayProvider, MissingYearPolicy};

/// Errors raised by business-day counting and duration calculations.
/// Every variant maps to a 400 at the API layer.
#[derive(Debug, Error, PartialEq)]
pub enum WorkdayError {
    #[error("start_date {start} is after end_date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("no holiday data configured for year {year}")]
    NoHolidayData { year: i32 },

    #[error("partial day requests must start and end on the same date")]
    PartialSpansMultipleDays,

    #[error("start_time and end_time are required for partial day requests")]
    MissingPartialTimes,

    #[error("invalid time '{0}', expected HH:MM")]
    BadClockTime(String),

    #[error("start_time {start} must be before end_time {end}")]
    InvalidPartialTimes { start: String, end: String },
}
