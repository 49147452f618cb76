use chrono::{NaiveDate, NaiveTime, Timelike};

use super::WorkdayError;
use super::holidays::FederalHolidayProvider;

/// The date/time span of a PTO request as submitted.
#[derive(Debug, Clone)]
pub struct RequestSpan {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_partial_day: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// The duration figures persisted with a request. Computed once at submission
/// and never recomputed afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestDuration {
    /// Whole business days covered by the span.
    pub business_days: u32,
    /// Days charged against the balance. Fractional for partial days.
    pub fractional_days: f64,
    /// Hours charged against the balance.
    pub hours: f64,
}

/// Compute the duration of a request.
///
/// Full-day spans charge `business_days * day_hours`. Partial-day spans must start
/// and end on the same date and charge the clock difference between `start_time`
/// and `end_time`, whether or not that date is a business day.
pub fn compute_duration(
    span: &RequestSpan,
    provider: &FederalHolidayProvider,
    day_hours: f64,
) -> Result<RequestDuration, WorkdayError> {
    let calendar = provider.calendar_for(&span.start_date, &span.end_date)?;
    let business_days = calendar.business_day_count(&span.start_date, &span.end_date)?;

    if !span.is_partial_day {
        return Ok(RequestDuration {
            business_days,
            fractional_days: business_days as f64,
            hours: round2(business_days as f64 * day_hours),
        });
    }

    if span.start_date != span.end_date {
        return Err(WorkdayError::PartialSpansMultipleDays);
    }
    let (start, end) = match (span.start_time.as_deref(), span.end_time.as_deref()) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(WorkdayError::MissingPartialTimes),
    };

    let start_minutes = clock_minutes(start)?;
    let end_minutes = clock_minutes(end)?;
    if start_minutes >= end_minutes {
        return Err(WorkdayError::InvalidPartialTimes {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let hours = round2(f64::from(end_minutes - start_minutes) / 60.0);
    Ok(RequestDuration {
        business_days,
        fractional_days: round2(hours / day_hours),
        hours,
    })
}

fn clock_minutes(value: &str) -> Result<u32, WorkdayError> {
    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| WorkdayError::BadClockTime(value.to_string()))?;
    Ok(time.hour() * 60 + time.minute())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
