use chrono::{Datelike, Days, NaiveDate, Weekday};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;
use utoipa::ToSchema;

use super::WorkdayError;

/// A business day calendar with a singular list of holidays.
///
/// A business day calendar is formed of 2 components:
///
/// - `week_mask`: which defines the days of the week that are not general working days.
///   For this tracker these are always Saturday and Sunday.
/// - `holidays`: which defines specific dates that may be exceptions to the general
///   working week, and cannot be business days.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct BusinessCalendar {
    holidays: IndexSet<NaiveDate>,
    week_mask: HashSet<Weekday>,
}

impl BusinessCalendar {
    /// Create a calendar.
    ///
    /// `holidays` provide a vector of dates that cannot be business days. `week_mask` is a
    /// vector of weekdays that are excluded from the working week.
    pub fn new(holidays: Vec<NaiveDate>, week_mask: Vec<Weekday>) -> Self {
        BusinessCalendar {
            holidays: IndexSet::from_iter(holidays),
            week_mask: HashSet::from_iter(week_mask),
        }
    }

    /// Create a calendar with the standard Saturday/Sunday weekend mask.
    pub fn with_weekend(holidays: Vec<NaiveDate>) -> Self {
        Self::new(holidays, vec![Weekday::Sat, Weekday::Sun])
    }

    pub fn is_weekday(&self, date: &NaiveDate) -> bool {
        !self.week_mask.contains(&date.weekday())
    }

    pub fn is_holiday(&self, date: &NaiveDate) -> bool {
        self.holidays.contains(date)
    }

    pub fn is_business_day(&self, date: &NaiveDate) -> bool {
        self.is_weekday(date) && !self.is_holiday(date)
    }

    /// Count business days between `start` and `end`, inclusive of both endpoints.
    pub fn business_day_count(
        &self,
        start: &NaiveDate,
        end: &NaiveDate,
    ) -> Result<u32, WorkdayError> {
        guard_range(start, end)?;
        let mut count = 0u32;
        let mut date = *start;
        while date <= *end {
            if self.is_business_day(&date) {
                count += 1;
            }
            date = date + Days::new(1);
        }
        Ok(count)
    }

    /// Return a vector of the business dates between `start` and `end`, inclusive.
    pub fn business_days_in(
        &self,
        start: &NaiveDate,
        end: &NaiveDate,
    ) -> Result<Vec<NaiveDate>, WorkdayError> {
        guard_range(start, end)?;
        let mut vec = Vec::new();
        let mut date = *start;
        while date <= *end {
            if self.is_business_day(&date) {
                vec.push(date);
            }
            date = date + Days::new(1);
        }
        Ok(vec)
    }

    /// Classify every date between `start` and `end`, inclusive.
    ///
    /// A Saturday that is also a holiday counts as a weekend day, not a holiday.
    pub fn breakdown(
        &self,
        start: &NaiveDate,
        end: &NaiveDate,
    ) -> Result<RangeBreakdown, WorkdayError> {
        guard_range(start, end)?;

        let mut breakdown = RangeBreakdown {
            total_days: end.signed_duration_since(*start).num_days() + 1,
            ..RangeBreakdown::default()
        };

        let mut date = *start;
        while date <= *end {
            if !self.is_weekday(&date) {
                breakdown.weekend_days += 1;
                breakdown.weekends.push(date);
            } else if self.is_holiday(&date) {
                breakdown.holiday_days += 1;
                breakdown.holidays.push(date);
            } else {
                breakdown.business_days += 1;
            }
            date = date + Days::new(1);
        }

        Ok(breakdown)
    }
}

fn guard_range(start: &NaiveDate, end: &NaiveDate) -> Result<(), WorkdayError> {
    if start > end {
        return Err(WorkdayError::InvalidRange {
            start: *start,
            end: *end,
        });
    }
    Ok(())
}

/// Per-day classification of a date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "total_days": 3,
    "business_days": 2,
    "weekend_days": 0,
    "holiday_days": 1,
    "holidays": ["2025-12-25"],
    "weekends": []
}))]
pub struct RangeBreakdown {
    #[schema(example = 3)]
    pub total_days: i64,
    #[schema(example = 2)]
    pub business_days: u32,
    #[schema(example = 0)]
    pub weekend_days: u32,
    #[schema(example = 1)]
    pub holiday_days: u32,
    #[schema(example = json!(["2025-12-25"]), value_type = Vec<String>)]
    pub holidays: Vec<NaiveDate>,
    #[schema(example = json!([]), value_type = Vec<String>)]
    pub weekends: Vec<NaiveDate>,
}

// UNIT TESTS
#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn fixture_us_2025() -> BusinessCalendar {
        let hols = vec![
            d(2025, 1, 1),
            d(2025, 1, 20),
            d(2025, 2, 17),
            d(2025, 5, 26),
            d(2025, 7, 4),
            d(2025, 9, 1),
            d(2025, 10, 13),
            d(2025, 11, 11),
            d(2025, 11, 27),
            d(2025, 12, 25),
        ];
        BusinessCalendar::with_weekend(hols)
    }

    #[test]
    fn test_is_business_day() {
        let cal = fixture_us_2025();
        assert!(cal.is_business_day(&d(2025, 9, 18))); // Thursday
        assert!(!cal.is_business_day(&d(2025, 9, 20))); // Saturday
        assert!(!cal.is_business_day(&d(2025, 9, 21))); // Sunday
        assert!(!cal.is_business_day(&d(2025, 11, 27))); // Thanksgiving, a Thursday
    }

    #[test]
    fn test_count_skips_weekend() {
        let cal = fixture_us_2025();
        // Thu 18th through Tue 23rd: Thu, Fri, Mon, Tue
        assert_eq!(cal.business_day_count(&d(2025, 9, 18), &d(2025, 9, 23)), Ok(4));
    }

    #[test]
    fn test_count_excludes_holidays() {
        let cal = fixture_us_2025();
        // Thanksgiving Thu 27th + Fri 28th -> only the Friday counts
        assert_eq!(cal.business_day_count(&d(2025, 11, 27), &d(2025, 11, 28)), Ok(1));
        // Wed 24th through Fri 26th straddling Christmas
        assert_eq!(cal.business_day_count(&d(2025, 12, 24), &d(2025, 12, 26)), Ok(2));
        // Thu Jul 3rd through Mon Jul 7th: the 4th is a Friday holiday
        assert_eq!(cal.business_day_count(&d(2025, 7, 3), &d(2025, 7, 7)), Ok(2));
    }

    #[test]
    fn test_count_single_day_ranges() {
        let cal = fixture_us_2025();
        assert_eq!(cal.business_day_count(&d(2025, 9, 18), &d(2025, 9, 18)), Ok(1));
        // Memorial Day alone
        assert_eq!(cal.business_day_count(&d(2025, 5, 26), &d(2025, 5, 26)), Ok(0));
        assert_eq!(cal.business_day_count(&d(2025, 5, 26), &d(2025, 5, 27)), Ok(1));
        // Weekend only
        assert_eq!(cal.business_day_count(&d(2025, 9, 20), &d(2025, 9, 21)), Ok(0));
    }

    #[test]
    fn test_count_reversed_range_errors() {
        let cal = fixture_us_2025();
        assert_eq!(
            cal.business_day_count(&d(2025, 9, 23), &d(2025, 9, 18)),
            Err(WorkdayError::InvalidRange {
                start: d(2025, 9, 23),
                end: d(2025, 9, 18),
            })
        );
    }

    #[test]
    fn test_count_extends_monotonically() {
        let cal = fixture_us_2025();
        let start = d(2025, 11, 3);
        let mut previous = 0;
        let mut end = start;
        for _ in 0..30 {
            let count = cal.business_day_count(&start, &end).unwrap();
            assert!(count >= previous);
            assert!(count <= previous + 1);
            previous = count;
            end = end + Days::new(1);
        }
    }

    #[test]
    fn test_business_days_in() {
        let cal = fixture_us_2025();
        let days = cal.business_days_in(&d(2025, 12, 18), &d(2025, 12, 23)).unwrap();
        assert_eq!(
            days,
            vec![d(2025, 12, 18), d(2025, 12, 19), d(2025, 12, 22), d(2025, 12, 23)]
        );
    }

    #[test]
    fn test_breakdown_over_christmas() {
        let cal = fixture_us_2025();
        let info = cal.breakdown(&d(2025, 12, 24), &d(2025, 12, 26)).unwrap();
        assert_eq!(info.total_days, 3);
        assert_eq!(info.business_days, 2);
        assert_eq!(info.weekend_days, 0);
        assert_eq!(info.holiday_days, 1);
        assert_eq!(info.holidays, vec![d(2025, 12, 25)]);
        assert!(info.weekends.is_empty());
    }

    #[test]
    fn test_breakdown_counts_weekends() {
        let cal = fixture_us_2025();
        let info = cal.breakdown(&d(2025, 12, 18), &d(2025, 12, 23)).unwrap();
        assert_eq!(info.total_days, 6);
        assert_eq!(info.business_days, 4);
        assert_eq!(info.weekend_days, 2);
        assert_eq!(info.holiday_days, 0);
        assert_eq!(info.weekends, vec![d(2025, 12, 20), d(2025, 12, 21)]);
    }

    #[test]
    fn test_breakdown_weekend_takes_precedence_over_holiday() {
        // A holiday landing on a Saturday is reported as a weekend day.
        let cal = BusinessCalendar::with_weekend(vec![d(2025, 9, 20)]);
        let info = cal.breakdown(&d(2025, 9, 19), &d(2025, 9, 21)).unwrap();
        assert_eq!(info.weekend_days, 2);
        assert_eq!(info.holiday_days, 0);
        assert_eq!(info.business_days, 1);
    }

    #[test]
    fn test_count_across_year_boundary() {
        let cal = BusinessCalendar::with_weekend(vec![d(2025, 12, 25), d(2026, 1, 1)]);
        // Wed Dec 31st, Thu Jan 1st (holiday), Fri Jan 2nd
        assert_eq!(cal.business_day_count(&d(2025, 12, 31), &d(2026, 1, 2)), Ok(2));
    }

    #[test]
    fn test_empty_week_mask_counts_every_day() {
        let cal = BusinessCalendar::new(vec![], vec![]);
        assert_eq!(cal.business_day_count(&d(2025, 9, 15), &d(2025, 9, 21)), Ok(7));
    }
}
