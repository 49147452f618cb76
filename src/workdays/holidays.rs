use chrono::{Datelike, Days, NaiveDate, Weekday};
use indexmap::IndexSet;
use moka::sync::Cache;
use std::sync::Arc;

use super::WorkdayError;
use super::calendar::BusinessCalendar;

/// What `holidays_for` does when asked for a year outside the configured window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingYearPolicy {
    /// Refuse the request with `WorkdayError::NoHolidayData`.
    Error,
    /// Treat the year as having no holidays at all.
    EmptySet,
}

#[derive(Debug, Clone, Copy)]
enum HolidayRule {
    Fixed { month: u32, day: u32 },
    NthWeekday { month: u32, weekday: Weekday, nth: u8 },
    LastWeekday { month: u32, weekday: Weekday },
}

/// The ten US federal holidays observed by the tracker.
const US_FEDERAL_RULES: [HolidayRule; 10] = [
    // New Year's Day
    HolidayRule::Fixed { month: 1, day: 1 },
    // Martin Luther King Jr. Day, third Monday in January
    HolidayRule::NthWeekday { month: 1, weekday: Weekday::Mon, nth: 3 },
    // Presidents' Day, third Monday in February
    HolidayRule::NthWeekday { month: 2, weekday: Weekday::Mon, nth: 3 },
    // Memorial Day, last Monday in May
    HolidayRule::LastWeekday { month: 5, weekday: Weekday::Mon },
    // Independence Day
    HolidayRule::Fixed { month: 7, day: 4 },
    // Labor Day, first Monday in September
    HolidayRule::NthWeekday { month: 9, weekday: Weekday::Mon, nth: 1 },
    // Columbus Day, second Monday in October
    HolidayRule::NthWeekday { month: 10, weekday: Weekday::Mon, nth: 2 },
    // Veterans Day
    HolidayRule::Fixed { month: 11, day: 11 },
    // Thanksgiving, fourth Thursday in November
    HolidayRule::NthWeekday { month: 11, weekday: Weekday::Thu, nth: 4 },
    // Christmas Day
    HolidayRule::Fixed { month: 12, day: 25 },
];

impl HolidayRule {
    fn resolve(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            HolidayRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            HolidayRule::NthWeekday { month, weekday, nth } => {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, nth)
            }
            HolidayRule::LastWeekday { month, weekday } => {
                let last = last_day_of_month(year, month)?;
                let back = (7 + last.weekday().num_days_from_monday()
                    - weekday.num_days_from_monday())
                    % 7;
                last.checked_sub_days(Days::new(back as u64))
            }
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Shift a weekend holiday to its observed weekday: Saturday back to Friday,
/// Sunday forward to Monday.
fn observe(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date.pred_opt().unwrap_or(date),
        Weekday::Sun => date.succ_opt().unwrap_or(date),
        _ => date,
    }
}

/// Yields the US federal holiday set per calendar year.
///
/// Sets are generated from the rules above and memoized per year. Years outside the
/// configured `[first_year, last_year]` window are handled per `MissingYearPolicy`.
#[derive(Clone)]
pub struct FederalHolidayProvider {
    observed: bool,
    first_year: i32,
    last_year: i32,
    on_missing: MissingYearPolicy,
    cache: Cache<i32, Arc<IndexSet<NaiveDate>>>,
}

impl FederalHolidayProvider {
    pub fn new(
        observed: bool,
        first_year: i32,
        last_year: i32,
        on_missing: MissingYearPolicy,
    ) -> Self {
        FederalHolidayProvider {
            observed,
            first_year,
            last_year,
            on_missing,
            cache: Cache::new(128),
        }
    }

    /// The holiday set for one calendar year.
    pub fn holidays_for(&self, year: i32) -> Result<Arc<IndexSet<NaiveDate>>, WorkdayError> {
        if year < self.first_year || year > self.last_year {
            return match self.on_missing {
                MissingYearPolicy::Error => Err(WorkdayError::NoHolidayData { year }),
                MissingYearPolicy::EmptySet => Ok(Arc::new(IndexSet::new())),
            };
        }

        if let Some(set) = self.cache.get(&year) {
            return Ok(set);
        }

        let set = Arc::new(self.year_set(year));
        self.cache.insert(year, set.clone());
        Ok(set)
    }

    /// Build a weekend-masked calendar covering every year the range touches.
    pub fn calendar_for(
        &self,
        start: &NaiveDate,
        end: &NaiveDate,
    ) -> Result<BusinessCalendar, WorkdayError> {
        if start > end {
            return Err(WorkdayError::InvalidRange {
                start: *start,
                end: *end,
            });
        }

        let mut holidays = Vec::new();
        for year in start.year()..=end.year() {
            holidays.extend(self.holidays_for(year)?.iter().copied());
        }

        // An observed New Year's Day can land on Dec 31 of the previous year, so
        // neighbouring year sets are folded in when shifting is on. Years outside
        // the configured window are simply skipped here.
        if self.observed {
            for year in [start.year() - 1, end.year() + 1] {
                if year >= self.first_year && year <= self.last_year {
                    holidays.extend(self.holidays_for(year)?.iter().copied());
                }
            }
        }

        Ok(BusinessCalendar::with_weekend(holidays))
    }

    fn year_set(&self, year: i32) -> IndexSet<NaiveDate> {
        let mut set = IndexSet::new();
        for rule in US_FEDERAL_RULES.iter() {
            if let Some(date) = rule.resolve(year) {
                // Only fixed-date holidays can fall on a weekend.
                let date = if self.observed && matches!(rule, HolidayRule::Fixed { .. }) {
                    observe(date)
                } else {
                    date
                };
                set.insert(date);
            }
        }
        set
    }
}

// UNIT TESTS
#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn fixture_provider() -> FederalHolidayProvider {
        FederalHolidayProvider::new(false, 2015, 2045, MissingYearPolicy::Error)
    }

    #[test]
    fn test_federal_holidays_2025() {
        let provider = fixture_provider();
        let set = provider.holidays_for(2025).unwrap();

        let expected = [
            d(2025, 1, 1),   // New Year's Day
            d(2025, 1, 20),  // MLK Day
            d(2025, 2, 17),  // Presidents' Day
            d(2025, 5, 26),  // Memorial Day
            d(2025, 7, 4),   // Independence Day
            d(2025, 9, 1),   // Labor Day
            d(2025, 10, 13), // Columbus Day
            d(2025, 11, 11), // Veterans Day
            d(2025, 11, 27), // Thanksgiving
            d(2025, 12, 25), // Christmas
        ];
        assert_eq!(set.len(), 10);
        for date in expected {
            assert!(set.contains(&date), "missing {date}");
        }
    }

    #[test]
    fn test_unobserved_keeps_weekend_dates() {
        let provider = fixture_provider();
        // Jul 4th 2026 is a Saturday and stays put by default.
        let set = provider.holidays_for(2026).unwrap();
        assert!(set.contains(&d(2026, 7, 4)));
        assert!(!set.contains(&d(2026, 7, 3)));
    }

    #[test]
    fn test_observed_shifts_saturday_back() {
        let provider = FederalHolidayProvider::new(true, 2015, 2045, MissingYearPolicy::Error);
        let set = provider.holidays_for(2026).unwrap();
        assert!(set.contains(&d(2026, 7, 3)));
        assert!(!set.contains(&d(2026, 7, 4)));
    }

    #[test]
    fn test_observed_shifts_sunday_forward() {
        let provider = FederalHolidayProvider::new(true, 2015, 2045, MissingYearPolicy::Error);
        // Jul 4th 2027 is a Sunday.
        let set = provider.holidays_for(2027).unwrap();
        assert!(set.contains(&d(2027, 7, 5)));
        assert!(!set.contains(&d(2027, 7, 4)));
    }

    #[test]
    fn test_observed_leaves_floating_rules_alone() {
        let provider = FederalHolidayProvider::new(true, 2015, 2045, MissingYearPolicy::Error);
        let set = provider.holidays_for(2025).unwrap();
        assert!(set.contains(&d(2025, 11, 27)));
        assert!(set.contains(&d(2025, 5, 26)));
    }

    #[test]
    fn test_year_outside_window_errors() {
        let provider = FederalHolidayProvider::new(false, 2020, 2030, MissingYearPolicy::Error);
        assert_eq!(
            provider.holidays_for(2031).unwrap_err(),
            WorkdayError::NoHolidayData { year: 2031 }
        );
        assert_eq!(
            provider.holidays_for(2019).unwrap_err(),
            WorkdayError::NoHolidayData { year: 2019 }
        );
    }

    #[test]
    fn test_year_outside_window_empty_set_policy() {
        let provider = FederalHolidayProvider::new(false, 2020, 2030, MissingYearPolicy::EmptySet);
        let set = provider.holidays_for(2031).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_year_sets_are_memoized() {
        let provider = fixture_provider();
        let first = provider.holidays_for(2025).unwrap();
        let second = provider.holidays_for(2025).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_calendar_for_unions_years() {
        let provider = fixture_provider();
        let cal = provider.calendar_for(&d(2025, 12, 31), &d(2026, 1, 2)).unwrap();
        // Wed 31st, New Year's Thu 1st, Fri 2nd
        assert_eq!(cal.business_day_count(&d(2025, 12, 31), &d(2026, 1, 2)), Ok(2));
    }

    #[test]
    fn test_calendar_for_rejects_reversed_range() {
        let provider = fixture_provider();
        assert!(matches!(
            provider.calendar_for(&d(2025, 9, 23), &d(2025, 9, 18)),
            Err(WorkdayError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_calendar_for_propagates_missing_year() {
        let provider = FederalHolidayProvider::new(false, 2020, 2030, MissingYearPolicy::Error);
        assert_eq!(
            provider
                .calendar_for(&d(2030, 12, 29), &d(2031, 1, 2))
                .unwrap_err(),
            WorkdayError::NoHolidayData { year: 2031 }
        );
    }
}
