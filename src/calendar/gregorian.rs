use chrono::{Datelike, Months, NaiveDate, Weekday};

use super::{month_out_of_range, CalendarSystem};
use crate::error::{Error, ErrorKind, Result};

/// Proleptic Gregorian calendar, i.e. chrono's own view on dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gregorian {
    first_day: Weekday,
}

impl Gregorian {
    pub fn new(first_day: Weekday) -> Self {
        Gregorian { first_day }
    }
}

impl Default for Gregorian {
    fn default() -> Self {
        Gregorian::new(Weekday::Sun)
    }
}

impl CalendarSystem for Gregorian {
    fn name(&self) -> &str {
        "gregorian"
    }

    fn day_of_month(&self, date: NaiveDate) -> u32 {
        date.day()
    }

    fn month(&self, date: NaiveDate) -> u32 {
        date.month()
    }

    fn year(&self, date: NaiveDate) -> i32 {
        date.year()
    }

    fn days_in_month(&self, year: i32, month: u32) -> Result<u32> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| month_out_of_range(year, month))?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| month_out_of_range(year, month))?;

        Ok(next.signed_duration_since(first).num_days() as u32)
    }

    fn add_months(&self, date: NaiveDate, n: i32) -> Result<NaiveDate> {
        let shifted = if n >= 0 {
            date.checked_add_months(Months::new(n as u32))
        } else {
            date.checked_sub_months(Months::new(n.unsigned_abs()))
        };

        shifted.ok_or_else(|| {
            Error::new(
                ErrorKind::CalendarSystem,
                &format!("{} {:+} months is out of range", date, n),
            )
        })
    }

    fn default_first_day(&self) -> Weekday {
        self.first_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_lengths() {
        let cal = Gregorian::default();
        assert_eq!(cal.days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(cal.days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(cal.days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(cal.days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(cal.days_in_month(2024, 12).unwrap(), 31);
        assert_eq!(cal.days_in_month(2024, 9).unwrap(), 30);
        assert!(cal.days_in_month(2024, 13).unwrap_err().is_calendar_system());
    }

    #[test]
    fn add_months_clamps_day() {
        let cal = Gregorian::default();
        assert_eq!(cal.add_months(ymd(2024, 1, 31), 1).unwrap(), ymd(2024, 2, 29));
        assert_eq!(cal.add_months(ymd(2024, 3, 31), -1).unwrap(), ymd(2024, 2, 29));
        assert_eq!(cal.add_months(ymd(2024, 11, 15), 2).unwrap(), ymd(2025, 1, 15));
        assert!(cal
            .add_months(NaiveDate::MAX, 1)
            .unwrap_err()
            .is_calendar_system());
    }

    #[test]
    fn fields() {
        let cal = Gregorian::new(Weekday::Mon);
        let date = ymd(2024, 9, 1);
        assert_eq!(cal.day_of_week(date), Weekday::Sun);
        assert_eq!(cal.day_of_month(date), 1);
        assert_eq!(cal.month(date), 9);
        assert_eq!(cal.year(date), 2024);
        assert_eq!(cal.default_first_day(), Weekday::Mon);
        assert_eq!(cal.month_name(9), "September");
    }
}
