use chrono::{Datelike, NaiveDate, Weekday};

use super::{month_out_of_range, CalendarSystem};
use crate::error::{Error, ErrorKind, Result};

// Julian day number of 0001-01-01 (Gregorian) minus one
const JDN_CE_OFFSET: i64 = 1_721_425;

/// Proleptic Julian calendar. Leap years are every fourth year without
/// exception, so it drifts against the Gregorian calendar (13 days in the
/// 20th and 21st century).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Julian {
    first_day: Weekday,
}

impl Julian {
    pub fn new(first_day: Weekday) -> Self {
        Julian { first_day }
    }

    fn is_leap_year(year: i32) -> bool {
        year.rem_euclid(4) == 0
    }

    fn month_length(year: i32, month: u32) -> Option<u32> {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
            4 | 6 | 9 | 11 => Some(30),
            2 if Self::is_leap_year(year) => Some(29),
            2 => Some(28),
            _ => None,
        }
    }

    /// (year, month, day) of `date` in the Julian calendar.
    pub fn ymd(date: NaiveDate) -> (i32, u32, u32) {
        let jdn = date.num_days_from_ce() as i64 + JDN_CE_OFFSET;

        let c = jdn + 32_082;
        let d = (4 * c + 3).div_euclid(1461);
        let e = c - (1461 * d).div_euclid(4);
        let m = (5 * e + 2).div_euclid(153);

        let day = e - (153 * m + 2).div_euclid(5) + 1;
        let month = m + 3 - 12 * m.div_euclid(10);
        let year = d - 4800 + m.div_euclid(10);

        (year as i32, month as u32, day as u32)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > Self::month_length(year, month)? {
            return None;
        }

        let a = (14 - month as i64).div_euclid(12);
        let y = year as i64 + 4800 - a;
        let m = month as i64 + 12 * a - 3;
        let jdn = day as i64 + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - 32_083;

        let days_from_ce = jdn - JDN_CE_OFFSET;
        if days_from_ce < i32::MIN as i64 || days_from_ce > i32::MAX as i64 {
            return None;
        }
        NaiveDate::from_num_days_from_ce_opt(days_from_ce as i32)
    }
}

impl Default for Julian {
    fn default() -> Self {
        Julian::new(Weekday::Sun)
    }
}

impl CalendarSystem for Julian {
    fn name(&self) -> &str {
        "julian"
    }

    fn day_of_month(&self, date: NaiveDate) -> u32 {
        Self::ymd(date).2
    }

    fn month(&self, date: NaiveDate) -> u32 {
        Self::ymd(date).1
    }

    fn year(&self, date: NaiveDate) -> i32 {
        Self::ymd(date).0
    }

    fn days_in_month(&self, year: i32, month: u32) -> Result<u32> {
        Self::month_length(year, month).ok_or_else(|| month_out_of_range(year, month))
    }

    fn add_months(&self, date: NaiveDate, n: i32) -> Result<NaiveDate> {
        let out_of_range = || {
            Error::new(
                ErrorKind::CalendarSystem,
                &format!("{} {:+} months is out of range", date, n),
            )
        };

        let (year, month, day) = Self::ymd(date);
        let month0 = (year as i64) * 12 + (month as i64 - 1) + n as i64;
        let target_year = month0.div_euclid(12);
        let target_month = (month0.rem_euclid(12) + 1) as u32;

        if target_year < i32::MIN as i64 || target_year > i32::MAX as i64 {
            return Err(out_of_range());
        }
        let target_year = target_year as i32;

        let length = self.days_in_month(target_year, target_month)?;
        Self::from_ymd(target_year, target_month, day.min(length)).ok_or_else(out_of_range)
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
    fn known_conversions() {
        assert_eq!(Julian::ymd(ymd(2000, 1, 1)), (1999, 12, 19));
        assert_eq!(Julian::ymd(ymd(2024, 9, 14)), (2024, 9, 1));
        assert_eq!(Julian::ymd(ymd(1582, 10, 15)), (1582, 10, 5));
        assert_eq!(Julian::from_ymd(2024, 9, 1), Some(ymd(2024, 9, 14)));
    }

    #[test]
    fn conversion_roundtrip() {
        let mut date = ymd(1890, 1, 1);
        let end = ymd(2110, 1, 1);
        while date < end {
            let (y, m, d) = Julian::ymd(date);
            assert_eq!(Julian::from_ymd(y, m, d), Some(date));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn every_fourth_year_is_leap() {
        let cal = Julian::default();
        assert_eq!(cal.days_in_month(1900, 2).unwrap(), 29);
        assert_eq!(cal.days_in_month(2100, 2).unwrap(), 29);
        assert_eq!(cal.days_in_month(2023, 2).unwrap(), 28);
        assert!(cal.days_in_month(2023, 0).unwrap_err().is_calendar_system());
        assert_eq!(Julian::from_ymd(2023, 2, 29), None);
    }

    #[test]
    fn add_months_in_julian_terms() {
        let cal = Julian::default();
        let jan31 = Julian::from_ymd(2023, 1, 31).unwrap();
        let feb = cal.add_months(jan31, 1).unwrap();
        assert_eq!(Julian::ymd(feb), (2023, 2, 28));

        let back = cal.add_months(jan31, -13).unwrap();
        assert_eq!(Julian::ymd(back), (2021, 12, 31));
    }

    #[test]
    fn weekdays_are_shared_with_gregorian() {
        let cal = Julian::default();
        assert_eq!(cal.day_of_week(ymd(2024, 9, 14)), Weekday::Sat);
        assert_eq!(cal.day_of_month(ymd(2024, 9, 14)), 1);
        assert_eq!(cal.month(ymd(2024, 9, 13)), 8);
    }
}
