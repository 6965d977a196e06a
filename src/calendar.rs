use chrono::{Datelike, Days, Month, NaiveDate, Weekday};
use num_traits::FromPrimitive;
use once_cell::sync::Lazy;
use serde_with::DeserializeFromStr;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

mod gregorian;
mod julian;

pub use gregorian::Gregorian;
pub use julian::Julian;

/// Reference day for linear offsets. Shared by everything that encodes a
/// date as a day count and decodes it back.
pub static EPOCH: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2000, 1, 1).expect("2000-01-01 is a valid date"));

/// Calendar-relative view on absolute days.
///
/// A `NaiveDate` identifies a day independent of any calendar system; the
/// implementor decides which year, month and day of month that day carries.
pub trait CalendarSystem: Send + Sync {
    fn name(&self) -> &str;

    fn day_of_week(&self, date: NaiveDate) -> Weekday {
        date.weekday()
    }

    fn day_of_month(&self, date: NaiveDate) -> u32;

    fn month(&self, date: NaiveDate) -> u32;

    fn year(&self, date: NaiveDate) -> i32;

    fn days_in_month(&self, year: i32, month: u32) -> Result<u32>;

    fn add_days(&self, date: NaiveDate, n: i64) -> Result<NaiveDate> {
        let shifted = if n >= 0 {
            date.checked_add_days(Days::new(n as u64))
        } else {
            date.checked_sub_days(Days::new(n.unsigned_abs()))
        };

        shifted.ok_or_else(|| {
            Error::new(
                ErrorKind::CalendarSystem,
                &format!("{} {:+} days is out of range", date, n),
            )
        })
    }

    /// Shifts by whole months, clamping the day of month to the length of
    /// the target month.
    fn add_months(&self, date: NaiveDate, n: i32) -> Result<NaiveDate>;

    fn default_first_day(&self) -> Weekday;

    fn month_name(&self, month: u32) -> String {
        Month::from_u32(month)
            .map(|m| m.name().to_owned())
            .unwrap_or_else(|| month.to_string())
    }
}

/// Days between `EPOCH` and `date`. Negative before the epoch.
pub fn linear_offset(date: NaiveDate) -> i64 {
    date.signed_duration_since(*EPOCH).num_days()
}

pub fn date_from_offset(cal: &dyn CalendarSystem, offset: i64) -> Result<NaiveDate> {
    cal.add_days(*EPOCH, offset)
}

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_from_sunday(n: u32) -> Option<Weekday> {
    if n < 7 {
        Weekday::from_u32((n + 6) % 7)
    } else {
        None
    }
}

pub(crate) fn month_out_of_range(year: i32, month: u32) -> Error {
    Error::new(
        ErrorKind::CalendarSystem,
        &format!("month {} of year {} does not exist", month, year),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, DeserializeFromStr)]
pub enum FirstDayOfWeek {
    Default,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl FirstDayOfWeek {
    pub fn resolve(self, cal: &dyn CalendarSystem) -> Weekday {
        use FirstDayOfWeek::*;
        match self {
            Default => cal.default_first_day(),
            Sunday => Weekday::Sun,
            Monday => Weekday::Mon,
            Tuesday => Weekday::Tue,
            Wednesday => Weekday::Wed,
            Thursday => Weekday::Thu,
            Friday => Weekday::Fri,
            Saturday => Weekday::Sat,
        }
    }
}

impl Default for FirstDayOfWeek {
    fn default() -> Self {
        FirstDayOfWeek::Default
    }
}

impl From<Weekday> for FirstDayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => FirstDayOfWeek::Sunday,
            Weekday::Mon => FirstDayOfWeek::Monday,
            Weekday::Tue => FirstDayOfWeek::Tuesday,
            Weekday::Wed => FirstDayOfWeek::Wednesday,
            Weekday::Thu => FirstDayOfWeek::Thursday,
            Weekday::Fri => FirstDayOfWeek::Friday,
            Weekday::Sat => FirstDayOfWeek::Saturday,
        }
    }
}

impl TryFrom<u8> for FirstDayOfWeek {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            7 => Ok(FirstDayOfWeek::Default),
            n => weekday_from_sunday(n as u32)
                .map(FirstDayOfWeek::from)
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidConfiguration,
                        &format!("{} is not a first day of week", value),
                    )
                }),
        }
    }
}

impl FromStr for FirstDayOfWeek {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowercase = s.trim().to_lowercase();

        if lowercase == "default" {
            return Ok(FirstDayOfWeek::Default);
        }

        // chrono accepts both full names and three-letter abbreviations
        lowercase
            .parse::<Weekday>()
            .map(FirstDayOfWeek::from)
            .map_err(|_| {
                Error::new(
                    ErrorKind::InvalidConfiguration,
                    &format!("First day of week '{}' not recognized", s),
                )
            })
    }
}

impl fmt::Display for FirstDayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FirstDayOfWeek::Default => "default",
            FirstDayOfWeek::Sunday => "sunday",
            FirstDayOfWeek::Monday => "monday",
            FirstDayOfWeek::Tuesday => "tuesday",
            FirstDayOfWeek::Wednesday => "wednesday",
            FirstDayOfWeek::Thursday => "thursday",
            FirstDayOfWeek::Friday => "friday",
            FirstDayOfWeek::Saturday => "saturday",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, DeserializeFromStr)]
pub enum CalendarKind {
    Gregorian,
    Julian,
}

impl CalendarKind {
    pub fn system(self, default_first_day: Weekday) -> Box<dyn CalendarSystem> {
        match self {
            CalendarKind::Gregorian => Box::new(Gregorian::new(default_first_day)),
            CalendarKind::Julian => Box::new(Julian::new(default_first_day)),
        }
    }
}

impl Default for CalendarKind {
    fn default() -> Self {
        CalendarKind::Gregorian
    }
}

impl FromStr for CalendarKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gregorian" => Ok(CalendarKind::Gregorian),
            "julian" => Ok(CalendarKind::Julian),
            _ => Err(Error::new(
                ErrorKind::InvalidConfiguration,
                &format!("Calendar system '{}' not recognized", s),
            )),
        }
    }
}
