use chrono::NaiveDate;
use serde_with::DeserializeFromStr;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::calendar::{date_from_offset, linear_offset, CalendarSystem, FirstDayOfWeek};
use crate::error::{Error, ErrorKind, Result};
use crate::grid::{compute_effective_visible_month, GridRequest};

const WEEK_DAYS: u32 = 7;

/// Which ranges a user may select by clicking the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeserializeFromStr)]
pub enum SelectionMode {
    None,
    Day,
    DayWeek,
    DayWeekMonth,
}

impl SelectionMode {
    pub fn days(self) -> bool {
        !matches!(self, SelectionMode::None)
    }

    pub fn week_selectors(self) -> bool {
        matches!(self, SelectionMode::DayWeek | SelectionMode::DayWeekMonth)
    }

    pub fn month_selector(self) -> bool {
        matches!(self, SelectionMode::DayWeekMonth)
    }
}

impl Default for SelectionMode {
    fn default() -> Self {
        SelectionMode::Day
    }
}

impl FromStr for SelectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(&['-', '_'][..], "").as_str() {
            "none" => Ok(SelectionMode::None),
            "day" => Ok(SelectionMode::Day),
            "dayweek" => Ok(SelectionMode::DayWeek),
            "dayweekmonth" => Ok(SelectionMode::DayWeekMonth),
            _ => Err(Error::new(
                ErrorKind::InvalidConfiguration,
                &format!("Selection mode '{}' not recognized", s),
            )),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionMode::None => "none",
            SelectionMode::Day => "day",
            SelectionMode::DayWeek => "dayweek",
            SelectionMode::DayWeekMonth => "dayweekmonth",
        };
        write!(f, "{}", name)
    }
}

/// The set of selected dates. Grids only ever see a snapshot of it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedDates(BTreeSet<NaiveDate>);

impl SelectedDates {
    pub fn new() -> Self {
        SelectedDates::default()
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.0.contains(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> + '_ {
        self.0.iter()
    }

    pub fn add(&mut self, date: NaiveDate) {
        self.0.insert(date);
    }

    pub fn remove(&mut self, date: &NaiveDate) -> bool {
        self.0.remove(date)
    }

    pub fn toggle(&mut self, date: NaiveDate) {
        if !self.0.remove(&date) {
            self.0.insert(date);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replaces the selection with `date` alone.
    pub fn select(&mut self, date: NaiveDate) {
        self.0.clear();
        self.0.insert(date);
    }

    /// Replaces the selection with `days` consecutive days from `start`.
    pub fn select_range(
        &mut self,
        cal: &dyn CalendarSystem,
        start: NaiveDate,
        days: u32,
    ) -> Result<()> {
        let range = (0..days as i64)
            .map(|n| cal.add_days(start, n))
            .collect::<Result<BTreeSet<_>>>()?;

        self.0 = range;
        Ok(())
    }

    pub fn snapshot(&self) -> BTreeSet<NaiveDate> {
        self.0.clone()
    }
}

impl std::iter::FromIterator<NaiveDate> for SelectedDates {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        SelectedDates(iter.into_iter().collect())
    }
}

/// A grid interaction decoded from its offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarAction {
    SelectDay { offset: i64 },
    SelectRange { start_offset: i64, days: u32 },
    VisibleMonth { offset: i64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    SelectionChanged,
    MonthChanged {
        previous: NaiveDate,
        current: NaiveDate,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarState {
    pub visible_date: NaiveDate,
    pub first_day_of_week: FirstDayOfWeek,
    pub selected: SelectedDates,
    pub mode: SelectionMode,
}

impl CalendarState {
    pub fn new(visible_date: NaiveDate) -> Self {
        CalendarState {
            visible_date,
            first_day_of_week: FirstDayOfWeek::Default,
            selected: SelectedDates::new(),
            mode: SelectionMode::default(),
        }
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn first_day_of_week(mut self, first_day_of_week: FirstDayOfWeek) -> Self {
        self.first_day_of_week = first_day_of_week;
        self
    }

    pub fn request(&self, today: NaiveDate) -> GridRequest {
        GridRequest::new(self.visible_date, today)
            .first_day_of_week(self.first_day_of_week)
            .selected_dates(self.selected.snapshot())
            .week_selectors(self.mode.week_selectors())
    }

    fn check_allowed(&self, action: &CalendarAction) -> Result<()> {
        let allowed = match *action {
            CalendarAction::VisibleMonth { .. } => true,
            CalendarAction::SelectDay { .. } => self.mode.days(),
            CalendarAction::SelectRange { days: WEEK_DAYS, .. } => self.mode.week_selectors(),
            CalendarAction::SelectRange { .. } => self.mode.month_selector(),
        };

        if allowed {
            Ok(())
        } else {
            log::warn!("Rejected {:?} in selection mode {}", action, self.mode);
            Err(Error::new(
                ErrorKind::InvalidConfiguration,
                &format!("{:?} is not permitted in selection mode {}", action, self.mode),
            ))
        }
    }

    pub fn apply(
        &mut self,
        cal: &dyn CalendarSystem,
        action: CalendarAction,
    ) -> Result<SelectionChange> {
        self.check_allowed(&action)?;

        match action {
            CalendarAction::SelectDay { offset } => {
                self.selected.select(date_from_offset(cal, offset)?);
                Ok(SelectionChange::SelectionChanged)
            }
            CalendarAction::SelectRange { start_offset, days } => {
                let start = date_from_offset(cal, start_offset)?;
                if days != WEEK_DAYS {
                    check_whole_month(cal, start, days)?;
                }
                self.selected.select_range(cal, start, days)?;
                Ok(SelectionChange::SelectionChanged)
            }
            CalendarAction::VisibleMonth { offset } => {
                let previous = self.visible_date;
                self.visible_date = date_from_offset(cal, offset)?;
                log::debug!("Visible month changed from {} to {}", previous, self.visible_date);

                Ok(SelectionChange::MonthChanged {
                    previous,
                    current: self.visible_date,
                })
            }
        }
    }
}

/// Any range other than a week must cover exactly the month starting at `start`.
fn check_whole_month(cal: &dyn CalendarSystem, start: NaiveDate, days: u32) -> Result<()> {
    let is_month = cal.day_of_month(start) == 1
        && cal.days_in_month(cal.year(start), cal.month(start))? == days;

    if is_month {
        Ok(())
    } else {
        log::warn!("Rejected range of {} days from {}", days, start);
        Err(Error::new(
            ErrorKind::InvalidConfiguration,
            &format!("{} days from {} is neither a week nor a whole month", days, start),
        ))
    }
}

fn month_action(
    cal: &dyn CalendarSystem,
    state: &CalendarState,
    n: i32,
) -> Result<CalendarAction> {
    let effective = compute_effective_visible_month(cal, state.visible_date)?;
    let target = cal.add_months(effective, n)?;

    Ok(CalendarAction::VisibleMonth {
        offset: linear_offset(target),
    })
}

pub fn next_month_action(cal: &dyn CalendarSystem, state: &CalendarState) -> Result<CalendarAction> {
    month_action(cal, state, 1)
}

pub fn prev_month_action(cal: &dyn CalendarSystem, state: &CalendarState) -> Result<CalendarAction> {
    month_action(cal, state, -1)
}
