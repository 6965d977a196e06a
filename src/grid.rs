use chrono::{NaiveDate, Weekday};
use derive_more::Constructor;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::convert::TryInto;

use crate::calendar::{linear_offset, CalendarSystem, FirstDayOfWeek};
use crate::error::Result;

pub const ROWS: usize = 6;
pub const COLUMNS: usize = 7;

/// Input of a single grid computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRequest {
    pub visible_month_anchor: NaiveDate,
    pub first_day_of_week: FirstDayOfWeek,
    pub today: NaiveDate,
    pub selected_dates: BTreeSet<NaiveDate>,
    pub include_week_selector_column: bool,
}

impl GridRequest {
    pub fn new(visible_month_anchor: NaiveDate, today: NaiveDate) -> Self {
        GridRequest {
            visible_month_anchor,
            first_day_of_week: FirstDayOfWeek::Default,
            today,
            selected_dates: BTreeSet::new(),
            include_week_selector_column: false,
        }
    }

    pub fn first_day_of_week(mut self, first_day_of_week: FirstDayOfWeek) -> Self {
        self.first_day_of_week = first_day_of_week;
        self
    }

    pub fn selected_dates(mut self, selected_dates: BTreeSet<NaiveDate>) -> Self {
        self.selected_dates = selected_dates;
        self
    }

    pub fn select(mut self, date: NaiveDate) -> Self {
        self.selected_dates.insert(date);
        self
    }

    pub fn week_selectors(mut self, include: bool) -> Self {
        self.include_week_selector_column = include;
        self
    }
}

/// Dominant classification of a cell, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayKind {
    Selected,
    OtherMonth,
    Today,
    Weekend,
    Day,
}

impl DayKind {
    /// Order in which the kinds are layered on top of each other, weakest
    /// first. Later layers win.
    pub const LAYERS: [DayKind; 5] = [
        DayKind::Day,
        DayKind::Weekend,
        DayKind::Today,
        DayKind::OtherMonth,
        DayKind::Selected,
    ];

    pub fn resolve(
        is_selected: bool,
        is_other_month: bool,
        is_today: bool,
        is_weekend: bool,
    ) -> Self {
        if is_selected {
            DayKind::Selected
        } else if is_other_month {
            DayKind::OtherMonth
        } else if is_today {
            DayKind::Today
        } else if is_weekend {
            DayKind::Weekend
        } else {
            DayKind::Day
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day_of_month_label: String,
    pub is_weekend: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_other_month: bool,
    pub linear_offset: i64,
}

impl DayCell {
    pub fn kind(&self) -> DayKind {
        DayKind::resolve(
            self.is_selected,
            self.is_other_month,
            self.is_today,
            self.is_weekend,
        )
    }

    /// Whether the layer `kind` applies to this cell at all, regardless of
    /// which layer ends up dominant.
    pub fn has(&self, kind: DayKind) -> bool {
        match kind {
            DayKind::Day => true,
            DayKind::Weekend => self.is_weekend,
            DayKind::Today => self.is_today,
            DayKind::OtherMonth => self.is_other_month,
            DayKind::Selected => self.is_selected,
        }
    }
}

/// "Select this range" affordance, keyed by the offset of its first day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Constructor)]
pub struct RangeSelector {
    pub start_offset: i64,
    pub span_days: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekRow {
    pub days: [DayCell; COLUMNS],
    pub selector: Option<RangeSelector>,
}

impl WeekRow {
    pub fn week_start_offset(&self) -> Option<i64> {
        self.selector.map(|s| s.start_offset)
    }

    pub fn first(&self) -> &DayCell {
        &self.days[0]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub effective_month: NaiveDate,
    pub first_weekday: Weekday,
    pub start: NaiveDate,
    pub rows: [WeekRow; ROWS],
    /// Selector covering every day of the effective month.
    pub month_selector: RangeSelector,
}

impl Grid {
    pub fn cells(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.rows.iter().flat_map(|row| row.days.iter())
    }

    pub fn has_week_selectors(&self) -> bool {
        self.rows.iter().all(|row| row.selector.is_some())
    }

    /// Number of grid positions including week selectors.
    pub fn cell_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.days.len() + row.selector.map_or(0, |_| 1))
            .sum()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells().find(|cell| cell.date == date)
    }

    pub fn title(&self, cal: &dyn CalendarSystem) -> String {
        format!(
            "{} {}",
            cal.month_name(cal.month(self.effective_month)),
            cal.year(self.effective_month)
        )
    }

    /// Weekday column headers in grid order.
    pub fn weekdays(&self) -> Vec<Weekday> {
        std::iter::successors(Some(self.first_weekday), |day| Some(day.succ()))
            .take(COLUMNS)
            .collect()
    }
}

pub fn compute_effective_visible_month(
    cal: &dyn CalendarSystem,
    anchor: NaiveDate,
) -> Result<NaiveDate> {
    cal.add_days(anchor, 1 - cal.day_of_month(anchor) as i64)
}

/// First date shown by the grid. Always strictly before `effective_month`:
/// a month starting on the first day of week is preceded by a full week.
pub fn compute_grid_start(
    cal: &dyn CalendarSystem,
    effective_month: NaiveDate,
    first_day_of_week: FirstDayOfWeek,
) -> Result<NaiveDate> {
    let fow = first_day_of_week.resolve(cal).num_days_from_sunday() as i64;
    let dow = cal.day_of_week(effective_month).num_days_from_sunday() as i64;

    let mut delta = dow - fow;
    if delta <= 0 {
        delta += 7;
    }

    cal.add_days(effective_month, -delta)
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

pub fn build_grid(cal: &dyn CalendarSystem, request: &GridRequest) -> Result<Grid> {
    let effective_month = compute_effective_visible_month(cal, request.visible_month_anchor)?;
    let start = compute_grid_start(cal, effective_month, request.first_day_of_week)?;
    let month_index = cal.month(effective_month);

    log::debug!(
        "Building {} grid for {} starting {} (first day {})",
        cal.name(),
        effective_month,
        start,
        request.first_day_of_week
    );

    let rows: Vec<WeekRow> = (0..ROWS)
        .map(|row| -> Result<WeekRow> {
            let week_start = cal.add_days(start, (row * COLUMNS) as i64)?;

            let days: Vec<DayCell> = (0..COLUMNS)
                .map(|col| -> Result<DayCell> {
                    let current = cal.add_days(week_start, col as i64)?;

                    Ok(DayCell {
                        date: current,
                        day_of_month_label: cal.day_of_month(current).to_string(),
                        is_weekend: is_weekend(cal.day_of_week(current)),
                        is_today: current == request.today,
                        is_selected: request.selected_dates.contains(&current),
                        is_other_month: cal.month(current) != month_index,
                        linear_offset: linear_offset(current),
                    })
                })
                .collect::<Result<_>>()?;

            log::trace!(
                "Row {}: {}",
                row,
                days.iter().map(|d| d.day_of_month_label.as_str()).join(" ")
            );

            let selector = if request.include_week_selector_column {
                Some(RangeSelector::new(
                    linear_offset(week_start),
                    COLUMNS as u32,
                ))
            } else {
                None
            };

            Ok(WeekRow {
                days: days
                    .try_into()
                    .expect("row is built from exactly COLUMNS cells"),
                selector,
            })
        })
        .collect::<Result<_>>()?;

    let month_selector = RangeSelector::new(
        linear_offset(effective_month),
        cal.days_in_month(cal.year(effective_month), month_index)?,
    );

    Ok(Grid {
        effective_month,
        first_weekday: request.first_day_of_week.resolve(cal),
        start,
        rows: rows
            .try_into()
            .expect("grid is built from exactly ROWS rows"),
        month_selector,
    })
}
