use std::fmt;
use std::fmt::Display;

use super::Theme;
use crate::calendar::CalendarSystem;
use crate::grid::{DayCell, Grid};

/// What a day cell prints besides its markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellLabel {
    DayOfMonth,
    Offset,
}

impl CellLabel {
    fn width(self) -> usize {
        match self {
            CellLabel::DayOfMonth => 2,
            CellLabel::Offset => 6,
        }
    }
}

struct DayView<'a> {
    cell: &'a DayCell,
    theme: &'a Theme,
    label: CellLabel,
}

impl Display for DayView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg_today = if self.cell.is_today {
            self.theme.today_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_selected = if self.cell.is_selected {
            self.theme.selected_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        let text = match self.label {
            CellLabel::DayOfMonth => format!(
                "{:>width$}",
                self.cell.day_of_month_label,
                width = self.label.width()
            ),
            CellLabel::Offset => format!(
                "{:>width$}",
                self.cell.linear_offset,
                width = self.label.width()
            ),
        };

        write!(
            f,
            "{}{}{}",
            arg_today,
            arg_selected,
            self.theme.style_for(self.cell).paint(text)
        )
    }
}

/// Plain text rendering of a month grid for terminals.
pub struct MonthView<'a> {
    grid: &'a Grid,
    cal: &'a dyn CalendarSystem,
    theme: &'a Theme,
    label: CellLabel,
}

impl<'a> MonthView<'a> {
    const SELECTOR_SYMBOL: &'static str = ">";

    pub fn new(grid: &'a Grid, cal: &'a dyn CalendarSystem, theme: &'a Theme) -> Self {
        MonthView {
            grid,
            cal,
            theme,
            label: CellLabel::DayOfMonth,
        }
    }

    pub fn label(mut self, label: CellLabel) -> Self {
        self.label = label;
        self
    }

    fn cell_width(&self) -> usize {
        // marker columns for today and selection
        self.label.width() + 2
    }

    fn selector_width(&self) -> usize {
        match self.label {
            CellLabel::DayOfMonth => 2,
            CellLabel::Offset => self.label.width() + 1,
        }
    }

    pub fn width(&self) -> usize {
        let selector = if self.grid.has_week_selectors() {
            self.selector_width()
        } else {
            0
        };

        selector + self.grid.weekdays().len() * (self.cell_width() + 1)
    }
}

impl Display for MonthView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.grid.title(self.cal);
        let title = match self.label {
            CellLabel::DayOfMonth => title,
            CellLabel::Offset => format!("{} [{}]", title, self.grid.month_selector.start_offset),
        };
        writeln!(
            f,
            "{}",
            self.theme
                .month_header_style
                .paint(format!("{:^width$}", title, width = self.width()))
        )?;

        if self.grid.has_week_selectors() {
            write!(f, "{:width$}", "", width = self.selector_width())?;
        }
        for weekday in self.grid.weekdays() {
            write!(
                f,
                " {}",
                self.theme.day_header_style.paint(format!(
                    "{:>width$}",
                    weekday.to_string(),
                    width = self.cell_width()
                ))
            )?;
        }
        writeln!(f)?;

        for row in self.grid.rows.iter() {
            if let Some(selector) = row.selector {
                let symbol = match self.label {
                    CellLabel::DayOfMonth => Self::SELECTOR_SYMBOL.to_owned(),
                    CellLabel::Offset => selector.start_offset.to_string(),
                };
                write!(
                    f,
                    "{}",
                    self.theme.selector_style.paint(format!(
                        "{:>width$}",
                        symbol,
                        width = self.selector_width()
                    ))
                )?;
            }

            for cell in row.days.iter() {
                write!(
                    f,
                    " {}",
                    DayView {
                        cell,
                        theme: self.theme,
                        label: self.label,
                    }
                )?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{FirstDayOfWeek, Gregorian};
    use crate::grid::{build_grid, GridRequest};
    use chrono::{NaiveDate, Weekday};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn renders_september_2024() {
        let cal = Gregorian::new(Weekday::Sun);
        let request = GridRequest::new(ymd(2024, 9, 10), ymd(2024, 9, 10))
            .first_day_of_week(FirstDayOfWeek::Sunday)
            .select(ymd(2024, 9, 3));
        let grid = build_grid(&cal, &request).unwrap();
        let theme = Theme::plain();

        let rendered = MonthView::new(&grid, &cal, &theme).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].trim(), "September 2024");
        assert_eq!(lines[1], "  Sun  Mon  Tue  Wed  Thu  Fri  Sat");
        assert_eq!(lines[2], "   25   26   27   28   29   30   31");
        assert_eq!(lines[3], "    1    2  + 3    4    5    6    7");
        assert_eq!(lines[4], "    8    9 * 10   11   12   13   14");
    }

    #[test]
    fn renders_week_selectors_and_offsets() {
        let cal = Gregorian::new(Weekday::Mon);
        let request = GridRequest::new(ymd(2000, 1, 1), ymd(1999, 1, 1)).week_selectors(true);
        let grid = build_grid(&cal, &request).unwrap();
        let theme = Theme::plain();

        let rendered = MonthView::new(&grid, &cal, &theme).to_string();
        assert!(rendered.lines().skip(2).all(|line| line.starts_with(" >")));

        let rendered = MonthView::new(&grid, &cal, &theme)
            .label(CellLabel::Offset)
            .to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0].trim(), "January 2000 [0]");
        // 2000-01-01 is a Saturday, Monday-first grid starts 1999-12-27
        assert!(lines[2].trim_start().starts_with("-5"));
        assert!(lines[2].contains(" 0"));
    }

    #[test]
    fn width_matches_rows() {
        let cal = Gregorian::default();
        let grid = build_grid(
            &cal,
            &GridRequest::new(ymd(2024, 2, 1), ymd(2024, 2, 1)).week_selectors(true),
        )
        .unwrap();
        let theme = Theme::plain();
        let view = MonthView::new(&grid, &cal, &theme);
        let rendered = view.to_string();

        for line in rendered.lines().skip(1) {
            assert_eq!(line.chars().count(), view.width());
        }
    }
}
