extern crate calgrid as lib;

use chrono::NaiveDate;
use flexi_logger::{FileSpec, Logger};
use lib::calendar::{linear_offset, CalendarKind, FirstDayOfWeek};
use lib::grid::build_grid;
use lib::selection::{
    next_month_action, prev_month_action, CalendarAction, CalendarState, SelectionMode,
};
use lib::ui::{CellLabel, MonthView, Theme};
use lib::{Error, ErrorKind};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "calgrid",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "Calgrid - month date grids for calendar controls."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(
        short = "m",
        long = "month",
        help = "month to show as YYYY-MM or any date within it",
        parse(try_from_str = parse_month)
    )]
    pub month: Option<NaiveDate>,

    #[structopt(long = "today", help = "override today's date", parse(try_from_str = parse_date))]
    pub today: Option<NaiveDate>,

    #[structopt(short = "f", long = "first-day", help = "first day of week or 'default'")]
    pub first_day: Option<FirstDayOfWeek>,

    #[structopt(long = "calendar", help = "calendar system (gregorian, julian)")]
    pub calendar: Option<CalendarKind>,

    #[structopt(long = "mode", help = "selection mode (none, day, dayweek, dayweekmonth)")]
    pub mode: Option<SelectionMode>,

    #[structopt(
        short = "s",
        long = "select",
        help = "select a date, the last one wins if repeated",
        number_of_values = 1,
        parse(try_from_str = parse_date)
    )]
    pub select: Vec<NaiveDate>,

    #[structopt(long = "select-week", help = "select the week in grid row 0-5")]
    pub select_week: Option<usize>,

    #[structopt(long = "select-month", help = "select the whole visible month")]
    pub select_month: bool,

    #[structopt(short = "w", long = "week-selectors", help = "show the week selector column")]
    pub week_selectors: bool,

    #[structopt(long = "offsets", help = "print day offsets instead of day numbers")]
    pub offsets: bool,

    #[structopt(long = "no-color", help = "disable colored output")]
    pub no_color: bool,

    #[structopt(long = "next", default_value = "0", help = "move forward N months")]
    pub next: u32,

    #[structopt(long = "prev", default_value = "0", help = "move back N months")]
    pub prev: u32,

    #[structopt(short = "n", long = "months", default_value = "1", help = "number of months to show")]
    pub months: u32,
}

fn parse_date(s: &str) -> lib::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
}

fn parse_month(s: &str) -> lib::Result<NaiveDate> {
    parse_date(s).or_else(|_| parse_date(&format!("{}-01", s)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file.clone() {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        println!("Calgrid ran into a fatal error!");
        println!(
            "Consider filing an issue with a log file and the backtrace below at {}",
            env!("CARGO_PKG_REPOSITORY")
        );

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    if let Some(calendar) = args.calendar {
        config.calendar = calendar;
    }
    if let Some(first_day) = args.first_day {
        config.first_day_of_week = first_day;
    }
    if let Some(mode) = args.mode {
        config.selection_mode = mode;
    }
    if args.week_selectors && !config.selection_mode.week_selectors() {
        config.selection_mode = SelectionMode::DayWeek;
    }
    if args.select_month {
        config.selection_mode = SelectionMode::DayWeekMonth;
    }
    if args.no_color {
        config.color = false;
    }

    let cal = config.calendar_system();
    let today = args.today.unwrap_or_else(|| config.today());

    let mut state = CalendarState::new(args.month.unwrap_or(today))
        .mode(config.selection_mode)
        .first_day_of_week(config.first_day_of_week);

    for _ in 0..args.next {
        let action = next_month_action(cal.as_ref(), &state)?;
        state.apply(cal.as_ref(), action)?;
    }
    for _ in 0..args.prev {
        let action = prev_month_action(cal.as_ref(), &state)?;
        state.apply(cal.as_ref(), action)?;
    }

    if let Some(row) = args.select_week {
        let grid = build_grid(cal.as_ref(), &state.request(today))?;
        let selector = grid
            .rows
            .get(row)
            .and_then(|r| r.selector)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidConfiguration,
                    &format!("no week selector in row {}", row),
                )
            })?;
        state.apply(
            cal.as_ref(),
            CalendarAction::SelectRange {
                start_offset: selector.start_offset,
                days: selector.span_days,
            },
        )?;
    }

    if args.select_month {
        let grid = build_grid(cal.as_ref(), &state.request(today))?;
        state.apply(
            cal.as_ref(),
            CalendarAction::SelectRange {
                start_offset: grid.month_selector.start_offset,
                days: grid.month_selector.span_days,
            },
        )?;
    }

    for date in args.select.iter() {
        state.apply(
            cal.as_ref(),
            CalendarAction::SelectDay {
                offset: linear_offset(*date),
            },
        )?;
    }

    let theme = if config.color {
        Theme::default()
    } else {
        Theme::plain()
    };
    let label = if args.offsets {
        CellLabel::Offset
    } else {
        CellLabel::DayOfMonth
    };

    let mut view_state = state.clone();
    for i in 0..args.months.max(1) {
        if i > 0 {
            let action = next_month_action(cal.as_ref(), &view_state)?;
            view_state.apply(cal.as_ref(), action)?;
            println!();
        }

        let grid = build_grid(cal.as_ref(), &view_state.request(today))?;
        print!("{}", MonthView::new(&grid, cal.as_ref(), &theme).label(label));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_argument_accepts_month_or_date() {
        let first = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert_eq!(parse_month("2024-09").unwrap(), first);
        assert_eq!(
            parse_month("2024-09-17").unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 17).unwrap()
        );
        assert!(parse_month("September").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
