pub mod calendar;
pub mod config;
pub mod error;
pub mod grid;
pub mod selection;
pub mod ui;

pub use calendar::{CalendarSystem, FirstDayOfWeek, Gregorian, Julian};
pub use error::{Error, ErrorKind, Result};
pub use grid::{build_grid, DayCell, DayKind, Grid, GridRequest, WeekRow};
