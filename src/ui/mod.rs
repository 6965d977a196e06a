pub mod month_view;
pub mod theme;

pub use month_view::{CellLabel, MonthView};
pub use theme::{Color, DayStyle, Theme};
