use std::fmt;
use termion::color::{AnsiValue, Bg, Fg};
use termion::style;

use crate::grid::{DayCell, DayKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    LightBlack,
    Ansi(u8),
}

impl Color {
    fn ansi(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
            Color::LightBlack => 8,
            Color::Ansi(value) => value,
        }
    }
}

/// Immutable set of style attributes. Unset attributes leave whatever is
/// below them untouched when merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayStyle {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: Option<bool>,
    italic: Option<bool>,
    invert: Option<bool>,
}

impl DayStyle {
    pub fn fg_color(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg_color(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = Some(invert);
        self
    }

    /// `over` wins for every attribute it sets.
    pub fn merge(self, over: DayStyle) -> Self {
        DayStyle {
            fg: over.fg.or(self.fg),
            bg: over.bg.or(self.bg),
            bold: over.bold.or(self.bold),
            italic: over.italic.or(self.italic),
            invert: over.invert.or(self.invert),
        }
    }

    pub fn is_plain(&self) -> bool {
        self.fg.is_none()
            && self.bg.is_none()
            && !self.bold.unwrap_or(false)
            && !self.italic.unwrap_or(false)
            && !self.invert.unwrap_or(false)
    }

    /// Wraps `content` into the escape sequences of this style.
    pub fn paint<T: fmt::Display>(&self, content: T) -> Painted<T> {
        Painted {
            style: *self,
            content,
        }
    }
}

pub struct Painted<T> {
    style: DayStyle,
    content: T,
}

impl<T: fmt::Display> fmt::Display for Painted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.style.is_plain() {
            return write!(f, "{}", self.content);
        }

        if let Some(color) = self.style.fg {
            write!(f, "{}", Fg(AnsiValue(color.ansi())))?;
        }
        if let Some(color) = self.style.bg {
            write!(f, "{}", Bg(AnsiValue(color.ansi())))?;
        }
        if self.style.bold.unwrap_or(false) {
            write!(f, "{}", style::Bold)?;
        }
        if self.style.italic.unwrap_or(false) {
            write!(f, "{}", style::Italic)?;
        }
        if self.style.invert.unwrap_or(false) {
            write!(f, "{}", style::Invert)?;
        }

        write!(f, "{}{}", self.content, style::Reset)
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: DayStyle,
    pub weekend_day_style: DayStyle,
    pub today_day_style: DayStyle,
    pub other_month_day_style: DayStyle,
    pub selected_day_style: DayStyle,
    pub today_day_char: Option<char>,
    pub selected_day_char: Option<char>,
    pub month_header_style: DayStyle,
    pub day_header_style: DayStyle,
    pub selector_style: DayStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: DayStyle::default(),
            weekend_day_style: DayStyle::default().fg_color(Color::Cyan),
            today_day_style: DayStyle::default().invert(true).italic(true),
            other_month_day_style: DayStyle::default()
                .fg_color(Color::LightBlack)
                .invert(false),
            selected_day_style: DayStyle::default()
                .bg_color(Color::Blue)
                .fg_color(Color::White)
                .bold(true),
            today_day_char: Some('*'),
            selected_day_char: None,
            month_header_style: DayStyle::default().fg_color(Color::Yellow),
            day_header_style: DayStyle::default().bold(true),
            selector_style: DayStyle::default().fg_color(Color::Green),
        }
    }
}

impl Theme {
    /// Colorless theme keeping only the marker characters.
    pub fn plain() -> Self {
        Theme {
            day_style: DayStyle::default(),
            weekend_day_style: DayStyle::default(),
            today_day_style: DayStyle::default(),
            other_month_day_style: DayStyle::default(),
            selected_day_style: DayStyle::default(),
            today_day_char: Some('*'),
            selected_day_char: Some('+'),
            month_header_style: DayStyle::default(),
            day_header_style: DayStyle::default(),
            selector_style: DayStyle::default(),
        }
    }

    pub fn layer(&self, kind: DayKind) -> DayStyle {
        match kind {
            DayKind::Day => self.day_style,
            DayKind::Weekend => self.weekend_day_style,
            DayKind::Today => self.today_day_style,
            DayKind::OtherMonth => self.other_month_day_style,
            DayKind::Selected => self.selected_day_style,
        }
    }

    /// Layers every applicable style from weakest to strongest.
    pub fn style_for(&self, cell: &DayCell) -> DayStyle {
        DayKind::LAYERS
            .iter()
            .filter(|kind| cell.has(**kind))
            .fold(DayStyle::default(), |style, kind| style.merge(self.layer(*kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cell(selected: bool, other_month: bool, today: bool, weekend: bool) -> DayCell {
        DayCell {
            date: NaiveDate::from_ymd_opt(2024, 8, 31).unwrap(),
            day_of_month_label: "31".to_owned(),
            is_weekend: weekend,
            is_today: today,
            is_selected: selected,
            is_other_month: other_month,
            linear_offset: 0,
        }
    }

    #[test]
    fn merge_prefers_upper_layer() {
        let below = DayStyle::default().fg_color(Color::Red).bold(true);
        let above = DayStyle::default().fg_color(Color::Blue);

        assert_eq!(
            below.merge(above),
            DayStyle::default().fg_color(Color::Blue).bold(true)
        );
        assert_eq!(below.merge(DayStyle::default()), below);
    }

    #[test]
    fn other_month_beats_today_and_weekend() {
        let theme = Theme::default();
        let style = theme.style_for(&cell(false, true, true, true));

        assert_eq!(style.fg, Some(Color::LightBlack));
        // the other-month layer switches off the today inversion
        assert_eq!(style.invert, Some(false));
        // italic is only set by the today layer and shines through
        assert_eq!(style.italic, Some(true));
    }

    #[test]
    fn selected_beats_everything() {
        let theme = Theme::default();
        let style = theme.style_for(&cell(true, true, true, true));

        assert_eq!(style.fg, Some(Color::White));
        assert_eq!(style.bg, Some(Color::Blue));
    }

    #[test]
    fn today_beats_weekend() {
        let theme = Theme::default().today_fg(Color::Red);
        let style = theme.style_for(&cell(false, false, true, true));
        assert_eq!(style.fg, Some(Color::Red));

        let style = theme.style_for(&cell(false, false, false, true));
        assert_eq!(style.fg, Some(Color::Cyan));
    }

    #[test]
    fn plain_styles_print_content_only() {
        assert_eq!(DayStyle::default().paint(" 7").to_string(), " 7");

        let painted = DayStyle::default().bold(true).paint("x").to_string();
        assert!(painted.starts_with(&style::Bold.to_string()));
        assert!(painted.ends_with(&style::Reset.to_string()));
    }

    impl Theme {
        fn today_fg(mut self, color: Color) -> Self {
            self.today_day_style = self.today_day_style.fg_color(color);
            self
        }
    }
}
