use chrono::{Local, NaiveDate, Utc, Weekday};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::{CalendarKind, CalendarSystem, FirstDayOfWeek};
use crate::error::{Error, ErrorKind, Result};
use crate::selection::SelectionMode;

const CONFIG_PATH_ENV_VAR: &str = "CALGRID_CONFIG_FILE";

pub fn find_configfile_locations() -> Result<Vec<PathBuf>> {
    let home = dirs::home_dir().ok_or_else(|| {
        Error::new(
            ErrorKind::IOError(std::io::ErrorKind::NotFound.into()),
            "Unable to find home directory",
        )
    })?;

    let config_xdg = dirs::config_dir()
        .unwrap_or_else(|| home.join(".config"))
        .join("calgrid")
        .join("config.toml");

    let mut locations = vec![config_xdg, home.join(".calgrid.toml")];

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.insert(0, PathBuf::from(path));
    }

    Ok(locations)
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub calendar: CalendarKind,
    pub first_day_of_week: FirstDayOfWeek,
    #[serde_as(as = "DisplayFromStr")]
    pub culture_first_day: Weekday,
    pub selection_mode: SelectionMode,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub timezone: Option<chrono_tz::Tz>,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar: CalendarKind::default(),
            first_day_of_week: FirstDayOfWeek::Default,
            culture_first_day: Weekday::Sun,
            selection_mode: SelectionMode::default(),
            timezone: None,
            color: true,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| {
            let msg = format!(
                "{}: {}",
                path.display(),
                e.message.as_deref().unwrap_or_default()
            );
            e.with_msg(&msg)
        })
    }

    pub fn calendar_system(&self) -> Box<dyn CalendarSystem> {
        self.calendar.system(self.culture_first_day)
    }

    /// Current date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        match &self.timezone {
            Some(tz) => Utc::now().with_timezone(tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// Loads `path` if given, otherwise the first existing file of
/// `find_configfile_locations`. Falls back to defaults if there is none.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    for location in find_configfile_locations()? {
        if location.is_file() {
            log::info!("Loading config from {}", location.display());
            return Config::load(&location);
        }
    }

    log::info!("No config file found, using defaults");
    Ok(Config::default())
}
