use famcal_core::range::RangeLimits;
use famcal_core::timezone::validate_timezone;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

const CONFIG_FILE: &str = "famcal.toml";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// SQLite file holding the calendar
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Window used by `occurrences` when no end is given
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
    /// Timezone for new events and for resolving "today"
    #[serde(default = "detect_system_timezone")]
    pub default_timezone: String,
    /// Family used when `--family` is not given
    #[serde(default)]
    pub default_family: Option<String>,
    #[serde(default)]
    pub limits: RangeLimits,
}

fn default_database_path() -> String {
    "famcal.db".to_string()
}

fn default_window_days() -> u32 {
    30
}

impl Config {
    /// Reads `famcal.toml` (or the file named by `FAMCAL_CONFIG`), then
    /// `FAMCAL_*` variables. Nested keys use a double underscore, e.g.
    /// `FAMCAL_LIMITS__MAX_INSTANCES`.
    pub fn new() -> Result<Self, figment::Error> {
        let file = std::env::var("FAMCAL_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(file))
                .merge(Env::prefixed("FAMCAL_").ignore(&["config", "log"]).split("__")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let config: Config = figment.extract()?;
        if config.default_window_days == 0 {
            return Err(figment::Error::from("default_window_days must be at least 1".to_string()));
        }
        if let Err(e) = validate_timezone(&config.default_timezone) {
            return Err(figment::Error::from(e.to_string()));
        }
        Ok(config)
    }
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(local_tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&local_tz).is_ok() {
            return local_tz;
        }
    }

    "UTC".to_string()
}
