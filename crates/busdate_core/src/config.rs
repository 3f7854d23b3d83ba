//! Date context configuration.
//!
//! Replaces process-wide defaults (today's date, the holiday calendar, the
//! default conventions) with an explicit value that callers pass around.
//! Values come from defaults, a TOML file and `BUSDATE_*` environment
//! variables, in increasing order of precedence.
//!
//! | key          | environment variable   | default      |
//! |--------------|------------------------|--------------|
//! | `base_date`  | `BUSDATE_BASE_DATE`    | system clock |
//! | `calendar`   | `BUSDATE_CALENDAR`     | `TARGET`     |
//! | `holidays`   | `BUSDATE_HOLIDAYS`     | empty        |
//! | `day_count`  | `BUSDATE_DAY_COUNT`    | `ACT/365.25` |
//! | `convention` | `BUSDATE_CONVENTION`   | `Unadjusted` |
//!
//! `holidays` (comma-separated in the environment) are only used when
//! `calendar` is `CUSTOM`.

#[cfg(feature = "serde")]
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::calendar::{Calendar, Holidays};
use crate::types::{BusinessDayConvention, Clock, Date, DayCountConvention, FixedClock, SystemClock};

const ENV_BASE_DATE: &str = "BUSDATE_BASE_DATE";
const ENV_CALENDAR: &str = "BUSDATE_CALENDAR";
const ENV_HOLIDAYS: &str = "BUSDATE_HOLIDAYS";
const ENV_DAY_COUNT: &str = "BUSDATE_DAY_COUNT";
const ENV_CONVENTION: &str = "BUSDATE_CONVENTION";

const CUSTOM_CALENDAR: &str = "CUSTOM";

/// Configuration error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting holds a value that does not parse or is not allowed.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Setting name
        key: String,
        /// Rejected value
        value: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    File(String),

    /// An environment variable could not be used.
    #[error("Environment variable error: {0}")]
    Env(String),
}

impl ConfigError {
    fn invalid(key: &str, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Date context settings.
///
/// # Examples
///
/// ```
/// use busdate_core::config::DateConfig;
/// use busdate_core::calendar::Calendar;
/// use busdate_core::types::{Clock, Date};
///
/// let config = DateConfig {
///     base_date: Some(Date::from_ymd(2016, 1, 1).unwrap()),
///     ..DateConfig::default()
/// };
/// assert_eq!(config.clock().today(), Date::from_ymd(2016, 1, 1).unwrap());
/// assert_eq!(config.calendar().unwrap(), Calendar::Target);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DateConfig {
    /// Fixed "today"; the system clock is used when absent.
    pub base_date: Option<Date>,
    /// Calendar name: `TARGET`, `WEEKEND` or `CUSTOM`.
    pub calendar: String,
    /// Holidays of the `CUSTOM` calendar.
    pub holidays: Vec<Date>,
    /// Default day count convention.
    pub day_count: DayCountConvention,
    /// Default business day convention.
    pub convention: BusinessDayConvention,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            base_date: None,
            calendar: Calendar::Target.name().to_string(),
            holidays: Vec::new(),
            day_count: DayCountConvention::default(),
            convention: BusinessDayConvention::default(),
        }
    }
}

impl DateConfig {
    /// Create a new DateConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        debug!(?config, "loaded date configuration from environment");
        Ok(config)
    }

    /// Load configuration from a TOML file
    #[cfg(feature = "serde")]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::File(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), ?config, "loaded date configuration from file");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// ```
    /// use busdate_core::config::DateConfig;
    /// use busdate_core::types::DayCountConvention;
    ///
    /// let config = DateConfig::from_toml_str(r#"
    ///     base_date = "20160101"
    ///     day_count = "30/360"
    /// "#).unwrap();
    /// assert_eq!(config.day_count, DayCountConvention::Thirty360);
    /// assert_eq!(config.calendar, "TARGET");
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DateConfig = toml::from_str(content)
            .map_err(|e| ConfigError::File(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides settings from a key lookup (environment variable names).
    ///
    /// Only keys the lookup returns a value for are touched.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_BASE_DATE) {
            let date = Date::parse(&value).map_err(|_| ConfigError::invalid(ENV_BASE_DATE, &value))?;
            self.base_date = Some(date);
        }
        if let Some(value) = lookup(ENV_CALENDAR) {
            self.calendar = value.trim().to_string();
        }
        if let Some(value) = lookup(ENV_HOLIDAYS) {
            let parts = value.split(',').map(str::trim).filter(|s| !s.is_empty());
            self.holidays = Holidays::try_from_strs(parts)
                .map_err(|e| ConfigError::Env(format!("{}: {}", ENV_HOLIDAYS, e)))?
                .iter()
                .collect();
        }
        if let Some(value) = lookup(ENV_DAY_COUNT) {
            self.day_count = DayCountConvention::from_str(&value)
                .map_err(|_| ConfigError::invalid(ENV_DAY_COUNT, &value))?;
        }
        if let Some(value) = lookup(ENV_CONVENTION) {
            self.convention = BusinessDayConvention::from_str(&value)
                .map_err(|_| ConfigError::invalid(ENV_CONVENTION, &value))?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar().map(|_| ())
    }

    /// The configured holiday calendar.
    pub fn calendar(&self) -> Result<Calendar, ConfigError> {
        if self.calendar.trim().eq_ignore_ascii_case(CUSTOM_CALENDAR) {
            return Ok(Calendar::Custom(self.holidays.iter().copied().collect()));
        }
        Calendar::from_str(&self.calendar).map_err(|_| ConfigError::invalid("calendar", &self.calendar))
    }

    /// The configured source of "today".
    pub fn clock(&self) -> Box<dyn Clock + Send + Sync> {
        match self.base_date {
            Some(date) => Box::new(FixedClock::new(date)),
            None => Box::new(SystemClock),
        }
    }
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Environment variables
/// 2. Config file
/// 3. Default values
#[cfg(feature = "serde")]
pub fn build_config(config_file: Option<&Path>) -> Result<DateConfig, ConfigError> {
    let mut config = match config_file {
        Some(path) => DateConfig::from_file(path)?,
        None => DateConfig::default(),
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DateConfig::default();
        assert_eq!(config.base_date, None);
        assert_eq!(config.calendar, "TARGET");
        assert!(config.holidays.is_empty());
        assert_eq!(config.day_count, DayCountConvention::Act36525);
        assert_eq!(config.convention, BusinessDayConvention::Unadjusted);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut config = DateConfig::default();
        config
            .apply_overrides(lookup(&[
                ("BUSDATE_BASE_DATE", "2016-01-01"),
                ("BUSDATE_CALENDAR", "custom"),
                ("BUSDATE_HOLIDAYS", "20160704, 20161226"),
                ("BUSDATE_DAY_COUNT", "30/360"),
                ("BUSDATE_CONVENTION", "MODFLW"),
            ]))
            .unwrap();

        let base = Date::from_ymd(2016, 1, 1).unwrap();
        assert_eq!(config.base_date, Some(base));
        assert_eq!(config.clock().today(), base);
        assert_eq!(config.day_count, DayCountConvention::Thirty360);
        assert_eq!(config.convention, BusinessDayConvention::ModifiedFollowing);
        match config.calendar().unwrap() {
            Calendar::Custom(holidays) => assert_eq!(holidays.len(), 2),
            other => panic!("expected custom calendar, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = DateConfig::default();
        assert_eq!(
            config.apply_overrides(lookup(&[("BUSDATE_DAY_COUNT", "ACT/999")])),
            Err(ConfigError::InvalidValue {
                key: "BUSDATE_DAY_COUNT".to_string(),
                value: "ACT/999".to_string()
            })
        );
        assert!(config
            .apply_overrides(lookup(&[("BUSDATE_BASE_DATE", "yesterday")]))
            .is_err());
        assert!(matches!(
            config.apply_overrides(lookup(&[("BUSDATE_HOLIDAYS", "20160101,junk")])),
            Err(ConfigError::Env(_))
        ));
    }

    #[test]
    fn test_unknown_calendar_fails_validation() {
        let config = DateConfig {
            calendar: "NYC".to_string(),
            ..DateConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_system_clock_without_base_date() {
        let config = DateConfig::default();
        let today = config.clock().today();
        assert!(today.year() >= 2024);
    }

    #[cfg(feature = "serde")]
    mod file_tests {
        use super::*;

        #[test]
        fn test_from_toml_str() {
            let config = DateConfig::from_toml_str(
                r#"
                base_date = 20160101
                calendar = "CUSTOM"
                holidays = ["2016-07-04", "20161226"]
                day_count = "ACT/ACT"
                convention = "Modified Following"
                "#,
            )
            .unwrap();
            assert_eq!(config.base_date, Some(Date::from_ymd(2016, 1, 1).unwrap()));
            assert_eq!(config.holidays.len(), 2);
            assert_eq!(config.day_count, DayCountConvention::ActAct);
            assert_eq!(config.convention, BusinessDayConvention::ModifiedFollowing);
        }

        #[test]
        fn test_from_toml_str_defaults_missing_keys() {
            let config = DateConfig::from_toml_str("").unwrap();
            assert_eq!(config, DateConfig::default());
        }

        #[test]
        fn test_from_toml_str_rejects_bad_values() {
            assert!(matches!(
                DateConfig::from_toml_str("day_count = \"ACT/999\""),
                Err(ConfigError::File(_))
            ));
            assert!(matches!(
                DateConfig::from_toml_str("calendar = \"NYC\""),
                Err(ConfigError::InvalidValue { .. })
            ));
        }

        #[test]
        fn test_from_file() {
            let path = std::env::temp_dir().join(format!("busdate_config_{}.toml", std::process::id()));
            std::fs::write(&path, "calendar = \"WEEKEND\"\nconvention = \"F\"\n").unwrap();
            let config = DateConfig::from_file(&path).unwrap();
            std::fs::remove_file(&path).unwrap();
            assert_eq!(config.calendar().unwrap(), Calendar::WeekendOnly);
            assert_eq!(config.convention, BusinessDayConvention::Following);
        }

        #[test]
        fn test_from_missing_file() {
            let path = std::env::temp_dir().join("busdate_config_does_not_exist.toml");
            assert!(matches!(
                DateConfig::from_file(&path),
                Err(ConfigError::File(_))
            ));
        }
    }
}
