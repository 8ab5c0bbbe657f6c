//! Startup configuration.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `GREENFIELD_*` environment variables. The
//! result is resolved once into [`Settings`] and passed down explicitly.
//!
//! ```toml
//! api_base_url = "http://fab-gateway:8000/api/v1"
//! latest_interval = "2s"
//! history_interval = "5s"
//!
//! [chart]
//! y_min = 175.0
//! y_max = 195.0
//! safety_limit = 188.0
//! ```
//!
//! Environment examples: `GREENFIELD_API_BASE_URL`,
//! `GREENFIELD_HISTORY_INTERVAL=10s`, `GREENFIELD_CHART__SAFETY_LIMIT=190`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GREENFIELD";

/// Raw settings as read from defaults, file and environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the telemetry API.
    pub api_base_url: String,
    /// Period of the latest-snapshot poll.
    pub latest_interval: String,
    /// Period of the history poll.
    pub history_interval: String,
    /// Period of the quarantine-log poll.
    pub quarantine_interval: String,
    /// Where log output goes (the terminal belongs to the UI).
    pub log_file: PathBuf,
    /// Yield chart rendering.
    pub chart: ChartSettings,
}

/// Yield chart rendering settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartSettings {
    /// Lower bound of the fixed Y axis, °C.
    pub y_min: f64,
    /// Upper bound of the fixed Y axis, °C.
    pub y_max: f64,
    /// Length of the line transition when new data arrives.
    pub transition: String,
    /// Interlock threshold drawn as a horizontal line, °C.
    pub safety_limit: f64,
}

/// Poll periods resolved from the interval strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub latest: Duration,
    pub history: Duration,
    pub quarantine: Duration,
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Self::environment());

        Self::build(builder)
    }

    /// `GREENFIELD_API_BASE_URL`, `GREENFIELD_CHART__Y_MIN`, ...
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("latest_interval", "2s")?
            .set_default("history_interval", "5s")?
            .set_default("quarantine_interval", "10s")?
            .set_default("log_file", "fabwatch.log")?
            .set_default("chart.y_min", 175.0)?
            .set_default("chart.y_max", 195.0)?
            .set_default("chart.transition", "300ms")?
            .set_default("chart.safety_limit", 188.0)?)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the dashboard cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }
        let intervals = self.intervals()?;
        for (name, period) in [
            ("latest_interval", intervals.latest),
            ("history_interval", intervals.history),
            ("quarantine_interval", intervals.quarantine),
        ] {
            if period.is_zero() {
                bail!("{} must be greater than zero", name);
            }
        }
        self.chart.transition()?;
        if self.chart.y_min >= self.chart.y_max {
            bail!(
                "chart.y_min ({}) must be below chart.y_max ({})",
                self.chart.y_min,
                self.chart.y_max
            );
        }
        Ok(())
    }

    /// Parse the poll periods.
    pub fn intervals(&self) -> Result<Intervals> {
        Ok(Intervals {
            latest: parse_interval("latest_interval", &self.latest_interval)?,
            history: parse_interval("history_interval", &self.history_interval)?,
            quarantine: parse_interval("quarantine_interval", &self.quarantine_interval)?,
        })
    }
}

impl ChartSettings {
    /// Parse the transition length.
    pub fn transition(&self) -> Result<Duration> {
        parse_interval("chart.transition", &self.transition)
    }
}

fn parse_interval(name: &str, value: &str) -> Result<Duration> {
    parse_duration(value).with_context(|| format!("Invalid {}: {:?}", name, value))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            latest_interval: "2s".to_string(),
            history_interval: "5s".to_string(),
            quarantine_interval: "10s".to_string(),
            log_file: PathBuf::from("fabwatch.log"),
            chart: ChartSettings::default(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            y_min: 175.0,
            y_max: 195.0,
            transition: "300ms".to_string(),
            safety_limit: 188.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::io::Write;

    fn from_toml(toml: &str) -> Result<Settings> {
        Settings::build(Settings::defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(
            settings.intervals().unwrap(),
            Intervals {
                latest: Duration::from_secs(2),
                history: Duration::from_secs(5),
                quarantine: Duration::from_secs(10),
            }
        );
        assert_eq!(settings.chart.y_min, 175.0);
        assert_eq!(settings.chart.y_max, 195.0);
        assert_eq!(settings.chart.transition().unwrap(), Duration::from_millis(300));
        assert_eq!(settings.chart.safety_limit, 188.0);
    }

    #[test]
    fn test_matches_default_impl() {
        let loaded = from_toml("").unwrap();
        let built = Settings::default();
        assert_eq!(loaded.api_base_url, built.api_base_url);
        assert_eq!(loaded.intervals().unwrap(), built.intervals().unwrap());
        assert_eq!(loaded.log_file, built.log_file);
    }

    #[test]
    fn test_file_overrides() {
        let settings = from_toml(
            r#"
            api_base_url = "http://fab-gateway:8000/api/v1"
            history_interval = "10s"

            [chart]
            safety_limit = 190.5
            "#,
        )
        .unwrap();

        assert_eq!(settings.api_base_url, "http://fab-gateway:8000/api/v1");
        assert_eq!(settings.intervals().unwrap().history, Duration::from_secs(10));
        assert_eq!(settings.intervals().unwrap().latest, Duration::from_secs(2));
        assert_eq!(settings.chart.safety_limit, 190.5);
        assert_eq!(settings.chart.y_min, 175.0);
    }

    #[test]
    fn test_environment_overrides_file() {
        let vars: config::Map<String, String> = [
            ("GREENFIELD_API_BASE_URL", "http://env-host:9/api/v1"),
            ("GREENFIELD_CHART__Y_MIN", "170"),
            ("GREENFIELD_HISTORY_INTERVAL", "7s"),
            ("OTHER_API_BASE_URL", "http://ignored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let builder = Settings::defaults()
            .unwrap()
            .add_source(File::from_str("history_interval = \"10s\"", FileFormat::Toml))
            .add_source(Settings::environment().source(Some(vars)));
        let settings = Settings::build(builder).unwrap();

        assert_eq!(settings.api_base_url, "http://env-host:9/api/v1");
        assert_eq!(settings.chart.y_min, 170.0);
        assert_eq!(settings.chart.y_max, 195.0);
        assert_eq!(settings.intervals().unwrap().history, Duration::from_secs(7));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "latest_interval = \"500ms\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.intervals().unwrap().latest, Duration::from_millis(500));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Settings::load(Some(Path::new("/nonexistent/fabwatch.toml"))).is_err());
    }

    #[test]
    fn test_rejects_bad_interval() {
        let err = from_toml("latest_interval = \"often\"").unwrap_err();
        assert!(format!("{:#}", err).contains("latest_interval"));
    }

    #[test]
    fn test_rejects_zero_interval() {
        assert!(from_toml("history_interval = \"0s\"").is_err());
    }

    #[test]
    fn test_rejects_inverted_axis() {
        assert!(from_toml("[chart]\ny_min = 195.0\ny_max = 175.0").is_err());
    }
}
