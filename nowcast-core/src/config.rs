use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::warn;

use crate::model::Coordinates;

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// OpenWeather endpoint and credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    /// Not a secret: each deployment is expected to bring its own key.
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: default_base_url() }
    }
}

/// How "use current location" obtains a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// When false the user has declined and lookups fail as permission denied.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_geo_service_url")]
    pub service_url: String,

    #[serde(default = "default_geo_timeout")]
    pub timeout_secs: u64,

    /// Example TOML:
    /// [geolocation]
    /// latitude = 48.8566
    /// longitude = 2.3522
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_url: default_geo_service_url(),
            timeout_secs: default_geo_timeout(),
            latitude: None,
            longitude: None,
        }
    }
}

impl GeolocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Coordinates pinned in the config file, if both halves are present.
    pub fn pinned(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            (None, None) => None,
            (lat, lon) => {
                warn!(?lat, ?lon, "only one of latitude/longitude set; ignoring pinned location");
                None
            }
        }
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_service_url() -> String {
    "http://ip-api.com/json/?fields=status,message,lat,lon,city".to_string()
}

const fn default_geo_timeout() -> u64 {
    10
}

const fn default_true() -> bool {
    true
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub openweather: OpenWeatherConfig,

    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nowcast", "nowcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_key_override(std::env::var(API_KEY_ENV).ok())
    }

    fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.openweather.api_key = Some(key.trim().to_string());
        }
        self
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Returns the API key, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openweather_and_enable_geolocation() {
        let cfg = Config::default();

        assert_eq!(cfg.openweather.base_url, "https://api.openweathermap.org/data/2.5");
        assert!(cfg.api_key().is_none());
        assert!(cfg.geolocation.enabled);
        assert_eq!(cfg.geolocation.timeout(), Duration::from_secs(10));
        assert!(cfg.geolocation.pinned().is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg = Config::from_toml(
            r#"
            [openweather]
            api_key = "abc"

            [geolocation]
            enabled = false
            latitude = 48.85
            longitude = 2.35
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.api_key(), Some("abc"));
        assert_eq!(cfg.openweather.base_url, "https://api.openweathermap.org/data/2.5");
        assert!(!cfg.geolocation.enabled);
        assert_eq!(cfg.geolocation.pinned(), Some(Coordinates::new(48.85, 2.35)));
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = Config::from_toml("").expect("empty config must parse");
        assert!(cfg.api_key().is_none());
        assert!(cfg.geolocation.enabled);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn env_override_replaces_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE".into());

        let cfg = cfg.with_api_key_override(Some(" ENV ".into()));
        assert_eq!(cfg.api_key(), Some("ENV"));

        let cfg = cfg.with_api_key_override(Some("".into()));
        assert_eq!(cfg.api_key(), Some("ENV"));
    }

    #[test]
    fn half_pinned_coordinates_are_ignored() {
        let cfg = Config::from_toml("[geolocation]\nlatitude = 10.0\n").unwrap();
        assert!(cfg.geolocation.pinned().is_none());

        let cfg = Config::from_toml("[geolocation]\nlongitude = 20.0\n").unwrap();
        assert!(cfg.geolocation.pinned().is_none());
    }

    #[test]
    fn toml_roundtrip_keeps_settings() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.geolocation.enabled = false;

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.api_key(), Some("KEY"));
        assert!(!back.geolocation.enabled);
    }
}
