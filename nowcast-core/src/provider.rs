use crate::{
    Config, WeatherSnapshot,
    model::Coordinates,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Failures of a single current-weather lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to weather provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather provider response is malformed: {0}")]
    MalformedResponse(String),
}

/// Source of current-weather snapshots.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherSnapshot, ProviderError>;

    async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: run `nowcast configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(
        api_key.to_owned(),
        config.openweather.base_url.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("nowcast configure"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn status_error_message_carries_status_and_body() {
        let err = ProviderError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "city not found".into(),
        };

        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("city not found"));
    }
}
