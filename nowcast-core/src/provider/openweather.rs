use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::model::{Condition, Coordinates, WeatherSnapshot};

use super::{ProviderError, WeatherProvider};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, query: &[(&str, &str)]) -> Result<WeatherSnapshot, ProviderError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status { status, body: truncate_body(&body) });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        let snapshot = parsed.into_snapshot()?;

        info!(
            location = %snapshot.location_name,
            country = %snapshot.country_code,
            temp = snapshot.temperature_c,
            "current weather resolved"
        );

        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    dt: Option<i64>,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, ProviderError> {
        if self.weather.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "response contained no weather conditions".to_string(),
            ));
        }

        let conditions = self
            .weather
            .into_iter()
            .map(|w| Condition { category: w.main, description: w.description, icon_code: w.icon })
            .collect();

        Ok(WeatherSnapshot {
            location_name: self.name,
            country_code: self.sys.country,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            conditions,
            wind_speed_mps: self.wind.speed,
            observed_at: self.dt.and_then(unix_to_utc),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(lat = coords.latitude, lon = coords.longitude))]
    async fn current_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherSnapshot, ProviderError> {
        debug!("requesting current weather by coordinates");
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        self.fetch_current(&[("lat", lat.as_str()), ("lon", lon.as_str())]).await
    }

    #[instrument(skip(self))]
    async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot, ProviderError> {
        debug!("requesting current weather by city name");
        self.fetch_current(&[("q", city)]).await
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris_json() -> &'static str {
        r#"{
            "name": "Paris",
            "dt": 1700000000,
            "sys": {"country": "FR"},
            "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 60, "pressure": 1012},
            "weather": [
                {"main": "Rain", "description": "light rain", "icon": "10d"},
                {"main": "Mist", "description": "mist", "icon": "50d"}
            ],
            "wind": {"speed": 3.1}
        }"#
    }

    #[test]
    fn maps_response_into_snapshot() {
        let parsed: OwCurrentResponse = serde_json::from_str(paris_json()).unwrap();
        let snap = parsed.into_snapshot().unwrap();

        assert_eq!(snap.location_name, "Paris");
        assert_eq!(snap.country_code, "FR");
        assert_eq!(snap.humidity_pct, 60);
        assert_eq!(snap.pressure_hpa, 1012);
        assert_eq!(snap.conditions.len(), 2);
        assert_eq!(snap.primary_condition().unwrap().category, "Rain");
        assert_eq!(snap.primary_condition().unwrap().icon_code, "10d");
        assert_eq!(snap.observed_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn icon_and_dt_are_optional() {
        let json = r#"{
            "name": "Paris",
            "sys": {"country": "FR"},
            "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 60, "pressure": 1012},
            "weather": [{"main": "Rain", "description": "light rain"}],
            "wind": {"speed": 3.1}
        }"#;
        let snap = serde_json::from_str::<OwCurrentResponse>(json).unwrap().into_snapshot().unwrap();

        assert_eq!(snap.primary_condition().unwrap().icon_code, "");
        assert!(snap.observed_at.is_none());
    }

    #[test]
    fn empty_weather_list_is_malformed() {
        let json = r#"{
            "name": "Void",
            "sys": {"country": "XX"},
            "main": {"temp": 1.0, "feels_like": 1.0, "humidity": 1, "pressure": 1000},
            "weather": [],
            "wind": {"speed": 0.0}
        }"#;
        let err = serde_json::from_str::<OwCurrentResponse>(json).unwrap().into_snapshot().unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let p = OpenWeatherProvider::new("k".into(), "http://localhost:1234/".into());
        assert_eq!(p.base_url, "http://localhost:1234");
    }
}
