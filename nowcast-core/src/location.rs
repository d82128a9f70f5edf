//! Position lookup for "use current location".
//!
//! The host capability is modelled as an optional [`Geolocator`]. With no
//! pinned coordinates and no geolocation service there is no locator at all
//! and the lookup fails as [`LocationError::Unsupported`]. A user who declined
//! geolocation gets a [`DeclinedGeolocator`] that always reports
//! [`LocationError::PermissionDenied`]. Otherwise the position comes either
//! from coordinates pinned in the config ([`FixedGeolocator`]) or from an IP
//! geolocation service ([`IpGeolocator`]).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{config::GeolocationConfig, model::Coordinates};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocationError {
    #[error("geolocation is not available on this system")]
    Unsupported,

    #[error("permission to read the current position was denied")]
    PermissionDenied,

    #[error("timed out while resolving the current position")]
    Timeout,

    #[error("current position unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Build the geolocation capability described by the config, if any.
pub fn geolocator_from_config(config: &GeolocationConfig) -> Option<Box<dyn Geolocator>> {
    if !config.enabled {
        debug!("geolocation declined in config");
        return Some(Box::new(DeclinedGeolocator));
    }

    let locator: Box<dyn Geolocator> = match config.pinned() {
        Some(coords) => Box::new(FixedGeolocator::new(coords)),
        None if config.service_url.trim().is_empty() => {
            debug!("no pinned coordinates and no geolocation service");
            return None;
        }
        None => Box::new(IpGeolocator::new(config.service_url.clone(), config.timeout())),
    };

    Some(locator)
}

/// Stands in for a position source the user has not allowed.
#[derive(Debug, Clone, Copy)]
pub struct DeclinedGeolocator;

#[async_trait]
impl Geolocator for DeclinedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}

/// Returns coordinates pinned in the config file.
#[derive(Debug, Clone)]
pub struct FixedGeolocator {
    coords: Coordinates,
}

impl FixedGeolocator {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        if !self.coords.is_valid() {
            warn!(coords = %self.coords, "pinned coordinates out of range");
            return Err(LocationError::Unavailable(format!(
                "invalid pinned coordinates {}",
                self.coords
            )));
        }

        Ok(self.coords)
    }
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    service_url: String,
    http: Client,
    timeout: Duration,
}

impl IpGeolocator {
    pub fn new(service_url: String, timeout: Duration) -> Self {
        Self { service_url, http: Client::new(), timeout }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
}

fn map_request_error(err: reqwest::Error) -> LocationError {
    if err.is_timeout() {
        LocationError::Timeout
    } else {
        LocationError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    #[instrument(skip(self), fields(service = %self.service_url))]
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        debug!("requesting ip geolocation");

        let res = self
            .http
            .get(&self.service_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = res.status();
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!(
                "geolocation service returned status {status}"
            )));
        }

        let body: IpApiResponse = res.json().await.map_err(map_request_error)?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            return Err(LocationError::Unavailable(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                let coords = Coordinates::new(lat, lon);
                info!(%coords, city = body.city.as_deref().unwrap_or("?"), "ip geolocation resolved");
                Ok(coords)
            }
            _ => Err(LocationError::Unavailable(
                "geolocation response missing coordinates".to_string(),
            )),
        }
    }
}
