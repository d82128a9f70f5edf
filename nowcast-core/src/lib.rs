//! Core library for the `nowcast` current-weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and position lookup
//! - Application state, notifications and view selection
//!
//! It is used by `nowcast-cli`, but the state and view layers are surface-agnostic.

pub mod app;
pub mod config;
pub mod location;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod view;

pub use app::{AppState, Notification, Severity, WeatherApp};
pub use config::Config;
pub use location::{Geolocator, LocationError, geolocator_from_config};
pub use model::{Condition, Coordinates, WeatherSnapshot};
pub use presentation::{Background, Presentation, WeatherIcon, present};
pub use provider::{ProviderError, WeatherProvider, provider_from_config};
pub use view::{View, render_text, select_view};
