//! Application state and the operations that mutate it.
//!
//! [`WeatherApp`] owns the single snapshot slot, the search input, the two
//! progress flags and the pending notifications. Every failure is turned into
//! a [`Notification`] here; nothing propagates to the caller.

use tracing::{debug, info, warn};

use crate::{
    location::{Geolocator, LocationError},
    model::{Coordinates, WeatherSnapshot},
    provider::{ProviderError, WeatherProvider},
};

pub const ERROR_TITLE: &str = "Error";
pub const LOCATION_ERROR_TITLE: &str = "Location Error";
pub const FETCH_FAILED: &str = "Failed to fetch weather data. Please try again.";
pub const CITY_NOT_FOUND: &str = "City not found. Please check the spelling and try again.";
pub const GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported on this system.";
pub const LOCATION_UNAVAILABLE: &str =
    "Unable to retrieve your location. Please search for a city instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Normal,
    Destructive,
}

/// A transient, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notification {
    pub fn destructive(title: &str, body: &str) -> Self {
        Self { title: title.to_string(), body: body.to_string(), severity: Severity::Destructive }
    }
}

/// Everything the renderer needs.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Raw text of the search field.
    pub input: String,
    pub fetch_in_progress: bool,
    pub locating_in_progress: bool,
    /// Last successful result; failed lookups never clear it.
    pub snapshot: Option<WeatherSnapshot>,
    pub notifications: Vec<Notification>,
}

/// Which entry point issued a fetch; decides the failure wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Coordinates,
    CityName,
}

impl Lookup {
    fn failure_body(self) -> &'static str {
        match self {
            Lookup::Coordinates => FETCH_FAILED,
            Lookup::CityName => CITY_NOT_FOUND,
        }
    }
}

/// Called with the new state after every change, so a surface can re-render.
pub type StateObserver = Box<dyn FnMut(&AppState) + Send>;

pub struct WeatherApp {
    state: AppState,
    provider: Box<dyn WeatherProvider>,
    geolocator: Option<Box<dyn Geolocator>>,
    observer: Option<StateObserver>,
    mounted: bool,
}

impl std::fmt::Debug for WeatherApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApp")
            .field("state", &self.state)
            .field("provider", &self.provider)
            .field("geolocator", &self.geolocator)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl WeatherApp {
    pub fn new(provider: Box<dyn WeatherProvider>, geolocator: Option<Box<dyn Geolocator>>) -> Self {
        Self { state: AppState::default(), provider, geolocator, observer: None, mounted: false }
    }

    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Drain pending notifications in the order they were raised.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.state.notifications)
    }

    pub fn set_input(&mut self, text: &str) {
        self.state.input = text.to_string();
        self.changed();
    }

    /// Runs the automatic current-location lookup, once per app.
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.use_current_location().await;
    }

    /// Search for the trimmed input; blank input does nothing at all.
    pub async fn submit_search(&mut self) {
        let name = self.state.input.trim().to_string();
        if name.is_empty() {
            debug!("ignoring blank search");
            return;
        }
        self.fetch_by_city_name(&name).await;
    }

    pub async fn use_current_location(&mut self) {
        if self.geolocator.is_none() {
            warn!("geolocation capability absent");
            self.notify(Notification::destructive(ERROR_TITLE, GEOLOCATION_UNSUPPORTED));
            return;
        }

        self.state.locating_in_progress = true;
        self.changed();

        let position = match &self.geolocator {
            Some(locator) => locator.current_position().await,
            None => Err(LocationError::Unsupported),
        };

        match position {
            Ok(coords) => {
                info!(%coords, "current position resolved");
                // The locating flag drops as soon as the fetch is under way,
                // not when it completes.
                self.begin_fetch();
                self.state.locating_in_progress = false;
                self.changed();

                let result = self.provider.current_by_coordinates(coords).await;
                self.complete_fetch(result, Lookup::Coordinates);
            }
            Err(err) => {
                warn!(error = %err, "could not resolve current position");
                self.state.locating_in_progress = false;
                self.notify(Notification::destructive(LOCATION_ERROR_TITLE, LOCATION_UNAVAILABLE));
            }
        }
    }

    pub async fn fetch_by_coordinates(&mut self, coords: Coordinates) {
        self.begin_fetch();
        self.changed();
        let result = self.provider.current_by_coordinates(coords).await;
        self.complete_fetch(result, Lookup::Coordinates);
    }

    pub async fn fetch_by_city_name(&mut self, name: &str) {
        self.begin_fetch();
        self.changed();
        let result = self.provider.current_by_city(name).await;
        self.complete_fetch(result, Lookup::CityName);
    }

    fn begin_fetch(&mut self) {
        self.state.fetch_in_progress = true;
    }

    fn complete_fetch(&mut self, result: Result<WeatherSnapshot, ProviderError>, lookup: Lookup) {
        self.state.fetch_in_progress = false;

        match result {
            Ok(snapshot) => {
                self.state.snapshot = Some(snapshot);
                self.changed();
            }
            Err(err) => {
                warn!(error = %err, ?lookup, "weather lookup failed");
                self.notify(Notification::destructive(ERROR_TITLE, lookup.failure_body()));
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.state.notifications.push(notification);
        self.changed();
    }

    fn changed(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state);
        }
    }
}
