//! View-state selection and plain-text rendering.

use std::fmt::Write as _;

use crate::{
    app::AppState,
    model::WeatherSnapshot,
    presentation::{Background, WeatherIcon, present},
};

pub const LOADING_CAPTION: &str = "Loading weather data...";
pub const WELCOME_TITLE: &str = "Welcome to Weather App";
pub const WELCOME_TEXT: &str = "Search for a city or use your current location to get started.";

/// Display-ready strings for a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub heading: String,
    pub icon: WeatherIcon,
    pub background: Background,
    pub temperature: String,
    pub feels_like: String,
    pub description: String,
    pub wind: String,
    pub humidity: String,
    pub pressure: String,
    pub observed: Option<String>,
}

impl ResultView {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let (category, description) = snapshot
            .primary_condition()
            .map(|c| (c.category.as_str(), c.description.clone()))
            .unwrap_or(("", String::new()));
        let presentation = present(category);

        Self {
            heading: format!("{}, {}", snapshot.location_name, snapshot.country_code),
            icon: presentation.icon,
            background: presentation.background,
            temperature: format!("{}°C", round_half_up(snapshot.temperature_c)),
            feels_like: format!("Feels like {}°C", round_half_up(snapshot.feels_like_c)),
            description,
            wind: format!("{} m/s", snapshot.wind_speed_mps),
            humidity: format!("{}%", snapshot.humidity_pct),
            pressure: format!("{} hPa", snapshot.pressure_hpa),
            observed: snapshot.observed_at.map(|t| format!("Observed {} UTC", t.format("%H:%M"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Result(ResultView),
    Welcome,
}

/// State of the two action controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub search_enabled: bool,
    pub locate_enabled: bool,
    pub locate_label: &'static str,
}

impl Controls {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            search_enabled: !state.fetch_in_progress,
            locate_enabled: !state.locating_in_progress,
            locate_label: if state.locating_in_progress { "Locating..." } else { "My Location" },
        }
    }
}

/// Loading wins over everything, then a result, then the welcome card.
pub fn select_view(state: &AppState) -> View {
    if state.fetch_in_progress {
        return View::Loading;
    }

    match &state.snapshot {
        Some(snapshot) => View::Result(ResultView::from_snapshot(snapshot)),
        None => View::Welcome,
    }
}

pub fn page_background(state: &AppState) -> Background {
    state
        .snapshot
        .as_ref()
        .and_then(|s| s.primary_condition())
        .map(|c| present(&c.category).background)
        .unwrap_or_default()
}

/// Rounds halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Render the whole page for a terminal.
pub fn render_text(state: &AppState) -> String {
    let mut out = String::new();
    let controls = Controls::from_state(state);

    let _ = writeln!(out, "Weather App  [{}]", page_background(state));
    let _ = writeln!(
        out,
        "[Search{}]  [{}{}]",
        if controls.search_enabled { "" } else { " (busy)" },
        controls.locate_label,
        if controls.locate_enabled { "" } else { " (busy)" },
    );
    out.push('\n');

    match select_view(state) {
        View::Loading => {
            let _ = writeln!(out, "  ⟳ {LOADING_CAPTION}");
        }
        View::Welcome => {
            let _ = writeln!(out, "  {} {WELCOME_TITLE}", WeatherIcon::Sun.glyph());
            let _ = writeln!(out, "  {WELCOME_TEXT}");
        }
        View::Result(view) => {
            let _ = writeln!(out, "  {}", view.heading);
            let _ = writeln!(out, "  {}  {}", view.icon.glyph(), view.temperature);
            let _ = writeln!(out, "  {}", view.description);
            let _ = writeln!(out, "  {}", view.feels_like);
            out.push('\n');
            let _ = writeln!(out, "  Wind Speed  {}", view.wind);
            let _ = writeln!(out, "  Humidity    {}", view.humidity);
            let _ = writeln!(out, "  Pressure    {}", view.pressure);
            if let Some(observed) = &view.observed {
                let _ = writeln!(out, "  {observed}");
            }
        }
    }

    out
}
