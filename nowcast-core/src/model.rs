use chrono::{DateTime, Utc};

/// A latitude/longitude pair in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// One entry of the provider's condition list.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Primary category, e.g. "Rain" or "Clouds".
    pub category: String,
    pub description: String,
    pub icon_code: String,
}

/// The most recent successfully parsed current-weather result.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    /// Never empty; the provider layer rejects responses without conditions.
    pub conditions: Vec<Condition>,
    pub wind_speed_mps: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    /// The first condition, the only one consulted for display.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_validate_ranges() {
        assert!(Coordinates::new(48.85, 2.35).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn coordinates_display_uses_four_decimals() {
        assert_eq!(Coordinates::new(48.856613, 2.352222).to_string(), "(48.8566, 2.3522)");
    }
}
