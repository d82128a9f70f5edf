//! Condition category → icon and background lookup.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Sun,
    Cloud,
    Rain,
    Snow,
}

impl WeatherIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::Sun => "sun",
            WeatherIcon::Cloud => "cloud",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Snow => "snow",
        }
    }

    /// Terminal glyph for the icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀",
            WeatherIcon::Cloud => "☁",
            WeatherIcon::Rain => "☂",
            WeatherIcon::Snow => "❄",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Background {
    Sunny,
    Cloud,
    #[default]
    Sky,
}

impl Background {
    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Sunny => "sunny-gradient",
            Background::Cloud => "cloud-gradient",
            Background::Sky => "sky-gradient",
        }
    }
}

impl std::fmt::Display for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub icon: WeatherIcon,
    pub background: Background,
}

/// Map a primary condition category onto its icon and background.
///
/// Matching is case-insensitive and total: anything outside the table,
/// including the empty string, gets the sun/sky fallback.
pub fn present(category: &str) -> Presentation {
    let (icon, background) = match category.to_lowercase().as_str() {
        "clear" => (WeatherIcon::Sun, Background::Sunny),
        "clouds" => (WeatherIcon::Cloud, Background::Cloud),
        "rain" | "drizzle" => (WeatherIcon::Rain, Background::Sky),
        "snow" => (WeatherIcon::Snow, Background::Sky),
        _ => (WeatherIcon::Sun, Background::Sky),
    };

    Presentation { icon, background }
}
