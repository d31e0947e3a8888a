//! Display formatting for a weather reading.

use crate::types::Units;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Icon code used when the provider omits one
pub const DEFAULT_ICON: &str = "01d";

/// Rounds half up, so -2.5 becomes -2 and 2.5 becomes 3.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `21°C` / `70°F`
pub fn temperature(value: f64, units: Units) -> String {
    format!("{}°{}", round_half_up(value), units.temperature_symbol())
}

/// `3.6 m/s` / `8.1 mph`
pub fn wind_speed(value: f64, units: Units) -> String {
    format!("{:.1} {}", value, units.wind_unit())
}

/// Large (2x) icon URL for an OpenWeather icon code
pub fn icon_url(icon: Option<&str>) -> String {
    format!("{}/{}@2x.png", ICON_BASE_URL, icon.unwrap_or(DEFAULT_ICON))
}

/// `Paris, FR`, or just `Paris` when the country is unknown
pub fn place_label(name: &str, country: Option<&str>) -> String {
    format!("{}, {}", name, country.unwrap_or_default())
        .trim()
        .trim_end_matches(',')
        .trim()
        .to_string()
}
