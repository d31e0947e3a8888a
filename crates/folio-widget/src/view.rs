//! Output side of the widget: the rendered card, status line and toasts.

use std::time::{Duration, Instant};

use folio_weather::{format, Theme, Units, WeatherReading};

const NO_DESCRIPTION: &str = "—";
const DEFAULT_ICON_ALT: &str = "Weather icon";

/// Fixed display slots filled from one reading
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub place: String,
    pub description: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
}

impl WeatherCard {
    pub fn from_reading(reading: &WeatherReading, units: Units) -> Self {
        let description = reading.description();
        Self {
            place: format::place_label(reading.place_name().unwrap_or_default(), reading.country()),
            description: description.unwrap_or(NO_DESCRIPTION).to_string(),
            icon_url: format::icon_url(reading.icon()),
            icon_alt: description.unwrap_or(DEFAULT_ICON_ALT).to_string(),
            temperature: format::temperature(reading.main.temp, units),
            feels_like: format!(
                "Feels like {}",
                format::temperature(reading.main.feels_like, units)
            ),
            humidity: format!("Humidity {}%", reading.main.humidity),
            wind: format!("Wind {}", format::wind_speed(reading.wind.speed, units)),
            pressure: format!("Pressure {} hPa", reading.main.pressure),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTone {
    #[default]
    Muted,
    Error,
}

/// The status line under the search box
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub text: String,
    pub tone: StatusTone,
}

impl Status {
    pub fn muted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Muted,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: StatusTone::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

/// Receives every visible change the widget makes.
///
/// All methods default to doing nothing so a view only implements the slots
/// it displays.
pub trait WidgetView {
    fn render_card(&mut self, _card: &WeatherCard) {}
    fn set_status(&mut self, _status: &Status) {}
    fn set_loading(&mut self, _loading: bool) {}
    fn show_toast(&mut self, _toast: &Toast) {}
    fn render_recents(&mut self, _cities: &[String]) {}
    fn set_units(&mut self, _units: Units) {}
    fn set_theme(&mut self, _theme: Theme) {}
}

/// Observable snapshot of everything the widget has shown
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub card: Option<WeatherCard>,
    pub status: Status,
    pub loading: bool,
    pub toasts: Vec<Toast>,
    pub recents: Vec<String>,
    pub units: Units,
    pub theme: Theme,
}

impl ViewModel {
    /// Drop toasts whose lifetime has passed
    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired(now));
    }

    pub fn last_toast(&self) -> Option<&Toast> {
        self.toasts.last()
    }
}

impl WidgetView for ViewModel {
    fn render_card(&mut self, card: &WeatherCard) {
        self.card = Some(card.clone());
    }

    fn set_status(&mut self, status: &Status) {
        self.status = status.clone();
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn show_toast(&mut self, toast: &Toast) {
        self.prune_toasts(Instant::now());
        self.toasts.push(toast.clone());
    }

    fn render_recents(&mut self, cities: &[String]) {
        self.recents = cities.to_vec();
    }

    fn set_units(&mut self, units: Units) {
        self.units = units;
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}
