//! The widget controller.
//!
//! User actions return a `FetchTicket` when they need data. The caller runs
//! the fetch and passes the outcome to `complete` with the ticket's sequence
//! number. Only the most recently issued ticket is applied, so a slow
//! response can never overwrite a newer one.

use std::time::Duration;

use folio_core::WidgetConfig;
use folio_weather::{
    Coordinates, LocationError, PositionOptions, Theme, Units, WeatherQuery, WeatherReading,
};

use crate::error::WidgetError;
use crate::preferences::{PreferenceStore, Preferences};
use crate::view::{Status, Toast, ToastKind, WeatherCard, WidgetView};

/// Tunables taken from `WidgetConfig`
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub fallback_city: String,
    pub geolocation_timeout: Duration,
    pub toast_ttl: Duration,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self::from_config(&WidgetConfig::default())
    }
}

impl WidgetSettings {
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            fallback_city: config.fallback_city.clone(),
            geolocation_timeout: Duration::from_millis(config.geolocation_timeout_ms),
            toast_ttl: Duration::from_millis(config.toast_ms),
        }
    }
}

/// A fetch the widget wants performed
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    seq: u64,
    query: WeatherQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &WeatherQuery {
        &self.query
    }
}

pub struct WeatherWidget<S: PreferenceStore, V: WidgetView> {
    prefs: Preferences,
    store: S,
    view: V,
    settings: WidgetSettings,
    issued: u64,
    loading: bool,
}

impl<S: PreferenceStore, V: WidgetView> WeatherWidget<S, V> {
    /// Load preferences once. A broken store falls back to defaults.
    pub fn new(store: S, view: V, settings: WidgetSettings) -> Self {
        let prefs = store.load().unwrap_or_else(|e| {
            tracing::warn!("Could not load preferences, using defaults: {}", e);
            Preferences::default()
        });

        Self {
            prefs,
            store,
            view,
            settings,
            issued: 0,
            loading: false,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sequence number of the newest ticket, 0 before the first one
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// Render persisted state, then fetch the last place or the fallback city.
    pub fn start(&mut self) -> Option<FetchTicket> {
        self.view.set_units(self.prefs.units);
        self.view.set_theme(self.prefs.theme);
        self.view.render_recents(&self.prefs.recent_cities);

        let initial = self
            .prefs
            .last_query()
            .map(str::to_string)
            .unwrap_or_else(|| self.settings.fallback_city.clone());
        tracing::info!("Starting weather widget with {:?}", initial);
        self.submit(&initial)
    }

    /// Typed search. Blank input is refused without a request.
    pub fn submit(&mut self, input: &str) -> Option<FetchTicket> {
        match WeatherQuery::place(input, self.prefs.units) {
            Some(query) => Some(self.issue(query)),
            None => {
                let status = Status::muted(WidgetError::EmptyQuery.to_string());
                self.view.set_status(&status);
                None
            }
        }
    }

    /// Click on a recent-city chip
    pub fn select_recent(&mut self, city: &str) -> Option<FetchTicket> {
        self.submit(city)
    }

    /// Switch units and refetch the last place so values come from the
    /// provider in the new system.
    pub fn set_units(&mut self, units: Units) -> Option<FetchTicket> {
        self.prefs.units = units;
        self.persist();
        self.view.set_units(units);

        let last = self.prefs.last_query()?.to_string();
        WeatherQuery::place(&last, units).map(|query| self.issue(query))
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.prefs.theme = self.prefs.theme.toggled();
        self.persist();
        self.view.set_theme(self.prefs.theme);
        self.prefs.theme
    }

    /// Called before asking the locator; returns the options to use.
    pub fn request_location(&mut self) -> PositionOptions {
        self.view.set_status(&Status::muted("Getting your location…"));
        PositionOptions {
            high_accuracy: true,
            timeout: self.settings.geolocation_timeout,
        }
    }

    /// The host has no location service at all
    pub fn location_unsupported(&mut self) {
        self.toast(LocationError::Unsupported.to_string(), ToastKind::Error);
    }

    pub fn location_resolved(
        &mut self,
        result: Result<Coordinates, LocationError>,
    ) -> Option<FetchTicket> {
        match result {
            Ok(coordinates) => {
                tracing::debug!(
                    "Location resolved to {}, {}",
                    coordinates.latitude,
                    coordinates.longitude
                );
                Some(self.issue(WeatherQuery::coordinates(coordinates, self.prefs.units)))
            }
            Err(LocationError::Unsupported) => {
                self.location_unsupported();
                None
            }
            Err(e) => {
                let reason = WidgetError::Location(e).reason();
                tracing::warn!("Location lookup failed: {}", reason);
                self.view.set_status(&Status::error(format!("Location error: {}", reason)));
                self.toast(reason, ToastKind::Error);
                None
            }
        }
    }

    /// Apply a fetch outcome. Returns false when the ticket was superseded
    /// and the outcome discarded.
    pub fn complete(&mut self, seq: u64, result: Result<WeatherReading, WidgetError>) -> bool {
        if seq != self.issued {
            tracing::debug!("Dropping stale response #{} (latest #{})", seq, self.issued);
            return false;
        }

        self.set_loading(false);

        match result {
            Ok(reading) => self.apply_reading(&reading),
            Err(e) => {
                let reason = e.reason();
                tracing::warn!("Weather request #{} failed: {}", seq, e);
                self.view.set_status(&Status::error(format!("Error: {}", reason)));
                self.toast(reason, ToastKind::Error);
            }
        }
        true
    }

    fn apply_reading(&mut self, reading: &WeatherReading) {
        self.view
            .render_card(&WeatherCard::from_reading(reading, self.prefs.units));

        let Some(name) = reading.place_name() else {
            return;
        };

        self.prefs.last_query = name.to_string();
        self.prefs.remember_city(name);
        self.persist();
        self.view.render_recents(&self.prefs.recent_cities);

        let updated = chrono::Local::now().format("%H:%M:%S");
        self.view.set_status(&Status::muted(format!("Updated • {}", updated)));
        self.toast(format!("Weather updated for {}", name), ToastKind::Success);
        tracing::info!("Weather updated for {}", name);
    }

    fn issue(&mut self, query: WeatherQuery) -> FetchTicket {
        self.issued += 1;
        self.view.set_status(&Status::muted("Loading…"));
        self.set_loading(true);
        tracing::debug!("Issuing weather request #{}: {:?}", self.issued, query);
        FetchTicket {
            seq: self.issued,
            query,
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.view.set_loading(loading);
    }

    fn toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        let toast = Toast::new(message, kind, self.settings.toast_ttl);
        self.view.show_toast(&toast);
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.prefs) {
            tracing::warn!("Could not save preferences: {}", e);
        }
    }
}
