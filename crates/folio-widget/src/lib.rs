//! Weather widget controller for the Folio site.
//!
//! `WeatherWidget` owns the preferences and decides what to fetch; the
//! functions in `service` run those fetches and feed the results back.

pub mod client;
pub mod error;
pub mod preferences;
pub mod service;
pub mod view;
pub mod widget;

pub use client::{ProxyClient, WeatherSource};
pub use error::WidgetError;
pub use preferences::{
    JsonFileStore, MemoryStore, PreferenceStore, Preferences, MAX_RECENT_CITIES,
};
pub use service::WidgetMessage;
pub use view::{Status, StatusTone, Toast, ToastKind, ViewModel, WeatherCard, WidgetView};
pub use widget::{FetchTicket, WeatherWidget, WidgetSettings};
