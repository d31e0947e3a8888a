//! Weather domain types shared by the Folio proxy and widget.
//!
//! Covers the query a widget sends, the OpenWeather reading it gets back,
//! display formatting, and the geolocation seam.

pub mod format;
pub mod location;
pub mod query;
pub mod types;

pub use location::{FixedLocator, Geolocator, LocationError, PositionOptions, UnsupportedLocator};
pub use query::{QueryTarget, WeatherQuery};
pub use types::*;
