//! Weather queries as sent by the widget to the proxy.

use crate::types::{Coordinates, Units};

/// What to look up: a free-text place or a coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTarget {
    Place(String),
    Coordinates(Coordinates),
}

/// A single weather lookup. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    target: QueryTarget,
    units: Units,
}

impl WeatherQuery {
    /// Build a place-name query. Returns `None` when the trimmed name is empty.
    pub fn place(name: &str, units: Units) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            target: QueryTarget::Place(name.to_string()),
            units,
        })
    }

    pub fn coordinates(coordinates: Coordinates, units: Units) -> Self {
        Self {
            target: QueryTarget::Coordinates(coordinates),
            units,
        }
    }

    pub fn target(&self) -> &QueryTarget {
        &self.target
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Query string for the proxy, without the leading `?`.
    ///
    /// Place names are percent-encoded; coordinate queries never carry `q`.
    pub fn to_query_string(&self) -> String {
        match &self.target {
            QueryTarget::Place(name) => {
                format!("q={}&units={}", urlencoding::encode(name), self.units)
            }
            QueryTarget::Coordinates(c) => format!(
                "lat={}&lon={}&units={}",
                c.latitude, c.longitude, self.units
            ),
        }
    }
}
